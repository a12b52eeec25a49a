//! `NdS+K` dice notation.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{DicePool, Die, RollResult};
use crate::error::{MechError, MechResult};

/// Most dice a single expression may roll.
pub const MAX_DICE: u32 = 100;

/// Most sides a single die may have.
pub const MAX_SIDES: u32 = 1000;

/// A dice expression such as `3d6`, `1d100`, or `2d6+6`.
///
/// Parsing and deserialization both reject more than [`MAX_DICE`] dice or
/// dice with more than [`MAX_SIDES`] sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NotationFields")]
pub struct DiceNotation {
    /// Number of dice.
    pub count: u32,
    /// Sides per die.
    pub sides: u32,
    /// Flat modifier.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub modifier: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

#[derive(Deserialize)]
struct NotationFields {
    count: u32,
    sides: u32,
    #[serde(default)]
    modifier: i32,
}

impl TryFrom<NotationFields> for DiceNotation {
    type Error = MechError;

    fn try_from(fields: NotationFields) -> MechResult<Self> {
        let notation = Self {
            count: fields.count,
            sides: fields.sides,
            modifier: fields.modifier,
        };
        if notation.in_bounds() {
            Ok(notation)
        } else {
            Err(MechError::InvalidNotation(notation.to_string()))
        }
    }
}

impl DiceNotation {
    /// `count` dice with `sides` sides and no modifier.
    pub fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            modifier: 0,
        }
    }

    /// A single percentile die.
    pub fn d100() -> Self {
        Self::new(1, 100)
    }

    /// Returns true for a single d100, which is rolled as tens and units.
    pub fn is_percentile(&self) -> bool {
        self.count == 1 && self.sides == 100 && self.modifier == 0
    }

    fn in_bounds(&self) -> bool {
        (1..=MAX_DICE).contains(&self.count) && (2..=MAX_SIDES).contains(&self.sides)
    }

    /// Build the pool this expression describes.
    pub fn pool(&self) -> DicePool {
        DicePool::new()
            .add(Die::with_sides(self.sides), self.count)
            .plus(self.modifier)
    }

    /// Roll the expression.
    pub fn roll(&self, rng: &mut StdRng) -> RollResult {
        self.pool().roll(rng)
    }
}

impl FromStr for DiceNotation {
    type Err = MechError;

    fn from_str(s: &str) -> MechResult<Self> {
        let invalid = || MechError::InvalidNotation(s.to_string());
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let lower = compact.to_lowercase();

        let (count_str, rest) = lower.split_once('d').ok_or_else(invalid)?;
        let count = if count_str.is_empty() {
            1
        } else {
            count_str.parse::<u32>().map_err(|_| invalid())?
        };

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let modifier = rest[pos..].parse::<i32>().map_err(|_| invalid())?;
                (&rest[..pos], modifier)
            }
            None => (rest, 0),
        };
        let sides = sides_str.parse::<u32>().map_err(|_| invalid())?;

        let notation = Self {
            count,
            sides,
            modifier,
        };
        if !notation.in_bounds() {
            return Err(invalid());
        }
        Ok(notation)
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn parses_plain_and_modified() {
        assert_eq!("3d6".parse::<DiceNotation>().unwrap(), DiceNotation::new(3, 6));
        assert_eq!("d20".parse::<DiceNotation>().unwrap(), DiceNotation::new(1, 20));
        let n: DiceNotation = "2D6 + 6".parse().unwrap();
        assert_eq!(n.modifier, 6);
        let n: DiceNotation = "1d4-1".parse().unwrap();
        assert_eq!(n.modifier, -1);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "6", "0d6", "2d1", "xdy", "2d6+x", "4000000000d6", "101d6", "1d1001"] {
            assert!(bad.parse::<DiceNotation>().is_err(), "{bad} should fail");
        }
        assert!("100d1000".parse::<DiceNotation>().is_ok());
    }

    #[test]
    fn rows_are_bounded_too() {
        let ok: DiceNotation =
            serde_json::from_value(serde_json::json!({"count": 2, "sides": 6})).unwrap();
        assert_eq!(ok, DiceNotation::new(2, 6));
        let huge = serde_json::json!({"count": 4_000_000_000u32, "sides": 6});
        assert!(serde_json::from_value::<DiceNotation>(huge).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(DiceNotation::new(1, 100).to_string(), "1d100");
        assert_eq!("2d6+6".parse::<DiceNotation>().unwrap().to_string(), "2d6+6");
        assert_eq!("1d3-2".parse::<DiceNotation>().unwrap().to_string(), "1d3-2");
    }

    #[test]
    fn percentile_detection() {
        assert!(DiceNotation::d100().is_percentile());
        assert!(!DiceNotation::new(2, 100).is_percentile());
    }

    #[test]
    fn roll_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let n: DiceNotation = "3d6".parse().unwrap();
        for _ in 0..50 {
            assert!((3..=18).contains(&n.roll(&mut rng).total()));
        }
    }
}
