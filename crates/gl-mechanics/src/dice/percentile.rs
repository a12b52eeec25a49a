//! Percentile rolls with bonus and penalty dice.
//!
//! A d100 is rolled as a units digit and a tens digit, each 0-9, with
//! tens 0 and units 0 reading as 100. Each bonus or penalty die adds another
//! tens digit: bonus keeps the lowest tens, penalty the highest. The units
//! digit is never rerolled.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};


/// Most bonus or penalty dice a single roll may carry.
pub const MAX_EXTRA_DICE: u8 = 2;

/// Bonus or penalty dice on a percentile roll. The two never combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileModifier {
    /// No extra dice.
    #[default]
    None,
    /// Extra tens dice, keep the lowest.
    Bonus(u8),
    /// Extra tens dice, keep the highest.
    Penalty(u8),
}

impl PercentileModifier {
    /// Select `n` bonus dice, clamped to [`MAX_EXTRA_DICE`]. Any penalty is dropped.
    pub fn bonus(n: u8) -> Self {
        match n.min(MAX_EXTRA_DICE) {
            0 => Self::None,
            n => Self::Bonus(n),
        }
    }

    /// Select `n` penalty dice, clamped to [`MAX_EXTRA_DICE`]. Any bonus is dropped.
    pub fn penalty(n: u8) -> Self {
        match n.min(MAX_EXTRA_DICE) {
            0 => Self::None,
            n => Self::Penalty(n),
        }
    }

    /// Number of extra tens dice to roll.
    pub fn extra_dice(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Bonus(n) | Self::Penalty(n) => *n,
        }
    }
}

/// Join a tens digit and a units digit into 1-100.
pub fn combine(tens: u32, units: u32) -> u32 {
    if tens == 0 && units == 0 {
        100
    } else {
        tens * 10 + units
    }
}

/// A resolved percentile roll and the digits behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileRoll {
    /// The units digit.
    pub units: u32,
    /// The base tens digit.
    pub base_tens: u32,
    /// Tens digits rolled for bonus or penalty dice.
    pub extra_tens: Vec<u32>,
    /// Which extra dice were rolled.
    pub modifier: PercentileModifier,
    /// The tens digit that was kept.
    pub kept_tens: u32,
    /// The final result, 1-100.
    pub value: u32,
}

impl PercentileRoll {
    /// Resolve from already-rolled digits.
    pub fn from_digits(
        units: u32,
        base_tens: u32,
        extra_tens: Vec<u32>,
        modifier: PercentileModifier,
    ) -> Self {
        let kept_tens = {
            let all = std::iter::once(base_tens).chain(extra_tens.iter().copied());
            match modifier {
                PercentileModifier::None => base_tens,
                PercentileModifier::Bonus(_) => all.min().unwrap_or(base_tens),
                PercentileModifier::Penalty(_) => all.max().unwrap_or(base_tens),
            }
        };
        Self {
            units,
            base_tens,
            extra_tens,
            modifier,
            kept_tens,
            value: combine(kept_tens, units),
        }
    }
}

impl std::fmt::Display for PercentileRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.extra_tens.is_empty() {
            return write!(f, "{}", self.value);
        }
        let tens: Vec<String> = std::iter::once(self.base_tens)
            .chain(self.extra_tens.iter().copied())
            .map(|t| format!("{}", t * 10))
            .collect();
        write!(f, "{} (tens {} / units {})", self.value, tens.join(", "), self.units)
    }
}

/// Roll a percentile die with optional bonus or penalty dice.
pub fn roll_percentile(modifier: PercentileModifier, rng: &mut StdRng) -> PercentileRoll {
    let units = rng.random_range(0..=9);
    let base_tens = rng.random_range(0..=9);
    let extra_tens = (0..modifier.extra_dice())
        .map(|_| rng.random_range(0..=9))
        .collect();
    PercentileRoll::from_digits(units, base_tens, extra_tens, modifier)
}
