//! Dice roll results and aggregation.

use serde::{Deserialize, Serialize};

use super::Die;

/// The result of rolling a single die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// The face value, 1 to sides.
    pub value: u32,
}

/// The result of rolling an entire dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual die results.
    pub dice: Vec<DieResult>,
    /// Flat modifier added to the sum.
    #[serde(default)]
    pub modifier: i32,
}

impl RollResult {
    /// Sum of all die values plus the modifier, floored at zero.
    pub fn total(&self) -> u32 {
        let sum: i64 = self.dice.iter().map(|d| d.value as i64).sum();
        (sum + self.modifier as i64).max(0) as u32
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        match self.modifier {
            0 => write!(f, "[{}] = {}", values.join(", "), self.total()),
            m if m > 0 => write!(f, "[{}] +{m} = {}", values.join(", "), self.total()),
            m => write!(f, "[{}] {m} = {}", values.join(", "), self.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(values: &[(Die, u32)], modifier: i32) -> RollResult {
        RollResult {
            dice: values
                .iter()
                .map(|(die, value)| DieResult {
                    die: *die,
                    value: *value,
                })
                .collect(),
            modifier,
        }
    }

    #[test]
    fn total_with_modifier() {
        let r = make_result(&[(Die::D6, 4), (Die::D6, 2)], 6);
        assert_eq!(r.total(), 12);
    }

    #[test]
    fn negative_modifier_floors_at_zero() {
        let r = make_result(&[(Die::D4, 1)], -3);
        assert_eq!(r.total(), 0);
    }

    #[test]
    fn empty_result() {
        let r = RollResult::default();
        assert_eq!(r.total(), 0);
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn display() {
        let r = make_result(&[(Die::D6, 3), (Die::D6, 5)], 0);
        assert_eq!(r.to_string(), "[3, 5] = 8");
        let r = RollResult { modifier: 6, ..r };
        assert_eq!(r.to_string(), "[3, 5] +6 = 14");
    }
}
