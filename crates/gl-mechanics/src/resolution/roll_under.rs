//! Roll-under classification.
//!
//! The result is compared against the target and its half and fifth.
//! The checks overlap, so their order matters: critical before fumble,
//! then extreme, hard, and plain success.

use serde::{Deserialize, Serialize};

use super::SuccessLevel;

/// A roll-under target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollUnder {
    /// The value to roll at or under.
    pub target: u32,
}

impl RollUnder {
    /// Target for a check.
    pub fn new(target: u32) -> Self {
        Self { target }
    }

    /// Hard threshold.
    pub fn hard(&self) -> u32 {
        crate::rules::half(self.target)
    }

    /// Extreme threshold.
    pub fn extreme(&self) -> u32 {
        crate::rules::fifth(self.target)
    }

    /// Returns true if `roll` fumbles against this target.
    pub fn is_fumble(&self, roll: u32) -> bool {
        roll == 100 || (roll >= 96 && self.target < 50)
    }

    /// Classify a roll against this target.
    pub fn resolve(&self, roll: u32) -> SuccessLevel {
        if roll == 1 {
            SuccessLevel::Critical
        } else if self.is_fumble(roll) {
            SuccessLevel::Fumble
        } else if roll <= self.extreme() {
            SuccessLevel::Extreme
        } else if roll <= self.hard() {
            SuccessLevel::Hard
        } else if roll <= self.target {
            SuccessLevel::Success
        } else {
            SuccessLevel::Failure
        }
    }
}

impl Default for RollUnder {
    fn default() -> Self {
        Self { target: 50 }
    }
}

/// Classify `roll` against `target`.
pub fn classify(roll: u32, target: u32) -> SuccessLevel {
    RollUnder::new(target).resolve(roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_is_always_critical() {
        assert_eq!(classify(1, 50), SuccessLevel::Critical);
        assert_eq!(classify(1, 0), SuccessLevel::Critical);
        assert_eq!(classify(1, 99), SuccessLevel::Critical);
    }

    #[test]
    fn hundred_always_fumbles() {
        assert_eq!(classify(100, 70), SuccessLevel::Fumble);
        assert_eq!(classify(100, 99), SuccessLevel::Fumble);
    }

    #[test]
    fn high_rolls_fumble_under_fifty() {
        assert_eq!(classify(96, 40), SuccessLevel::Fumble);
        assert_eq!(classify(96, 50), SuccessLevel::Failure);
        assert_eq!(classify(95, 40), SuccessLevel::Failure);
    }

    #[test]
    fn tiers_at_their_boundaries() {
        assert_eq!(classify(10, 50), SuccessLevel::Extreme);
        assert_eq!(classify(11, 50), SuccessLevel::Hard);
        assert_eq!(classify(25, 50), SuccessLevel::Hard);
        assert_eq!(classify(26, 50), SuccessLevel::Success);
        assert_eq!(classify(50, 50), SuccessLevel::Success);
        assert_eq!(classify(51, 50), SuccessLevel::Failure);
    }

    #[test]
    fn thresholds_round_down() {
        let r = RollUnder::new(47);
        assert_eq!(r.hard(), 23);
        assert_eq!(r.extreme(), 9);
    }

    proptest! {
        #[test]
        fn success_iff_under_target_outside_specials(roll in 2u32..=95, target in 0u32..=99) {
            let level = classify(roll, target);
            prop_assert_eq!(level.is_success(), roll <= target);
        }

        #[test]
        fn extreme_never_above_fifth(roll in 2u32..=99, target in 1u32..=99) {
            if classify(roll, target) == SuccessLevel::Extreme {
                prop_assert!(roll <= target / 5);
            }
        }
    }
}
