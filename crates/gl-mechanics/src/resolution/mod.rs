//! Degree-of-success resolution for percentile checks.
//!
//! Every check is a d100 rolled under a target value (a skill or an
//! attribute). [`classify`] turns a roll into a [`SuccessLevel`];
//! [`SkillCheck`] adds the post-roll choices a player has after failing.

pub mod check;
pub mod roll_under;

pub use check::{PostRollOptions, SkillCheck};
pub use roll_under::{RollUnder, classify};

use serde::{Deserialize, Serialize};

/// The degree of success of a percentile roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuccessLevel {
    /// A natural 01.
    Critical,
    /// At or under a fifth of the target.
    Extreme,
    /// At or under half the target.
    Hard,
    /// At or under the target.
    Success,
    /// Over the target.
    Failure,
    /// 100, or 96-99 when the target is under 50.
    Fumble,
}

impl SuccessLevel {
    /// Returns true for any degree of success.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::Critical | Self::Extreme | Self::Hard | Self::Success
        )
    }

    /// Ordering used to compare opposed rolls; higher is better.
    pub fn rank(self) -> u8 {
        match self {
            Self::Fumble => 0,
            Self::Failure => 1,
            Self::Success => 2,
            Self::Hard => 3,
            Self::Extreme => 4,
            Self::Critical => 5,
        }
    }

    /// Returns true if this level meets a required difficulty.
    pub fn meets(self, required: SuccessLevel) -> bool {
        self.rank() >= required.rank()
    }
}

impl std::fmt::Display for SuccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::Extreme => write!(f, "Extreme Success"),
            Self::Hard => write!(f, "Hard Success"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::Fumble => write!(f, "Fumble"),
        }
    }
}

/// Who came out ahead in an opposed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpposedWinner {
    /// The side that initiated.
    Attacker,
    /// The side that resisted.
    Defender,
    /// Both failed; nobody wins.
    Neither,
}

/// Compare two checks: the better level wins, ties go to the higher
/// target value, and a tie on both goes to the defender.
pub fn opposed(
    attacker: (SuccessLevel, u32),
    defender: (SuccessLevel, u32),
) -> OpposedWinner {
    let (a_level, a_target) = attacker;
    let (d_level, d_target) = defender;
    if !a_level.is_success() && !d_level.is_success() {
        return OpposedWinner::Neither;
    }
    match a_level.rank().cmp(&d_level.rank()) {
        std::cmp::Ordering::Greater => OpposedWinner::Attacker,
        std::cmp::Ordering::Less => OpposedWinner::Defender,
        std::cmp::Ordering::Equal if a_target > d_target => OpposedWinner::Attacker,
        std::cmp::Ordering::Equal => OpposedWinner::Defender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_display() {
        assert_eq!(SuccessLevel::Critical.to_string(), "Critical");
        assert_eq!(SuccessLevel::Hard.to_string(), "Hard Success");
        assert_eq!(SuccessLevel::Fumble.to_string(), "Fumble");
    }

    #[test]
    fn serializes_upper_case() {
        let json = serde_json::to_string(&SuccessLevel::Extreme).unwrap();
        assert_eq!(json, "\"EXTREME\"");
    }

    #[test]
    fn meets_difficulty() {
        assert!(SuccessLevel::Extreme.meets(SuccessLevel::Hard));
        assert!(!SuccessLevel::Success.meets(SuccessLevel::Hard));
        assert!(!SuccessLevel::Fumble.is_success());
    }

    #[test]
    fn opposed_checks() {
        use SuccessLevel::*;
        assert_eq!(opposed((Hard, 40), (Success, 70)), OpposedWinner::Attacker);
        assert_eq!(opposed((Success, 40), (Success, 70)), OpposedWinner::Defender);
        assert_eq!(opposed((Success, 70), (Success, 40)), OpposedWinner::Attacker);
        assert_eq!(opposed((Success, 50), (Success, 50)), OpposedWinner::Defender);
        assert_eq!(opposed((Failure, 50), (Fumble, 50)), OpposedWinner::Neither);
    }
}
