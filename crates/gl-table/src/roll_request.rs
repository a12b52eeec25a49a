//! Keeper roll requests.
//!
//! A request is created `PENDING`, rolled once by the targeted player and
//! then stays `ROLLED`. Views only show requests younger than the
//! configured window; nothing here deletes them.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use gl_core::{CharacterId, define_id};
use gl_mechanics::{DiceNotation, PercentileModifier, SuccessLevel, classify, roll_percentile};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};
use crate::session::SessionId;

define_id!(
    /// Identifier of a roll request.
    RollRequestId
);

/// Lifecycle of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollStatus {
    /// Waiting for the player.
    #[default]
    Pending,
    /// Answered.
    Rolled,
}

/// A roll the Keeper asked an investigator to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// Row id.
    pub id: RollRequestId,
    /// Session the request belongs to.
    pub session_id: SessionId,
    /// Who must roll.
    pub character_id: CharacterId,
    /// Skill or attribute named by the Keeper.
    pub skill_name: String,
    /// Value to roll under.
    pub target_value: u32,
    /// Dice to roll.
    pub dice: DiceNotation,
    /// Bonus or penalty dice on a percentile request.
    #[serde(default)]
    pub modifier: PercentileModifier,
    /// Hidden from the player's own view of the result.
    pub blind: bool,
    /// Lifecycle state.
    pub status: RollStatus,
    /// The rolled total.
    pub result: Option<u32>,
    /// Degree of success, for percentile requests.
    pub outcome: Option<SuccessLevel>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// When the player rolled.
    pub rolled_at: Option<DateTime<Utc>>,
}

impl RollRequest {
    /// A pending request.
    pub fn new(
        session_id: SessionId,
        character_id: CharacterId,
        skill_name: impl Into<String>,
        target_value: u32,
        dice: DiceNotation,
    ) -> Self {
        Self {
            id: RollRequestId::new(),
            session_id,
            character_id,
            skill_name: skill_name.into(),
            target_value,
            dice,
            modifier: PercentileModifier::None,
            blind: false,
            status: RollStatus::Pending,
            result: None,
            outcome: None,
            created_at: Utc::now(),
            rolled_at: None,
        }
    }

    /// Mark the request blind.
    pub fn blind(mut self) -> Self {
        self.blind = true;
        self
    }

    /// Add bonus or penalty dice.
    pub fn with_modifier(mut self, modifier: PercentileModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Returns true while the request is inside the visibility window.
    pub fn is_visible(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        now.signed_duration_since(self.created_at) < ttl
    }

    /// Roll the request. A second roll is rejected.
    pub fn resolve(&mut self, rng: &mut StdRng, now: DateTime<Utc>) -> TableResult<u32> {
        if self.status == RollStatus::Rolled {
            return Err(TableError::AlreadyRolled(self.id.key()));
        }
        let (result, outcome) = if self.dice.is_percentile() {
            let value = roll_percentile(self.modifier, rng).value;
            (value, Some(classify(value, self.target_value)))
        } else {
            (self.dice.roll(rng).total(), None)
        };
        self.result = Some(result);
        self.outcome = outcome;
        self.status = RollStatus::Rolled;
        self.rolled_at = Some(now);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn request() -> RollRequest {
        RollRequest::new(
            SessionId::new(),
            CharacterId::new(),
            "Spot Hidden",
            55,
            DiceNotation::d100(),
        )
    }

    #[test]
    fn rolls_once() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut req = request();
        let value = req.resolve(&mut rng, Utc::now()).unwrap();
        assert!((1..=100).contains(&value));
        assert_eq!(req.status, RollStatus::Rolled);
        assert_eq!(req.outcome, Some(classify(value, 55)));
        assert!(matches!(
            req.resolve(&mut rng, Utc::now()),
            Err(TableError::AlreadyRolled(_))
        ));
        assert_eq!(req.result, Some(value));
    }

    #[test]
    fn non_percentile_has_no_outcome() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut req = request();
        req.dice = "1d6".parse().unwrap();
        let value = req.resolve(&mut rng, Utc::now()).unwrap();
        assert!((1..=6).contains(&value));
        assert_eq!(req.outcome, None);
    }

    #[test]
    fn visibility_window() {
        let req = request();
        let ttl = Duration::from_secs(120);
        assert!(req.is_visible(req.created_at + TimeDelta::seconds(119), ttl));
        assert!(!req.is_visible(req.created_at + TimeDelta::seconds(120), ttl));
    }

    #[test]
    fn wire_format() {
        let json = serde_json::to_value(request().blind()).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["blind"], true);
        assert_eq!(json["dice"]["count"], 1);
    }
}
