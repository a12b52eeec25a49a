//! A single skill check and the choices that follow a failure.
//!
//! After a plain failure on an open (non-blind) roll the player may spend
//! luck point-for-point to bring the roll down to the target, or push the
//! roll once. The two are offered side by side; a pushed roll is final and
//! can neither be pushed again nor bought down with luck. Fumbles offer
//! neither.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{SuccessLevel, classify};
use crate::dice::{PercentileModifier, PercentileRoll, roll_percentile};
use crate::error::{MechError, MechResult};

/// What the player may do after seeing the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostRollOptions {
    /// Luck cost to turn the roll into a success, if affordable.
    pub spend_luck: Option<u32>,
    /// Whether the roll can be pushed.
    pub push: bool,
}

impl PostRollOptions {
    /// Returns true if nothing is on offer.
    pub fn is_empty(&self) -> bool {
        self.spend_luck.is_none() && !self.push
    }
}

/// A percentile check against a target value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    /// Skill or attribute being tested.
    pub skill: String,
    /// Target value.
    pub target: u32,
    /// Blind rolls are made by the Keeper and offer no follow-up.
    pub blind: bool,
    /// The most recent roll.
    pub roll: PercentileRoll,
    /// The roll after any luck spend.
    pub effective: u32,
    /// Classification of `effective`.
    pub level: SuccessLevel,
    /// Luck spent so far.
    pub luck_spent: u32,
    /// Whether the roll has been pushed.
    pub pushed: bool,
}

impl SkillCheck {
    /// Roll a fresh check.
    pub fn roll(
        skill: impl Into<String>,
        target: u32,
        modifier: PercentileModifier,
        blind: bool,
        rng: &mut StdRng,
    ) -> Self {
        Self::from_roll(skill, target, blind, roll_percentile(modifier, rng))
    }

    /// Build a check from an existing roll.
    pub fn from_roll(
        skill: impl Into<String>,
        target: u32,
        blind: bool,
        roll: PercentileRoll,
    ) -> Self {
        let effective = roll.value;
        Self {
            skill: skill.into(),
            target,
            blind,
            effective,
            level: classify(effective, target),
            roll,
            luck_spent: 0,
            pushed: false,
        }
    }

    /// Returns true if follow-up options apply at all.
    fn open_failure(&self) -> bool {
        self.level == SuccessLevel::Failure && !self.blind && !self.pushed
    }

    /// Luck needed to bring the roll down to the target, if the roll is
    /// eligible for a luck spend.
    pub fn luck_cost(&self) -> Option<u32> {
        if !self.open_failure() || self.effective <= self.target {
            return None;
        }
        Some(self.effective - self.target)
    }

    /// Options available given the investigator's current luck.
    pub fn options(&self, luck: u32) -> PostRollOptions {
        PostRollOptions {
            spend_luck: self.luck_cost().filter(|cost| *cost <= luck),
            push: self.open_failure(),
        }
    }

    /// Spend luck to succeed. Deducts the cost from `luck` and returns it.
    pub fn spend_luck(&mut self, luck: &mut u32) -> MechResult<u32> {
        let cost = self
            .luck_cost()
            .ok_or_else(|| MechError::NotAllowed("luck can't be spent on this roll".into()))?;
        if cost > *luck {
            return Err(MechError::NotAllowed(format!(
                "spending luck needs {cost}, only {luck} left"
            )));
        }
        *luck -= cost;
        self.luck_spent += cost;
        self.effective = self.target;
        // Luck buys a regular success, even where the target itself would
        // read as critical or extreme.
        self.level = SuccessLevel::Success;
        Ok(cost)
    }

    /// Push the roll: reroll once with the same bonus or penalty dice.
    /// The new result stands.
    pub fn push(&mut self, rng: &mut StdRng) -> MechResult<&PercentileRoll> {
        if !self.open_failure() {
            return Err(MechError::NotAllowed("this roll can't be pushed".into()));
        }
        self.roll = roll_percentile(self.roll.modifier, rng);
        self.effective = self.roll.value;
        self.level = classify(self.effective, self.target);
        self.pushed = true;
        Ok(&self.roll)
    }
}
