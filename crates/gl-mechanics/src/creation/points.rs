//! Occupation and personal-interest skill points.

use std::collections::BTreeMap;
use std::fmt;

use gl_core::character::MYTHOS_SKILL;
use gl_core::{Attribute, Attributes};
use serde::{Deserialize, Serialize};

use crate::catalog::{Occupation, find_skill};
use crate::error::{CreationError, CreationResult};

/// Points move in steps of this size.
pub const POINT_STEP: i32 = 5;

/// The two point pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointPool {
    /// Points from the occupation formula, class skills only.
    Occupation,
    /// INT×2, any skill but Cthulhu Mythos.
    Personal,
}

impl PointPool {
    fn name(self) -> &'static str {
        match self {
            Self::Occupation => "occupation",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for PointPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points added to one skill, by pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAllocation {
    /// From the occupation pool.
    pub occupation: u32,
    /// From the personal pool.
    pub personal: u32,
}

impl SkillAllocation {
    /// Total points added.
    pub fn total(&self) -> u32 {
        self.occupation + self.personal
    }

    /// Points from one pool.
    pub fn get(&self, pool: PointPool) -> u32 {
        match pool {
            PointPool::Occupation => self.occupation,
            PointPool::Personal => self.personal,
        }
    }

    fn pool_mut(&mut self, pool: PointPool) -> &mut u32 {
        match pool {
            PointPool::Occupation => &mut self.occupation,
            PointPool::Personal => &mut self.personal,
        }
    }
}

/// Skill point budget and allocations, keyed by catalog skill name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPoints {
    occupation_total: u32,
    personal_total: u32,
    allocations: BTreeMap<String, SkillAllocation>,
}

impl SkillPoints {
    /// A fresh budget.
    pub fn new(occupation_total: u32, personal_total: u32) -> Self {
        Self {
            occupation_total,
            personal_total,
            allocations: BTreeMap::new(),
        }
    }

    /// The budget for an occupation and attribute block.
    pub fn for_occupation(occupation: &Occupation, attributes: &Attributes) -> Self {
        Self::new(
            occupation.skill_points(attributes),
            personal_points(attributes),
        )
    }

    /// Size of a pool.
    pub fn total(&self, pool: PointPool) -> u32 {
        match pool {
            PointPool::Occupation => self.occupation_total,
            PointPool::Personal => self.personal_total,
        }
    }

    /// Points spent from a pool.
    pub fn spent(&self, pool: PointPool) -> u32 {
        self.allocations.values().map(|a| a.get(pool)).sum()
    }

    /// Points left in a pool.
    pub fn remaining(&self, pool: PointPool) -> u32 {
        self.total(pool).saturating_sub(self.spent(pool))
    }

    /// Points added to `skill`.
    pub fn added(&self, skill: &str) -> u32 {
        self.allocation(skill).total()
    }

    /// Allocation for `skill`, zero if untouched.
    pub fn allocation(&self, skill: &str) -> SkillAllocation {
        find_skill(skill)
            .and_then(|def| self.allocations.get(def.name))
            .copied()
            .unwrap_or_default()
    }

    /// Skills with points in them.
    pub fn allocations(&self) -> impl Iterator<Item = (&str, &SkillAllocation)> {
        self.allocations
            .iter()
            .filter(|(_, a)| a.total() > 0)
            .map(|(name, a)| (name.as_str(), a))
    }

    /// Move `delta` points between a pool and a skill. Negative values
    /// refund. Returns the skill's new allocation from that pool.
    pub fn spend(
        &mut self,
        pool: PointPool,
        occupation: &Occupation,
        skill: &str,
        delta: i32,
    ) -> CreationResult<u32> {
        if delta % POINT_STEP != 0 {
            return Err(CreationError::NotMultipleOfFive(delta));
        }
        let def = find_skill(skill)
            .ok_or_else(|| CreationError::SkillNotAllocatable(skill.to_string()))?;
        match pool {
            PointPool::Occupation if !occupation.is_class_skill(def.name) => {
                return Err(CreationError::NotOccupationSkill(def.name.to_string()));
            }
            PointPool::Personal if def.name == MYTHOS_SKILL => {
                return Err(CreationError::SkillNotAllocatable(def.name.to_string()));
            }
            _ => {}
        }

        let remaining = self.remaining(pool);
        let held = self
            .allocations
            .get(def.name)
            .map(|a| a.get(pool))
            .unwrap_or(0);
        let amount = delta.unsigned_abs();
        let updated = if delta >= 0 {
            if amount > remaining {
                return Err(CreationError::InsufficientPoints {
                    pool: pool.name(),
                    remaining,
                    requested: amount,
                });
            }
            held + amount
        } else {
            if amount > held {
                return Err(CreationError::OverRefund {
                    skill: def.name.to_string(),
                    spent: held,
                    requested: amount,
                });
            }
            held - amount
        };

        let entry = self.allocations.entry(def.name.to_string()).or_default();
        *entry.pool_mut(pool) = updated;
        if entry.total() == 0 {
            self.allocations.remove(def.name);
        }
        Ok(updated)
    }

    /// Change the pool sizes, keeping allocations when they still fit.
    /// Returns false if allocations had to be cleared.
    pub fn retotal(&mut self, occupation_total: u32, personal_total: u32) -> bool {
        let fits = self.spent(PointPool::Occupation) <= occupation_total
            && self.spent(PointPool::Personal) <= personal_total;
        self.occupation_total = occupation_total;
        self.personal_total = personal_total;
        if !fits {
            self.allocations.clear();
        }
        fits
    }
}

/// Personal-interest points: INT×2.
pub fn personal_points(attributes: &Attributes) -> u32 {
    attributes.get(Attribute::Int) * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_occupation;

    fn journalist() -> &'static Occupation {
        find_occupation("journalist").unwrap()
    }

    fn budget() -> SkillPoints {
        SkillPoints::new(40, 20)
    }

    #[test]
    fn pools_from_attributes() {
        let attrs = Attributes::from_values([(Attribute::Edu, 60), (Attribute::Int, 70)]);
        let points = SkillPoints::for_occupation(journalist(), &attrs);
        assert_eq!(points.total(PointPool::Occupation), 240);
        assert_eq!(points.total(PointPool::Personal), 140);
    }

    #[test]
    fn spend_and_refund() {
        let mut p = budget();
        assert_eq!(p.spend(PointPool::Occupation, journalist(), "photography", 25), Ok(25));
        assert_eq!(p.remaining(PointPool::Occupation), 15);
        assert_eq!(p.spend(PointPool::Occupation, journalist(), "Photography", -10), Ok(15));
        assert_eq!(p.added("Photography"), 15);
        assert_eq!(p.spend(PointPool::Personal, journalist(), "Photography", 5), Ok(5));
        assert_eq!(p.added("Photography"), 20);
    }

    #[test]
    fn steps_of_five() {
        let mut p = budget();
        assert_eq!(
            p.spend(PointPool::Personal, journalist(), "Listen", 7),
            Err(CreationError::NotMultipleOfFive(7))
        );
    }

    #[test]
    fn occupation_points_need_class_skills() {
        let mut p = budget();
        assert_eq!(
            p.spend(PointPool::Occupation, journalist(), "Medicine", 5),
            Err(CreationError::NotOccupationSkill("Medicine".into()))
        );
        assert!(p.spend(PointPool::Occupation, journalist(), "Credit Rating", 10).is_ok());
    }

    #[test]
    fn personal_points_skip_mythos() {
        let mut p = budget();
        assert_eq!(
            p.spend(PointPool::Personal, journalist(), "Cthulhu Mythos", 5),
            Err(CreationError::SkillNotAllocatable("Cthulhu Mythos".into()))
        );
    }

    #[test]
    fn no_overdraw() {
        let mut p = budget();
        p.spend(PointPool::Personal, journalist(), "Listen", 15).unwrap();
        assert_eq!(
            p.spend(PointPool::Personal, journalist(), "Swim", 10),
            Err(CreationError::InsufficientPoints {
                pool: "personal",
                remaining: 5,
                requested: 10
            })
        );
    }

    #[test]
    fn no_over_refund() {
        let mut p = budget();
        p.spend(PointPool::Occupation, journalist(), "History", 10).unwrap();
        p.spend(PointPool::Personal, journalist(), "History", 10).unwrap();
        assert_eq!(
            p.spend(PointPool::Occupation, journalist(), "History", -15),
            Err(CreationError::OverRefund {
                skill: "History".into(),
                spent: 10,
                requested: 15
            })
        );
    }

    #[test]
    fn unknown_skill() {
        let mut p = budget();
        assert!(matches!(
            p.spend(PointPool::Personal, journalist(), "Juggling", 5),
            Err(CreationError::SkillNotAllocatable(_))
        ));
    }

    #[test]
    fn retotal_keeps_or_clears() {
        let mut p = budget();
        p.spend(PointPool::Occupation, journalist(), "History", 30).unwrap();
        assert!(p.retotal(35, 20));
        assert_eq!(p.added("History"), 30);
        assert!(!p.retotal(20, 20));
        assert_eq!(p.added("History"), 0);
    }
}
