//! The step-by-step creation wizard.

use chrono::{DateTime, Utc};
use gl_core::{Attribute, Backstory, Character, DerivedStats, EquipmentItem, UserId};
use rand::rngs::StdRng;

use super::Step;
use super::points::{PointPool, SkillPoints, personal_points};
use super::pools::AttributePools;
use crate::catalog::{Occupation, find_occupation, starting_skills};
use crate::error::{CreationError, CreationResult};
use crate::rules;

/// Youngest and oldest ages offered at the appearance step.
pub const AGE_RANGE: (u32, u32) = (15, 89);

/// Builds one investigator.
///
/// Every mutator checks the current step first, and after
/// [`commit`](Self::commit) every mutator fails with
/// [`CreationError::AlreadyCommitted`].
#[derive(Debug, Clone)]
pub struct CreationWizard {
    step: Step,
    owner: Option<UserId>,
    name: String,
    pools: AttributePools,
    occupation: Option<&'static Occupation>,
    points: SkillPoints,
    items: Vec<EquipmentItem>,
    age: u32,
    backstory: Backstory,
}

impl Default for CreationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationWizard {
    /// A wizard at the identity step.
    pub fn new() -> Self {
        Self {
            step: Step::Identity,
            owner: None,
            name: String::new(),
            pools: AttributePools::new(),
            occupation: None,
            points: SkillPoints::default(),
            items: Vec::new(),
            age: 25,
            backstory: Backstory::default(),
        }
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Investigator name so far.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute pools.
    pub fn pools(&self) -> &AttributePools {
        &self.pools
    }

    /// Chosen occupation.
    pub fn occupation(&self) -> Option<&'static Occupation> {
        self.occupation
    }

    /// Skill point budget.
    pub fn points(&self) -> &SkillPoints {
        &self.points
    }

    /// Chosen starting equipment.
    pub fn items(&self) -> &[EquipmentItem] {
        &self.items
    }

    fn require(&self, action: &'static str, step: Step) -> CreationResult<()> {
        if self.step == Step::Committed {
            return Err(CreationError::AlreadyCommitted);
        }
        if self.step != step {
            return Err(CreationError::WrongStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    fn incomplete(&self, reason: impl Into<String>) -> CreationError {
        CreationError::Incomplete {
            step: self.step,
            reason: reason.into(),
        }
    }

    // -- Identity --

    /// Set the investigator name.
    pub fn set_name(&mut self, name: impl Into<String>) -> CreationResult<()> {
        self.require("set_name", Step::Identity)?;
        self.name = name.into();
        Ok(())
    }

    /// Set the owning profile.
    pub fn set_owner(&mut self, owner: UserId) -> CreationResult<()> {
        self.require("set_owner", Step::Identity)?;
        self.owner = Some(owner);
        Ok(())
    }

    // -- Attributes --

    /// Roll both attribute pools. Clears every assignment.
    pub fn roll_attributes(&mut self, rng: &mut StdRng) -> CreationResult<()> {
        self.require("roll_attributes", Step::Attributes)?;
        self.pools.roll(rng);
        Ok(())
    }

    /// Replace the pools wholesale, e.g. with fixed values.
    pub fn set_pools(&mut self, pools: AttributePools) -> CreationResult<()> {
        self.require("set_pools", Step::Attributes)?;
        self.pools = pools;
        Ok(())
    }

    /// Roll luck.
    pub fn roll_luck(&mut self, rng: &mut StdRng) -> CreationResult<u32> {
        self.require("roll_luck", Step::Attributes)?;
        Ok(self.pools.roll_luck(rng))
    }

    /// Put rolled value `id` into `attr`.
    pub fn assign(&mut self, attr: Attribute, id: usize) -> CreationResult<()> {
        self.require("assign", Step::Attributes)?;
        self.pools.assign(attr, id)
    }

    /// Clear a slot.
    pub fn unassign(&mut self, attr: Attribute) -> CreationResult<Option<usize>> {
        self.require("unassign", Step::Attributes)?;
        Ok(self.pools.unassign(attr))
    }

    // -- Occupation --

    /// Choose an occupation by catalog id. Changing occupation clears
    /// skill allocations.
    pub fn choose_occupation(&mut self, id: &str) -> CreationResult<&'static Occupation> {
        self.require("choose_occupation", Step::Occupation)?;
        let occupation =
            find_occupation(id).ok_or_else(|| CreationError::UnknownOccupation(id.to_string()))?;
        if self.occupation.map(|o| o.id) != Some(occupation.id) {
            self.points = SkillPoints::for_occupation(occupation, &self.pools.attributes());
            self.occupation = Some(occupation);
        }
        Ok(occupation)
    }

    /// Move points between a pool and a skill. Negative `delta` refunds.
    pub fn allocate(&mut self, pool: PointPool, skill: &str, delta: i32) -> CreationResult<u32> {
        self.require("allocate", Step::Occupation)?;
        let occupation = self
            .occupation
            .ok_or_else(|| self.incomplete("choose an occupation first"))?;
        self.points.spend(pool, occupation, skill, delta)
    }

    // -- Inventory --

    /// Add a catalog item to the starting kit.
    pub fn add_item(&mut self, item: EquipmentItem) -> CreationResult<()> {
        self.require("add_item", Step::Inventory)?;
        self.items.push(item);
        Ok(())
    }

    /// Drop a starting item by catalog id.
    pub fn remove_item(&mut self, id: &str) -> CreationResult<EquipmentItem> {
        self.require("remove_item", Step::Inventory)?;
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CreationError::UnknownItem(id.to_string()))?;
        Ok(self.items.remove(pos))
    }

    // -- Appearance --

    /// Set age, clamped to [`AGE_RANGE`].
    pub fn set_age(&mut self, age: u32) -> CreationResult<()> {
        self.require("set_age", Step::Appearance)?;
        self.age = age.clamp(AGE_RANGE.0, AGE_RANGE.1);
        Ok(())
    }

    /// Replace the backstory.
    pub fn set_backstory(&mut self, backstory: Backstory) -> CreationResult<()> {
        self.require("set_backstory", Step::Appearance)?;
        self.backstory = backstory;
        Ok(())
    }

    // -- Navigation --

    /// Advance to the next step if the current step's guard passes.
    pub fn advance(&mut self) -> CreationResult<Step> {
        if self.step == Step::Committed {
            return Err(CreationError::AlreadyCommitted);
        }
        let next = self.step.next().ok_or(CreationError::WrongStep {
            action: "advance",
            step: self.step,
        })?;
        match self.step {
            Step::Identity if self.name.trim().is_empty() => {
                return Err(self.incomplete("name is required"));
            }
            Step::Attributes => {
                let missing = self.pools.missing();
                if !missing.is_empty() {
                    let names: Vec<_> = missing.iter().map(|a| a.abbreviation()).collect();
                    return Err(self.incomplete(format!("unassigned: {}", names.join(", "))));
                }
                if self.pools.luck().is_none() {
                    return Err(self.incomplete("luck has not been rolled"));
                }
                self.refresh_budget();
            }
            Step::Occupation if self.occupation.is_none() => {
                return Err(self.incomplete("choose an occupation"));
            }
            _ => {}
        }
        self.step = next;
        Ok(next)
    }

    /// Go back one step. A no-op at the identity step.
    pub fn back(&mut self) -> CreationResult<Step> {
        if self.step == Step::Committed {
            return Err(CreationError::AlreadyCommitted);
        }
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        Ok(self.step)
    }

    // Attributes may have changed since the occupation was picked.
    fn refresh_budget(&mut self) {
        if let Some(occupation) = self.occupation {
            let attrs = self.pools.attributes();
            self.points
                .retotal(occupation.skill_points(&attrs), personal_points(&attrs));
        }
    }

    /// The investigator as it would be committed now.
    pub fn preview(&self, at: DateTime<Utc>) -> Character {
        let attributes = self.pools.attributes();
        let maxima = rules::derive(&attributes, self.age);

        let mut character = Character::new(self.name.trim());
        character.owner = self.owner;
        character.occupation = self.occupation.map(|o| o.id.to_string()).unwrap_or_default();
        character.age = self.age;
        character.skills = starting_skills(&attributes)
            .into_iter()
            .map(|mut skill| {
                skill.added = self.points.added(&skill.name);
                skill
            })
            .collect();
        character.attributes = attributes;
        character.derived = DerivedStats::initial(&maxima);
        character.backstory = self.backstory.clone();
        for item in &self.items {
            character.give(item.clone(), at);
        }
        character.updated_at = at;
        character
    }

    /// Finish. Only legal at the summary step; the wizard is spent
    /// afterwards.
    pub fn commit(&mut self) -> CreationResult<Character> {
        self.require("commit", Step::Summary)?;
        let character = self.preview(Utc::now());
        self.step = Step::Committed;
        Ok(character)
    }
}
