//! The investigator document.
//!
//! A [`Character`] is stored whole as a JSON blob. Derived statistics are a
//! cache of what the rules compute from attributes and age; they are only
//! ever rebuilt through [`Character::recompute_derived`], never edited on
//! their own.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, Attributes};
use crate::error::{CoreError, CoreResult};
use crate::id::{CharacterId, UserId};
use crate::item::{EquipmentItem, InventoryItem};
use crate::skill::Skill;
use crate::track::Track;

/// Sanity can never exceed this, less the investigator's Cthulhu Mythos.
pub const SANITY_CEILING: i32 = 99;

/// Name of the skill that erodes maximum sanity.
pub const MYTHOS_SKILL: &str = "Cthulhu Mythos";

/// Mental state flag shown on the Keeper's party view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MadnessState {
    /// Sane, for now.
    #[default]
    Normal,
    /// Temporary insanity following a large single sanity loss.
    BoutOfMadness,
    /// Indefinite insanity following heavy loss over a day.
    UnderlyingInsanity,
}

impl fmt::Display for MadnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::BoutOfMadness => write!(f, "bout of madness"),
            Self::UnderlyingInsanity => write!(f, "underlying insanity"),
        }
    }
}

/// Status flags toggled during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterStatus {
    /// Set when a single wound takes half or more of maximum hit points.
    pub major_wound: bool,
    /// Current mental state.
    pub madness: MadnessState,
}

/// A weapon line on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// Weapon name.
    pub name: String,
    /// Skill rolled to attack with it.
    pub skill: String,
    /// Damage expression, e.g. "1d10".
    pub damage: String,
    /// Range, or "touch".
    pub range: String,
    /// Attacks per round.
    pub attacks: u32,
    /// Rounds in the gun, if any.
    pub ammo: Option<u32>,
    /// Malfunction number, if any.
    pub malfunction: Option<u32>,
}

/// Free-text backstory fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backstory {
    /// Personal description.
    pub description: String,
    /// Ideology and beliefs.
    pub ideology: String,
    /// Significant people.
    pub significant_people: String,
    /// Meaningful locations.
    pub meaningful_locations: String,
    /// Treasured possessions.
    pub treasured_possessions: String,
    /// Traits.
    pub traits: String,
    /// Injuries and scars.
    pub injuries: String,
    /// Phobias and manias.
    pub phobias: String,
    /// Encounters with strange entities.
    pub encounters: String,
}

/// Values the rules derive from attributes and age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMaxima {
    /// Maximum hit points.
    pub hit_points: i32,
    /// Maximum magic points.
    pub magic_points: i32,
    /// Sanity at character creation.
    pub starting_sanity: i32,
    /// Movement rate.
    pub move_rate: u32,
    /// Build modifier.
    pub build: i32,
    /// Damage bonus expression ("-2", "none", "+1d4", ...).
    pub damage_bonus: String,
}

/// Computes [`DerivedMaxima`] from an attribute block.
///
/// Implemented by the rules engine; kept as a seam so this crate stays free
/// of game rules.
pub trait DerivedCalculator {
    /// Derive maxima from attributes and age.
    fn derive(&self, attributes: &Attributes, age: u32) -> DerivedMaxima;
}

/// Derived statistics as stored on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Hit points.
    pub hit_points: Track,
    /// Sanity. Current value is only changed by play.
    pub sanity: Track,
    /// Magic points.
    pub magic_points: Track,
    /// Movement rate.
    pub move_rate: u32,
    /// Build modifier.
    pub build: i32,
    /// Damage bonus expression.
    pub damage_bonus: String,
}

impl DerivedStats {
    /// Fresh derived stats for a newly created investigator.
    pub fn initial(maxima: &DerivedMaxima) -> Self {
        Self {
            hit_points: Track::full(maxima.hit_points),
            sanity: Track::with_current(maxima.starting_sanity, SANITY_CEILING),
            magic_points: Track::full(maxima.magic_points),
            move_rate: maxima.move_rate,
            build: maxima.build,
            damage_bonus: maxima.damage_bonus.clone(),
        }
    }
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self {
            hit_points: Track::default(),
            sanity: Track::with_current(0, SANITY_CEILING),
            magic_points: Track::default(),
            move_rate: 8,
            build: 0,
            damage_bonus: "none".to_string(),
        }
    }
}

/// A player-controlled investigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Row id.
    pub id: CharacterId,
    /// Profile that owns this investigator.
    pub owner: Option<UserId>,
    /// Investigator name.
    pub name: String,
    /// Occupation catalog id.
    pub occupation: String,
    /// Age in years.
    pub age: u32,
    /// Attribute block.
    pub attributes: Attributes,
    /// Derived statistics; see [`Character::recompute_derived`].
    pub derived: DerivedStats,
    /// Skills in sheet order.
    pub skills: Vec<Skill>,
    /// Weapons.
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    /// Backstory.
    #[serde(default)]
    pub backstory: Backstory,
    /// Carried equipment.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Status flags.
    #[serde(default)]
    pub status: CharacterStatus,
    /// Last local modification.
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// A blank investigator with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            owner: None,
            name: name.into(),
            occupation: String::new(),
            age: 25,
            attributes: Attributes::new(),
            derived: DerivedStats::default(),
            skills: Vec::new(),
            weapons: Vec::new(),
            backstory: Backstory::default(),
            inventory: Vec::new(),
            status: CharacterStatus::default(),
            updated_at: Utc::now(),
        }
    }

    /// Look up a skill by name, case-insensitively.
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.is_named(name))
    }

    /// Mutable skill lookup.
    pub fn skill_mut(&mut self, name: &str) -> CoreResult<&mut Skill> {
        self.skills
            .iter_mut()
            .find(|s| s.is_named(name))
            .ok_or_else(|| CoreError::SkillNotFound(name.to_string()))
    }

    /// The chance for a skill, or for an attribute when `name` is one.
    /// Unknown names read as 0.
    pub fn target_for(&self, name: &str) -> u32 {
        if let Some(skill) = self.skill(name) {
            return skill.value();
        }
        Attribute::parse(name)
            .map(|a| self.attributes.get(a))
            .unwrap_or(0)
    }

    /// Current luck.
    pub fn luck(&self) -> u32 {
        self.attributes.get(Attribute::Luck)
    }

    /// Rebuild derived maxima from attributes and age.
    ///
    /// Current hit points and magic points are clamped into the new range.
    /// Current sanity is left alone apart from the ceiling imposed by
    /// Cthulhu Mythos.
    pub fn recompute_derived(&mut self, calc: &impl DerivedCalculator) {
        let maxima = calc.derive(&self.attributes, self.age);
        self.derived.hit_points.set_max(maxima.hit_points);
        self.derived.magic_points.set_max(maxima.magic_points);
        let mythos = self.skill(MYTHOS_SKILL).map(|s| s.value()).unwrap_or(0) as i32;
        self.derived.sanity.set_max((SANITY_CEILING - mythos).max(0));
        self.derived.move_rate = maxima.move_rate;
        self.derived.build = maxima.build;
        self.derived.damage_bonus = maxima.damage_bonus;
        self.touch();
    }

    /// Overwrite the status flags. Returns true if anything changed.
    ///
    /// Absolute assignment, so applying the same status twice is the same as
    /// applying it once.
    pub fn apply_status(&mut self, status: CharacterStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.touch();
        true
    }

    /// Add a catalog item to the inventory and return the new instance.
    pub fn give(&mut self, item: EquipmentItem, at: DateTime<Utc>) -> &InventoryItem {
        let instance = InventoryItem::stamp(item, at, &self.inventory);
        self.inventory.push(instance);
        self.touch();
        &self.inventory[self.inventory.len() - 1]
    }

    /// Remove an inventory instance.
    pub fn take(&mut self, instance_id: &str) -> CoreResult<InventoryItem> {
        let pos = self
            .inventory
            .iter()
            .position(|i| i.instance_id == instance_id)
            .ok_or_else(|| CoreError::ItemNotFound(instance_id.to_string()))?;
        self.touch();
        Ok(self.inventory.remove(pos))
    }

    /// Serialize to the JSON document stored in the backing store.
    pub fn to_document(&self) -> CoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read an investigator back from its stored document.
    pub fn from_document(doc: serde_json::Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(doc)?)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
