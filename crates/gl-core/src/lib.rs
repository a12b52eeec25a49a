//! Core types for Gaslight: investigators, attributes, skills, and equipment.
//!
//! This crate defines the investigator document that the backing store keeps
//! in its `investigators` table. It carries no rules of its own: derived
//! statistics are filled in through the [`DerivedCalculator`] seam, which
//! `gl-mechanics` implements.

/// The nine named attributes and their base/current pairs.
pub mod attribute;
/// The investigator document: sheet, status flags, backstory.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// UUID-backed identifier newtypes.
pub mod id;
/// Equipment definitions and inventory instances.
pub mod item;
/// Skills with base chance, allocated points, and improvement flags.
pub mod skill;
/// Clamped numeric resources (hit points, sanity, magic points).
pub mod track;

/// Re-export attribute types.
pub use attribute::{Attribute, AttributeValue, Attributes};
/// Re-export the investigator document types.
pub use character::{
    Backstory, Character, CharacterStatus, DerivedCalculator, DerivedMaxima, DerivedStats,
    MadnessState, Weapon,
};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export identifier types.
pub use id::{CharacterId, UserId};
/// Re-export equipment types.
pub use item::{EquipmentItem, InventoryItem, ItemCategory};
/// Re-export skill types.
pub use skill::Skill;
/// Re-export the track type.
pub use track::Track;

/// Re-exported so [`define_id!`] expands in downstream crates.
pub use uuid::Uuid;
#[doc(hidden)]
pub use uuid;
