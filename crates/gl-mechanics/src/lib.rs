//! Game mechanics for Gaslight.
//!
//! Percentile dice with bonus and penalty dice, degree-of-success
//! resolution with luck spends and pushed rolls, the rules that derive hit
//! points, sanity and combat stats from attributes, the skill, occupation
//! and equipment catalogs, the investigator creation wizard, and the
//! changes play makes to a sheet.

pub mod catalog;
pub mod creation;
pub mod dice;
pub mod error;
pub mod resolution;
pub mod rules;
pub mod sheet;

pub use creation::{CreationWizard, Step};
pub use dice::{
    DiceNotation, DicePool, Die, DieResult, PercentileModifier, PercentileRoll,
    RollResult, roll_percentile,
};
pub use error::{CreationError, CreationResult, MechError, MechResult};
pub use resolution::{
    OpposedWinner, PostRollOptions, RollUnder, SkillCheck, SuccessLevel, classify, opposed,
};
pub use rules::{CombatStats, Rules};
pub use sheet::{SanityLedger, apply_damage, develop_skills, mark_improvement};
