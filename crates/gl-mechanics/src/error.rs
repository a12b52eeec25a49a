//! Error types for the mechanics engine.

use gl_core::Attribute;

use crate::creation::Step;

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice expression could not be parsed.
    #[error("invalid dice notation: {0}")]
    InvalidNotation(String),

    /// A post-roll option is not available for this roll.
    #[error("not allowed: {0}")]
    NotAllowed(String),

    /// An investigator document error.
    #[error(transparent)]
    Core(#[from] gl_core::CoreError),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;

/// Errors raised by the creation wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreationError {
    /// The wizard was already committed; nothing may change.
    #[error("investigator already committed")]
    AlreadyCommitted,

    /// A step guard blocked the transition.
    #[error("cannot leave {step}: {reason}")]
    Incomplete {
        /// The step that could not be left.
        step: Step,
        /// What is missing.
        reason: String,
    },

    /// The action is not valid at the current step.
    #[error("{action} is not available during {step}")]
    WrongStep {
        /// The attempted action.
        action: &'static str,
        /// The current step.
        step: Step,
    },

    /// The rolled value id does not exist.
    #[error("no rolled value with id {0}")]
    UnknownRoll(usize),

    /// A rolled value was assigned to a slot of the other pool.
    #[error("{attribute} cannot take a value from the {pool} pool")]
    WrongPool {
        /// The target slot.
        attribute: Attribute,
        /// The pool the value came from.
        pool: &'static str,
    },

    /// The attribute is not an assignable slot (LUCK).
    #[error("{0} is not an assignable slot")]
    NotAssignable(Attribute),

    /// Points must move in steps of five.
    #[error("skill points must be spent in steps of 5, got {0}")]
    NotMultipleOfFive(i32),

    /// The spend would overdraw the pool.
    #[error("not enough {pool} points: {remaining} left, {requested} requested")]
    InsufficientPoints {
        /// Which pool.
        pool: &'static str,
        /// Points left.
        remaining: u32,
        /// Points asked for.
        requested: u32,
    },

    /// A refund would take a skill's allocation below zero.
    #[error("cannot refund {requested} points from {skill}: only {spent} spent")]
    OverRefund {
        /// Skill name.
        skill: String,
        /// Points currently allocated from this pool.
        spent: u32,
        /// Points asked back.
        requested: u32,
    },

    /// Occupation points only go to occupation skills.
    #[error("{0} is not an occupation skill")]
    NotOccupationSkill(String),

    /// The skill is unknown or barred from allocation.
    #[error("cannot allocate points to {0}")]
    SkillNotAllocatable(String),

    /// The occupation id is not in the catalog.
    #[error("unknown occupation: {0}")]
    UnknownOccupation(String),

    /// The catalog item id is not known.
    #[error("unknown item: {0}")]
    UnknownItem(String),
}

/// Result type for wizard operations.
pub type CreationResult<T> = Result<T, CreationError>;
