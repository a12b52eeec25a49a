//! Investigator creation.
//!
//! [`CreationWizard`] walks a player through a fixed sequence of steps and
//! produces a finished [`gl_core::Character`] on commit. Attribute values
//! come from [`AttributePools`]; skill points are tracked by
//! [`SkillPoints`].

pub mod points;
pub mod pools;
pub mod wizard;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use points::{PointPool, SkillAllocation, SkillPoints};
pub use pools::{AttributePools, Pool, RolledValue};
pub use wizard::CreationWizard;

/// A wizard step, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Name and owner.
    Identity,
    /// Rolling and assigning attributes.
    Attributes,
    /// Occupation and skill points.
    Occupation,
    /// Starting equipment.
    Inventory,
    /// Age and backstory.
    Appearance,
    /// Final review.
    Summary,
    /// Terminal; the investigator exists.
    Committed,
}

impl Step {
    /// The step after this one. `Summary` only advances through commit.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::Attributes),
            Self::Attributes => Some(Self::Occupation),
            Self::Occupation => Some(Self::Inventory),
            Self::Inventory => Some(Self::Appearance),
            Self::Appearance => Some(Self::Summary),
            Self::Summary | Self::Committed => None,
        }
    }

    /// The step before this one.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Identity | Self::Committed => None,
            Self::Attributes => Some(Self::Identity),
            Self::Occupation => Some(Self::Attributes),
            Self::Inventory => Some(Self::Occupation),
            Self::Appearance => Some(Self::Inventory),
            Self::Summary => Some(Self::Appearance),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Attributes => write!(f, "attributes"),
            Self::Occupation => write!(f, "occupation"),
            Self::Inventory => write!(f, "inventory"),
            Self::Appearance => write!(f, "appearance"),
            Self::Summary => write!(f, "summary"),
            Self::Committed => write!(f, "committed"),
        }
    }
}
