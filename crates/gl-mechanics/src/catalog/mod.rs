//! Built-in game content: skills, occupations, and equipment.

pub mod equipment;
pub mod occupations;
pub mod skills;

pub use equipment::{builtin_items, find_item};
pub use occupations::{Occupation, SkillPointFormula, find_occupation, occupations};
pub use skills::{CREDIT_RATING, SkillBase, SkillDef, find_skill, skill_defs, starting_skills};
