use serde::{Deserialize, Serialize};

/// A percentile skill on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name, e.g. "Spot Hidden".
    pub name: String,
    /// Base chance before any points are spent.
    pub base: u32,
    /// Occupation, personal-interest, and development points added on top.
    pub added: u32,
    /// Ticked after a successful use; cleared in the development phase.
    #[serde(default)]
    pub improvement_check: bool,
}

impl Skill {
    /// A skill at its base chance.
    pub fn new(name: impl Into<String>, base: u32) -> Self {
        Self {
            name: name.into(),
            base,
            added: 0,
            improvement_check: false,
        }
    }

    /// Total chance: base plus added points.
    pub fn value(&self) -> u32 {
        self.base + self.added
    }

    /// Hard difficulty threshold.
    pub fn half(&self) -> u32 {
        self.value() / 2
    }

    /// Extreme difficulty threshold.
    pub fn fifth(&self) -> u32 {
        self.value() / 5
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_includes_added_points() {
        let mut s = Skill::new("Library Use", 20);
        s.added = 45;
        assert_eq!(s.value(), 65);
        assert_eq!(s.half(), 32);
        assert_eq!(s.fifth(), 13);
    }

    #[test]
    fn name_match_ignores_case() {
        let s = Skill::new("Spot Hidden", 25);
        assert!(s.is_named("spot hidden"));
        assert!(!s.is_named("Listen"));
    }
}
