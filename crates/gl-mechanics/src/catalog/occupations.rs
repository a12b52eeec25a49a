//! Occupations: skill-point formulas and class skills.

use std::fmt;

use gl_core::{Attribute, Attributes};

use super::skills::CREDIT_RATING;

/// How an occupation turns attributes into occupation skill points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillPointFormula {
    /// EDU × 4.
    EduTimesFour,
    /// EDU × 2 + the given attribute × 2.
    EduPlus(Attribute),
    /// EDU × 2 + the better of two attributes × 2.
    EduPlusBest(Attribute, Attribute),
}

impl SkillPointFormula {
    /// Occupation points for these attributes.
    pub fn points(&self, attrs: &Attributes) -> u32 {
        let edu = attrs.get(Attribute::Edu);
        match *self {
            Self::EduTimesFour => edu * 4,
            Self::EduPlus(a) => edu * 2 + attrs.get(a) * 2,
            Self::EduPlusBest(a, b) => edu * 2 + attrs.get(a).max(attrs.get(b)) * 2,
        }
    }
}

impl fmt::Display for SkillPointFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EduTimesFour => write!(f, "EDU×4"),
            Self::EduPlus(a) => write!(f, "EDU×2 + {a}×2"),
            Self::EduPlusBest(a, b) => write!(f, "EDU×2 + max({a},{b})×2"),
        }
    }
}

/// An occupation in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupation {
    /// Catalog id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Skill-point formula.
    pub formula: SkillPointFormula,
    /// Credit Rating range.
    pub credit_rating: (u32, u32),
    /// Class skills, not counting Credit Rating.
    pub skills: &'static [&'static str],
}

impl Occupation {
    /// Returns true if occupation points may be spent on `skill`.
    /// Credit Rating always qualifies.
    pub fn is_class_skill(&self, skill: &str) -> bool {
        let skill = skill.trim();
        skill.eq_ignore_ascii_case(CREDIT_RATING)
            || self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }

    /// Occupation skill points for these attributes.
    pub fn skill_points(&self, attrs: &Attributes) -> u32 {
        self.formula.points(attrs)
    }
}

use Attribute::{App, Dex, Pow, Str};
use SkillPointFormula::{EduPlus, EduPlusBest, EduTimesFour};

const OCCUPATIONS: &[Occupation] = &[
    Occupation {
        id: "antiquarian",
        name: "Antiquarian",
        formula: EduTimesFour,
        credit_rating: (30, 70),
        skills: &[
            "Appraise",
            "Art/Craft",
            "History",
            "Library Use",
            "Language (Other)",
            "Spot Hidden",
            "Charm",
            "Persuade",
        ],
    },
    Occupation {
        id: "artist",
        name: "Artist",
        formula: EduPlusBest(Pow, Dex),
        credit_rating: (9, 50),
        skills: &[
            "Art/Craft",
            "History",
            "Natural World",
            "Language (Other)",
            "Psychology",
            "Spot Hidden",
            "Charm",
            "Fast Talk",
        ],
    },
    Occupation {
        id: "author",
        name: "Author",
        formula: EduTimesFour,
        credit_rating: (9, 30),
        skills: &[
            "Art/Craft",
            "History",
            "Library Use",
            "Natural World",
            "Occult",
            "Language (Other)",
            "Language (Own)",
            "Psychology",
        ],
    },
    Occupation {
        id: "dilettante",
        name: "Dilettante",
        formula: EduPlus(App),
        credit_rating: (50, 99),
        skills: &[
            "Art/Craft",
            "Firearms (Handgun)",
            "Language (Other)",
            "Ride",
            "Charm",
            "Persuade",
            "Fast Talk",
            "Intimidate",
        ],
    },
    Occupation {
        id: "doctor",
        name: "Doctor of Medicine",
        formula: EduTimesFour,
        credit_rating: (30, 80),
        skills: &[
            "First Aid",
            "Language (Other)",
            "Medicine",
            "Psychology",
            "Science",
            "Psychoanalysis",
            "Library Use",
            "Persuade",
        ],
    },
    Occupation {
        id: "journalist",
        name: "Journalist",
        formula: EduTimesFour,
        credit_rating: (9, 30),
        skills: &[
            "Art/Craft",
            "History",
            "Library Use",
            "Language (Own)",
            "Psychology",
            "Photography",
            "Fast Talk",
            "Persuade",
        ],
    },
    Occupation {
        id: "librarian",
        name: "Librarian",
        formula: EduTimesFour,
        credit_rating: (9, 35),
        skills: &[
            "Accounting",
            "Library Use",
            "Language (Other)",
            "Language (Own)",
            "History",
            "Occult",
            "Spot Hidden",
            "Persuade",
        ],
    },
    Occupation {
        id: "nurse",
        name: "Nurse",
        formula: EduTimesFour,
        credit_rating: (9, 30),
        skills: &[
            "First Aid",
            "Listen",
            "Medicine",
            "Psychology",
            "Science",
            "Spot Hidden",
            "Charm",
            "Persuade",
        ],
    },
    Occupation {
        id: "parapsychologist",
        name: "Parapsychologist",
        formula: EduTimesFour,
        credit_rating: (9, 30),
        skills: &[
            "Anthropology",
            "Art/Craft",
            "History",
            "Library Use",
            "Occult",
            "Language (Other)",
            "Photography",
            "Psychology",
        ],
    },
    Occupation {
        id: "police-detective",
        name: "Police Detective",
        formula: EduPlusBest(Dex, Str),
        credit_rating: (20, 50),
        skills: &[
            "Disguise",
            "Firearms (Handgun)",
            "Law",
            "Listen",
            "Psychology",
            "Spot Hidden",
            "Intimidate",
            "Persuade",
        ],
    },
    Occupation {
        id: "private-investigator",
        name: "Private Investigator",
        formula: EduPlusBest(Dex, Str),
        credit_rating: (9, 30),
        skills: &[
            "Disguise",
            "Law",
            "Library Use",
            "Photography",
            "Psychology",
            "Spot Hidden",
            "Locksmith",
            "Fast Talk",
        ],
    },
    Occupation {
        id: "professor",
        name: "Professor",
        formula: EduTimesFour,
        credit_rating: (20, 70),
        skills: &[
            "Library Use",
            "Language (Other)",
            "Language (Own)",
            "Psychology",
            "History",
            "Science",
            "Anthropology",
            "Persuade",
        ],
    },
    Occupation {
        id: "soldier",
        name: "Soldier",
        formula: EduPlusBest(Dex, Str),
        credit_rating: (9, 30),
        skills: &[
            "Climb",
            "Dodge",
            "Fighting (Brawl)",
            "Firearms (Rifle/Shotgun)",
            "Stealth",
            "Survival",
            "First Aid",
            "Mechanical Repair",
        ],
    },
];

/// All occupations.
pub fn occupations() -> &'static [Occupation] {
    OCCUPATIONS
}

/// Look up an occupation by id.
pub fn find_occupation(id: &str) -> Option<&'static Occupation> {
    OCCUPATIONS.iter().find(|o| o.id == id.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::skills::find_skill;

    fn attrs() -> Attributes {
        Attributes::from_values([
            (Attribute::Edu, 70),
            (Attribute::Str, 45),
            (Attribute::Dex, 60),
            (Attribute::App, 50),
        ])
    }

    #[test]
    fn formulas() {
        assert_eq!(EduTimesFour.points(&attrs()), 280);
        assert_eq!(EduPlus(App).points(&attrs()), 240);
        assert_eq!(EduPlusBest(Dex, Str).points(&attrs()), 260);
    }

    #[test]
    fn credit_rating_is_always_a_class_skill() {
        let pi = find_occupation("private-investigator").unwrap();
        assert!(pi.is_class_skill("credit rating"));
        assert!(pi.is_class_skill("Locksmith"));
        assert!(!pi.is_class_skill("Medicine"));
    }

    #[test]
    fn every_class_skill_exists() {
        for occ in occupations() {
            for skill in occ.skills {
                assert!(find_skill(skill).is_some(), "{} lists unknown {skill}", occ.id);
            }
        }
    }

    #[test]
    fn formula_display() {
        assert_eq!(EduPlusBest(Dex, Str).to_string(), "EDU×2 + max(DEX,STR)×2");
    }
}
