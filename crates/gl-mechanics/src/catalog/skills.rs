//! The skill list and base chances.

use gl_core::{Attribute, Attributes, Skill};

/// How a skill's base chance is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillBase {
    /// A fixed percentage.
    Fixed(u32),
    /// Half of DEX (Dodge).
    HalfDex,
    /// Equal to EDU (Language (Own)).
    Edu,
}

/// A skill in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDef {
    /// Skill name as printed on the sheet.
    pub name: &'static str,
    /// Base chance.
    pub base: SkillBase,
    /// Whether successful use earns an improvement check.
    pub improvable: bool,
}

impl SkillDef {
    /// The base chance for an investigator with these attributes.
    pub fn base_for(&self, attributes: &Attributes) -> u32 {
        match self.base {
            SkillBase::Fixed(n) => n,
            SkillBase::HalfDex => attributes.get(Attribute::Dex) / 2,
            SkillBase::Edu => attributes.get(Attribute::Edu),
        }
    }
}

/// Credit Rating, part of every occupation.
pub const CREDIT_RATING: &str = "Credit Rating";

const fn fixed(name: &'static str, base: u32) -> SkillDef {
    SkillDef {
        name,
        base: SkillBase::Fixed(base),
        improvable: true,
    }
}

const SKILLS: &[SkillDef] = &[
    fixed("Accounting", 5),
    fixed("Anthropology", 1),
    fixed("Appraise", 5),
    fixed("Archaeology", 1),
    fixed("Art/Craft", 5),
    fixed("Charm", 15),
    fixed("Climb", 20),
    SkillDef {
        name: CREDIT_RATING,
        base: SkillBase::Fixed(0),
        improvable: false,
    },
    SkillDef {
        name: gl_core::character::MYTHOS_SKILL,
        base: SkillBase::Fixed(0),
        improvable: false,
    },
    fixed("Disguise", 5),
    SkillDef {
        name: "Dodge",
        base: SkillBase::HalfDex,
        improvable: true,
    },
    fixed("Drive Auto", 20),
    fixed("Electrical Repair", 10),
    fixed("Fast Talk", 5),
    fixed("Fighting (Brawl)", 25),
    fixed("Firearms (Handgun)", 20),
    fixed("Firearms (Rifle/Shotgun)", 25),
    fixed("First Aid", 30),
    fixed("History", 5),
    fixed("Intimidate", 15),
    fixed("Jump", 20),
    fixed("Language (Other)", 1),
    SkillDef {
        name: "Language (Own)",
        base: SkillBase::Edu,
        improvable: true,
    },
    fixed("Law", 5),
    fixed("Library Use", 20),
    fixed("Listen", 20),
    fixed("Locksmith", 1),
    fixed("Mechanical Repair", 10),
    fixed("Medicine", 1),
    fixed("Natural World", 10),
    fixed("Navigate", 10),
    fixed("Occult", 5),
    fixed("Operate Heavy Machinery", 1),
    fixed("Persuade", 10),
    fixed("Photography", 5),
    fixed("Psychoanalysis", 1),
    fixed("Psychology", 10),
    fixed("Ride", 5),
    fixed("Science", 1),
    fixed("Sleight of Hand", 10),
    fixed("Spot Hidden", 25),
    fixed("Stealth", 20),
    fixed("Survival", 10),
    fixed("Swim", 20),
    fixed("Throw", 20),
    fixed("Track", 10),
];

/// All skills in sheet order.
pub fn skill_defs() -> &'static [SkillDef] {
    SKILLS
}

/// Look up a skill definition by name, case-insensitively.
pub fn find_skill(name: &str) -> Option<&'static SkillDef> {
    let name = name.trim();
    SKILLS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Every skill at its base chance for the given attributes.
pub fn starting_skills(attributes: &Attributes) -> Vec<Skill> {
    SKILLS
        .iter()
        .map(|def| Skill::new(def.name, def.base_for(attributes)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_based_skills() {
        let attrs = Attributes::from_values([(Attribute::Dex, 65), (Attribute::Edu, 80)]);
        let skills = starting_skills(&attrs);
        let dodge = skills.iter().find(|s| s.name == "Dodge").unwrap();
        assert_eq!(dodge.base, 32);
        let own = skills.iter().find(|s| s.name == "Language (Own)").unwrap();
        assert_eq!(own.base, 80);
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find_skill("spot hidden").map(|s| s.name), Some("Spot Hidden"));
        assert!(find_skill("Basket Weaving").is_none());
    }

    #[test]
    fn mythos_and_credit_do_not_improve() {
        assert!(!find_skill(CREDIT_RATING).unwrap().improvable);
        assert!(!find_skill("Cthulhu Mythos").unwrap().improvable);
        assert!(find_skill("Library Use").unwrap().improvable);
    }
}
