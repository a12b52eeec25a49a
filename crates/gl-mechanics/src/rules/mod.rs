//! Rules engine: derived statistics from attributes.
//!
//! Every function here is pure. [`Rules`] bundles them behind the
//! [`DerivedCalculator`] seam so an investigator document can rebuild its
//! derived block without depending on this crate's internals.

use gl_core::{Attribute, Attributes, DerivedCalculator, DerivedMaxima};
use serde::{Deserialize, Serialize};

/// Maximum hit points: (CON + SIZ) / 10, rounded down.
pub fn hit_points(con: u32, siz: u32) -> u32 {
    (con + siz) / 10
}

/// Maximum magic points: POW / 5, rounded down.
pub fn magic_points(pow: u32) -> u32 {
    pow / 5
}

/// Starting sanity. Only used at creation; play tracks sanity separately.
pub fn sanity(pow: u32) -> u32 {
    pow
}

/// Half value, the hard success threshold.
pub fn half(value: u32) -> u32 {
    value / 2
}

/// Fifth value, the extreme success threshold.
pub fn fifth(value: u32) -> u32 {
    value / 5
}

/// Movement rate lost to age.
pub fn age_move_penalty(age: u32) -> u32 {
    match age {
        0..=39 => 0,
        40..=49 => 1,
        50..=59 => 2,
        60..=69 => 3,
        70..=79 => 4,
        _ => 5,
    }
}

/// Movement rate from age, STR, DEX, and SIZ.
pub fn move_rate(age: u32, str_: u32, dex: u32, siz: u32) -> u32 {
    let base: u32 = if dex < siz && str_ < siz {
        7
    } else if dex > siz && str_ > siz {
        9
    } else {
        8
    };
    base.saturating_sub(age_move_penalty(age))
}

/// Build and damage bonus, both keyed on STR + SIZ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Build modifier.
    pub build: i32,
    /// Damage bonus expression.
    pub damage_bonus: String,
}

/// Build and damage bonus for the given STR and SIZ.
///
/// Above 444 the table keeps going: every further 80 points (or part of
/// 80) adds one to build and one d6 to the bonus.
pub fn combat_stats(str_: u32, siz: u32) -> CombatStats {
    let total = str_ + siz;
    let (build, damage_bonus) = match total {
        0..=64 => (-2, "-2".to_string()),
        65..=84 => (-1, "-1".to_string()),
        85..=124 => (0, "none".to_string()),
        125..=164 => (1, "+1d4".to_string()),
        165..=204 => (2, "+1d6".to_string()),
        205..=284 => (3, "+2d6".to_string()),
        285..=364 => (4, "+3d6".to_string()),
        365..=444 => (5, "+4d6".to_string()),
        _ => {
            let extra = (total - 444).div_ceil(80) as i32;
            (5 + extra, format!("+{}d6", 4 + extra))
        }
    };
    CombatStats {
        build,
        damage_bonus,
    }
}

/// Derive every statistic at once.
pub fn derive(attributes: &Attributes, age: u32) -> DerivedMaxima {
    let get = |a| attributes.get(a);
    let combat = combat_stats(get(Attribute::Str), get(Attribute::Siz));
    DerivedMaxima {
        hit_points: hit_points(get(Attribute::Con), get(Attribute::Siz)) as i32,
        magic_points: magic_points(get(Attribute::Pow)) as i32,
        starting_sanity: sanity(get(Attribute::Pow)) as i32,
        move_rate: move_rate(
            age,
            get(Attribute::Str),
            get(Attribute::Dex),
            get(Attribute::Siz),
        ),
        build: combat.build,
        damage_bonus: combat.damage_bonus,
    }
}

/// The standard ruleset as a [`DerivedCalculator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Rules;

impl DerivedCalculator for Rules {
    fn derive(&self, attributes: &Attributes, age: u32) -> DerivedMaxima {
        derive(attributes, age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn combat_stats_table() {
        let cs = combat_stats(40, 40);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (-1, "-1"));
        let cs = combat_stats(60, 60);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (0, "none"));
        let cs = combat_stats(80, 90);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (2, "+1d6"));
        let cs = combat_stats(30, 30);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (-2, "-2"));
        let cs = combat_stats(200, 244);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (5, "+4d6"));
    }

    #[test]
    fn combat_stats_beyond_table() {
        let cs = combat_stats(200, 245);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (6, "+5d6"));
        let cs = combat_stats(300, 224);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (6, "+5d6"));
        let cs = combat_stats(300, 225);
        assert_eq!((cs.build, cs.damage_bonus.as_str()), (7, "+6d6"));
    }

    #[test]
    fn move_rate_cases() {
        assert_eq!(move_rate(25, 80, 80, 40), 9);
        assert_eq!(move_rate(65, 40, 40, 60), 4);
        assert_eq!(move_rate(30, 60, 40, 50), 8);
        assert_eq!(move_rate(30, 50, 50, 50), 8);
        assert_eq!(move_rate(85, 40, 40, 60), 2);
        assert_eq!(move_rate(45, 80, 80, 40), 8);
    }

    #[test]
    fn derive_fills_every_field() {
        let attrs = Attributes::from_values([
            (Attribute::Str, 50),
            (Attribute::Con, 60),
            (Attribute::Siz, 65),
            (Attribute::Dex, 70),
            (Attribute::Pow, 55),
        ]);
        let d = Rules.derive(&attrs, 42);
        assert_eq!(d.hit_points, 12);
        assert_eq!(d.magic_points, 11);
        assert_eq!(d.starting_sanity, 55);
        assert_eq!(d.move_rate, 7);
        assert_eq!(d.build, 0);
        assert_eq!(d.damage_bonus, "none");
    }

    proptest! {
        #[test]
        fn hit_points_formula(con in 15u32..=90, siz in 15u32..=90) {
            prop_assert_eq!(hit_points(con, siz), (con + siz) / 10);
        }

        #[test]
        fn pow_derived(pow in 15u32..=90) {
            prop_assert_eq!(magic_points(pow), pow / 5);
            prop_assert_eq!(sanity(pow), pow);
        }

        #[test]
        fn fifth_never_exceeds_half(v in 0u32..=100) {
            prop_assert!(fifth(v) <= half(v));
            prop_assert!(half(v) <= v);
        }

        #[test]
        fn build_is_monotonic(a in 2u32..=600, b in 2u32..=600) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(combat_stats(lo, 0).build <= combat_stats(hi, 0).build);
        }
    }
}
