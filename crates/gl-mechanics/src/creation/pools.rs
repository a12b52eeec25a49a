//! Rolled attribute values and their assignment to slots.
//!
//! Five values are rolled as 3d6×5 for STR, CON, DEX, APP and POW, three
//! as (2d6+6)×5 for SIZ, INT and EDU. Each value can sit in at most one
//! slot of its own pool. LUCK is rolled separately and never assigned.

use std::collections::BTreeMap;
use std::fmt;

use gl_core::{Attribute, Attributes};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dice::DiceNotation;
use crate::error::{CreationError, CreationResult};

/// Which roll a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// 3d6×5.
    Primary,
    /// (2d6+6)×5.
    Secondary,
}

impl Pool {
    /// The slots this pool feeds.
    pub fn slots(self) -> &'static [Attribute] {
        match self {
            Self::Primary => &[
                Attribute::Str,
                Attribute::Con,
                Attribute::Dex,
                Attribute::App,
                Attribute::Pow,
            ],
            Self::Secondary => &[Attribute::Siz, Attribute::Int, Attribute::Edu],
        }
    }

    /// The pool feeding `attr`, or `None` for LUCK.
    pub fn of(attr: Attribute) -> Option<Self> {
        [Self::Primary, Self::Secondary]
            .into_iter()
            .find(|p| p.slots().contains(&attr))
    }

    fn notation(self) -> DiceNotation {
        match self {
            Self::Primary => DiceNotation::new(3, 6),
            Self::Secondary => DiceNotation {
                count: 2,
                sides: 6,
                modifier: 6,
            },
        }
    }

    /// Roll one value for this pool.
    pub fn roll(self, rng: &mut StdRng) -> u32 {
        self.notation().roll(rng).total() * 5
    }

    fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One rolled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolledValue {
    /// Stable id within the current roll.
    pub id: usize,
    /// Source pool.
    pub pool: Pool,
    /// The value, already multiplied by five.
    pub value: u32,
}

/// The rolled values and which slot holds which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePools {
    values: Vec<RolledValue>,
    assignments: BTreeMap<Attribute, usize>,
    luck: Option<u32>,
}

impl AttributePools {
    /// Empty pools; nothing rolled yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build pools from fixed values, primary first. Useful for point-buy
    /// tables and tests.
    pub fn from_values(primary: [u32; 5], secondary: [u32; 3]) -> Self {
        let values = primary
            .into_iter()
            .map(|v| (Pool::Primary, v))
            .chain(secondary.into_iter().map(|v| (Pool::Secondary, v)))
            .enumerate()
            .map(|(id, (pool, value))| RolledValue { id, pool, value })
            .collect();
        Self {
            values,
            assignments: BTreeMap::new(),
            luck: None,
        }
    }

    /// Roll both pools, replacing any earlier roll and clearing every
    /// assignment. Luck is kept.
    pub fn roll(&mut self, rng: &mut StdRng) {
        let primary = [(); 5].map(|_| Pool::Primary.roll(rng));
        let secondary = [(); 3].map(|_| Pool::Secondary.roll(rng));
        let luck = self.luck;
        *self = Self::from_values(primary, secondary);
        self.luck = luck;
    }

    /// Roll luck as 3d6×5.
    pub fn roll_luck(&mut self, rng: &mut StdRng) -> u32 {
        let luck = Pool::Primary.roll(rng);
        self.luck = Some(luck);
        luck
    }

    /// Set luck directly.
    pub fn set_luck(&mut self, luck: u32) {
        self.luck = Some(luck);
    }

    /// Rolled luck.
    pub fn luck(&self) -> Option<u32> {
        self.luck
    }

    /// All rolled values.
    pub fn values(&self) -> &[RolledValue] {
        &self.values
    }

    /// Values not held by any slot.
    pub fn unassigned(&self) -> impl Iterator<Item = &RolledValue> {
        self.values
            .iter()
            .filter(|v| self.holder(v.id).is_none())
    }

    /// The slot currently holding value `id`.
    pub fn holder(&self, id: usize) -> Option<Attribute> {
        self.assignments
            .iter()
            .find(|&(_, &held)| held == id)
            .map(|(&attr, _)| attr)
    }

    /// Put value `id` into `attr`.
    ///
    /// If another slot held the value it is cleared; whatever `attr` held
    /// before goes back to the unassigned values.
    pub fn assign(&mut self, attr: Attribute, id: usize) -> CreationResult<()> {
        let slot_pool = Pool::of(attr).ok_or(CreationError::NotAssignable(attr))?;
        let rolled = self
            .values
            .get(id)
            .copied()
            .ok_or(CreationError::UnknownRoll(id))?;
        if rolled.pool != slot_pool {
            return Err(CreationError::WrongPool {
                attribute: attr,
                pool: rolled.pool.name(),
            });
        }
        if let Some(previous) = self.holder(id) {
            self.assignments.remove(&previous);
        }
        self.assignments.insert(attr, id);
        Ok(())
    }

    /// Clear a slot. Returns the released value id.
    pub fn unassign(&mut self, attr: Attribute) -> Option<usize> {
        self.assignments.remove(&attr)
    }

    /// The value in `attr`, if assigned.
    pub fn assigned(&self, attr: Attribute) -> Option<u32> {
        self.assignments
            .get(&attr)
            .and_then(|&id| self.values.get(id))
            .map(|v| v.value)
    }

    /// Every slot filled and luck rolled.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty() && self.luck.is_some()
    }

    /// Slots still empty.
    pub fn missing(&self) -> Vec<Attribute> {
        [Pool::Primary, Pool::Secondary]
            .into_iter()
            .flat_map(|p| p.slots().iter().copied())
            .filter(|a| !self.assignments.contains_key(a))
            .collect()
    }

    /// The attribute block as assigned so far, luck included.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        for &attr in self.assignments.keys() {
            if let Some(value) = self.assigned(attr) {
                attrs.set(attr, value);
            }
        }
        if let Some(luck) = self.luck {
            attrs.set(Attribute::Luck, luck);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn pools() -> AttributePools {
        AttributePools::from_values([40, 50, 60, 70, 80], [55, 65, 75])
    }

    #[test]
    fn assign_and_read_back() {
        let mut p = pools();
        p.assign(Attribute::Str, 0).unwrap();
        p.assign(Attribute::Siz, 6).unwrap();
        assert_eq!(p.assigned(Attribute::Str), Some(40));
        assert_eq!(p.assigned(Attribute::Siz), Some(65));
        assert_eq!(p.unassigned().count(), 6);
    }

    #[test]
    fn wrong_pool_is_rejected() {
        let mut p = pools();
        let err = p.assign(Attribute::Siz, 0).unwrap_err();
        assert_eq!(
            err,
            CreationError::WrongPool {
                attribute: Attribute::Siz,
                pool: "primary"
            }
        );
        assert!(p.assign(Attribute::Str, 5).is_err());
    }

    #[test]
    fn luck_is_not_a_slot() {
        let mut p = pools();
        assert_eq!(
            p.assign(Attribute::Luck, 0),
            Err(CreationError::NotAssignable(Attribute::Luck))
        );
    }

    #[test]
    fn unknown_roll_id() {
        let mut p = pools();
        assert_eq!(p.assign(Attribute::Str, 42), Err(CreationError::UnknownRoll(42)));
    }

    #[test]
    fn reassigning_a_value_moves_it() {
        let mut p = pools();
        p.assign(Attribute::Str, 2).unwrap();
        p.assign(Attribute::Dex, 2).unwrap();
        assert_eq!(p.assigned(Attribute::Str), None);
        assert_eq!(p.assigned(Attribute::Dex), Some(60));
        assert_eq!(p.holder(2), Some(Attribute::Dex));
    }

    #[test]
    fn reassigning_a_slot_releases_its_value() {
        let mut p = pools();
        p.assign(Attribute::Str, 0).unwrap();
        p.assign(Attribute::Str, 1).unwrap();
        assert_eq!(p.holder(0), None);
        assert_eq!(p.assigned(Attribute::Str), Some(50));
    }

    #[test]
    fn complete_needs_luck() {
        let mut p = pools();
        for (i, &attr) in Pool::Primary.slots().iter().enumerate() {
            p.assign(attr, i).unwrap();
        }
        for (i, &attr) in Pool::Secondary.slots().iter().enumerate() {
            p.assign(attr, 5 + i).unwrap();
        }
        assert!(p.missing().is_empty());
        assert!(!p.is_complete());
        p.set_luck(45);
        assert!(p.is_complete());
        assert!(p.attributes().is_complete());
    }

    #[test]
    fn rerolling_clears_assignments() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = AttributePools::new();
        p.roll(&mut rng);
        p.roll_luck(&mut rng);
        p.assign(Attribute::Pow, 0).unwrap();
        p.roll(&mut rng);
        assert_eq!(p.assigned(Attribute::Pow), None);
        assert!(p.luck().is_some());
        assert_eq!(p.values().len(), 8);
    }

    proptest! {
        #[test]
        fn rolled_values_stay_in_range(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = AttributePools::new();
            p.roll(&mut rng);
            for v in p.values() {
                prop_assert_eq!(v.value % 5, 0);
                match v.pool {
                    Pool::Primary => prop_assert!((15..=90).contains(&v.value)),
                    Pool::Secondary => prop_assert!((40..=90).contains(&v.value)),
                }
            }
        }

        #[test]
        fn a_value_never_sits_in_two_slots(moves in prop::collection::vec((0usize..5, 0usize..5), 1..20)) {
            let mut p = pools();
            let slots = Pool::Primary.slots();
            for (slot, id) in moves {
                p.assign(slots[slot], id).unwrap();
            }
            let held: Vec<u32> = slots.iter().filter_map(|&a| p.assigned(a)).collect();
            let mut dedup = held.clone();
            dedup.sort_unstable();
            dedup.dedup();
            prop_assert_eq!(held.len(), dedup.len());
        }
    }
}
