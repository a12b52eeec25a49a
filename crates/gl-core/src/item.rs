//! Equipment definitions and inventory instances.
//!
//! Catalog entries are immutable. Handing one to an investigator creates an
//! [`InventoryItem`] with its own instance id derived from the catalog id and
//! the moment it was handed out.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad grouping used to sort and filter catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Firearms, blades, clubs.
    Weapon,
    /// Lanterns, lockpicks, cameras.
    Tool,
    /// First-aid kits, medicine.
    Medical,
    /// Letters, tomes, maps, clippings.
    Document,
    /// Coats, disguises.
    Clothing,
    /// Talismans and other things best left alone.
    Occult,
    /// Anything else.
    Misc,
}

impl ItemCategory {
    /// Parse a category name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Some(Self::Weapon),
            "tool" => Some(Self::Tool),
            "medical" => Some(Self::Medical),
            "document" => Some(Self::Document),
            "clothing" => Some(Self::Clothing),
            "occult" => Some(Self::Occult),
            "misc" => Some(Self::Misc),
            _ => None,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Tool => write!(f, "tool"),
            Self::Medical => write!(f, "medical"),
            Self::Document => write!(f, "document"),
            Self::Clothing => write!(f, "clothing"),
            Self::Occult => write!(f, "occult"),
            Self::Misc => write!(f, "misc"),
        }
    }
}

/// An immutable catalog definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    /// Catalog id, stable across sessions (e.g. "revolver-38").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grouping.
    pub category: ItemCategory,
    /// Flavor text.
    pub description: String,
    /// Free-form stats such as damage or range.
    #[serde(default)]
    pub stats: BTreeMap<String, String>,
}

impl EquipmentItem {
    /// Create an item with no stats.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ItemCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            stats: BTreeMap::new(),
        }
    }

    /// Add a stat line.
    pub fn with_stat(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.stats.insert(key.into(), value.into());
        self
    }
}

/// A catalog item held by an investigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique within the owning inventory.
    pub instance_id: String,
    /// The catalog definition this instance was made from.
    pub item: EquipmentItem,
    /// How many are carried.
    pub quantity: u32,
}

impl InventoryItem {
    /// Create an instance of `item` stamped at `at`.
    ///
    /// The id is `{catalog_id}-{unix_millis}`; when that id is already in
    /// `existing`, the millisecond component is bumped until it is free.
    pub fn stamp(item: EquipmentItem, at: DateTime<Utc>, existing: &[InventoryItem]) -> Self {
        let mut millis = at.timestamp_millis();
        let instance_id = loop {
            let candidate = format!("{}-{millis}", item.id);
            if !existing.iter().any(|i| i.instance_id == candidate) {
                break candidate;
            }
            millis += 1;
        };
        Self {
            instance_id,
            item,
            quantity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lantern() -> EquipmentItem {
        EquipmentItem::new("lantern", "Oil Lantern", ItemCategory::Tool, "Smells of kerosene.")
    }

    #[test]
    fn instance_id_uses_catalog_id_and_time() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let inst = InventoryItem::stamp(lantern(), at, &[]);
        assert_eq!(inst.instance_id, "lantern-1700000000123");
        assert_eq!(inst.quantity, 1);
    }

    #[test]
    fn same_millisecond_gets_bumped() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let first = InventoryItem::stamp(lantern(), at, &[]);
        let second = InventoryItem::stamp(lantern(), at, std::slice::from_ref(&first));
        assert_ne!(first.instance_id, second.instance_id);
        assert_eq!(second.instance_id, "lantern-1700000000124");
    }

    #[test]
    fn category_parse_and_display() {
        assert_eq!(ItemCategory::parse("Weapon"), Some(ItemCategory::Weapon));
        assert_eq!(ItemCategory::parse("gadget"), None);
        assert_eq!(ItemCategory::Occult.to_string(), "occult");
    }

    #[test]
    fn stats_builder() {
        let item = lantern().with_stat("burn time", "6 hours");
        assert_eq!(item.stats.get("burn time").map(String::as_str), Some("6 hours"));
    }
}
