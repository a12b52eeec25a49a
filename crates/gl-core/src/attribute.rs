use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One of the nine named investigator attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    /// Strength.
    #[serde(rename = "STR")]
    Str,
    /// Constitution.
    #[serde(rename = "CON")]
    Con,
    /// Size.
    #[serde(rename = "SIZ")]
    Siz,
    /// Dexterity.
    #[serde(rename = "DEX")]
    Dex,
    /// Appearance.
    #[serde(rename = "APP")]
    App,
    /// Intelligence.
    #[serde(rename = "INT")]
    Int,
    /// Power.
    #[serde(rename = "POW")]
    Pow,
    /// Education.
    #[serde(rename = "EDU")]
    Edu,
    /// Luck. Spent during play rather than tested like the others.
    #[serde(rename = "LUCK")]
    Luck,
}

impl Attribute {
    /// All nine attributes in sheet order.
    pub const ALL: [Attribute; 9] = [
        Self::Str,
        Self::Con,
        Self::Siz,
        Self::Dex,
        Self::App,
        Self::Int,
        Self::Pow,
        Self::Edu,
        Self::Luck,
    ];

    /// The upper-case abbreviation printed on the sheet.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Con => "CON",
            Self::Siz => "SIZ",
            Self::Dex => "DEX",
            Self::App => "APP",
            Self::Int => "INT",
            Self::Pow => "POW",
            Self::Edu => "EDU",
            Self::Luck => "LUCK",
        }
    }

    /// Parse an abbreviation, case-insensitively.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|a| a.abbreviation() == upper)
            .ok_or_else(|| CoreError::UnknownAttribute(s.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// A rolled attribute and its value after in-play changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeValue {
    /// The value assigned at creation.
    pub base: u32,
    /// The value in play (aging, spent luck, injuries).
    pub current: u32,
}

impl AttributeValue {
    /// A fresh value where base and current agree.
    pub fn new(value: u32) -> Self {
        Self {
            base: value,
            current: value,
        }
    }

    /// Hard difficulty threshold: half the current value.
    pub fn half(&self) -> u32 {
        self.current / 2
    }

    /// Extreme difficulty threshold: a fifth of the current value.
    pub fn fifth(&self) -> u32 {
        self.current / 5
    }
}

/// The attribute block of an investigator sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<Attribute, AttributeValue>,
}

impl Attributes {
    /// An empty block; every attribute reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from `(attribute, value)` pairs.
    pub fn from_values(pairs: impl IntoIterator<Item = (Attribute, u32)>) -> Self {
        let mut attrs = Self::new();
        for (attr, value) in pairs {
            attrs.set(attr, value);
        }
        attrs
    }

    /// The current value of an attribute, or 0 if it was never set.
    pub fn get(&self, attr: Attribute) -> u32 {
        self.values.get(&attr).map(|v| v.current).unwrap_or(0)
    }

    /// The full base/current pair, if set.
    pub fn value(&self, attr: Attribute) -> Option<&AttributeValue> {
        self.values.get(&attr)
    }

    /// Set both base and current.
    pub fn set(&mut self, attr: Attribute, value: u32) {
        self.values.insert(attr, AttributeValue::new(value));
    }

    /// Change only the in-play value, keeping the base.
    pub fn set_current(&mut self, attr: Attribute, value: u32) {
        self.values
            .entry(attr)
            .and_modify(|v| v.current = value)
            .or_insert(AttributeValue {
                base: value,
                current: value,
            });
    }

    /// Returns true if every one of the nine attributes has a value.
    pub fn is_complete(&self) -> bool {
        Attribute::ALL.iter().all(|a| self.values.contains_key(a))
    }

    /// Iterate over the set attributes in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeValue)> {
        self.values.iter().map(|(a, v)| (*a, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Attribute::parse("str").unwrap(), Attribute::Str);
        assert_eq!(Attribute::parse(" Luck ").unwrap(), Attribute::Luck);
        assert!(Attribute::parse("cha").is_err());
    }

    #[test]
    fn unset_reads_zero() {
        let attrs = Attributes::new();
        assert_eq!(attrs.get(Attribute::Pow), 0);
        assert!(!attrs.is_complete());
    }

    #[test]
    fn set_current_keeps_base() {
        let mut attrs = Attributes::from_values([(Attribute::Luck, 55)]);
        attrs.set_current(Attribute::Luck, 40);
        let v = attrs.value(Attribute::Luck).unwrap();
        assert_eq!(v.base, 55);
        assert_eq!(v.current, 40);
    }

    #[test]
    fn half_and_fifth() {
        let v = AttributeValue::new(65);
        assert_eq!(v.half(), 32);
        assert_eq!(v.fifth(), 13);
    }

    #[test]
    fn serializes_with_abbreviations() {
        let attrs = Attributes::from_values([(Attribute::Str, 50), (Attribute::Edu, 70)]);
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json["STR"]["base"], 50);
        assert_eq!(json["EDU"]["current"], 70);
    }
}
