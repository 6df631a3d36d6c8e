//! Shared enums for definitions, modifiers and vital targets

use crate::error::StatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Definition kinds
// ============================================================================

/// The kind of definition a `Modifies` entry points at
///
/// The text form doubles as the registry JSON key (`"VITAL"`, `"ATTRIBUTE"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    Vital,
    Attribute,
    #[default]
    Unknown,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Vital => "VITAL",
            DataType::Attribute => "ATTRIBUTE",
            DataType::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for DataType {
    /// Case-insensitive; anything unrecognised is `Unknown`
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VITAL" => DataType::Vital,
            "ATTRIBUTE" => DataType::Attribute,
            _ => DataType::Unknown,
        }
    }
}

impl From<String> for DataType {
    fn from(s: String) -> Self {
        DataType::from(s.as_str())
    }
}

impl From<DataType> for String {
    fn from(t: DataType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Modifier sources
// ============================================================================

/// Where a modifier came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModifierSourceType {
    /// An attribute (e.g. strength raising max health)
    Attribute,
    /// Equipment or a consumable
    Item,
    /// A temporary beneficial effect
    Buff,
    /// A temporary harmful effect
    Debuff,
    #[default]
    Unknown,
}

impl ModifierSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierSourceType::Attribute => "ATTRIBUTE",
            ModifierSourceType::Item => "ITEM",
            ModifierSourceType::Buff => "BUFF",
            ModifierSourceType::Debuff => "DEBUFF",
            ModifierSourceType::Unknown => "UNKNOWN",
        }
    }

    pub fn all() -> &'static [ModifierSourceType] {
        &[
            ModifierSourceType::Attribute,
            ModifierSourceType::Item,
            ModifierSourceType::Buff,
            ModifierSourceType::Debuff,
            ModifierSourceType::Unknown,
        ]
    }
}

impl From<&str> for ModifierSourceType {
    /// Case-insensitive; anything unrecognised is `Unknown`
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "ATTRIBUTE" => ModifierSourceType::Attribute,
            "ITEM" => ModifierSourceType::Item,
            "BUFF" => ModifierSourceType::Buff,
            "DEBUFF" => ModifierSourceType::Debuff,
            _ => ModifierSourceType::Unknown,
        }
    }
}

impl From<String> for ModifierSourceType {
    fn from(s: String) -> Self {
        ModifierSourceType::from(s.as_str())
    }
}

impl From<ModifierSourceType> for String {
    fn from(t: ModifierSourceType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ModifierSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Vital behaviour
// ============================================================================

/// How a vital behaves over time, which decides its default current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VitalType {
    /// Starts full and is consumed (health, mana)
    Depletive,
    /// Starts empty and builds up (rage, combo points)
    Accumulative,
    #[default]
    Unknown,
}

impl VitalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalType::Depletive => "DEPLETIVE",
            VitalType::Accumulative => "ACCUMULATIVE",
            VitalType::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for VitalType {
    /// Case-insensitive; anything unrecognised is `Unknown`
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "DEPLETIVE" => VitalType::Depletive,
            "ACCUMULATIVE" => VitalType::Accumulative,
            _ => VitalType::Unknown,
        }
    }
}

impl From<String> for VitalType {
    fn from(s: String) -> Self {
        VitalType::from(s.as_str())
    }
}

impl From<VitalType> for String {
    fn from(t: VitalType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Vital targets
// ============================================================================

/// Which number of a vital an update or modifier addresses
///
/// Modifiers only stack on `CurrentMin` and `CurrentMax`; `Current` is only
/// valid for direct updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VitalTarget {
    Current,
    CurrentMin,
    CurrentMax,
}

impl VitalTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalTarget::Current => "CURRENT",
            VitalTarget::CurrentMin => "CURRENT_MIN",
            VitalTarget::CurrentMax => "CURRENT_MAX",
        }
    }
}

impl FromStr for VitalTarget {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CURRENT" => Ok(VitalTarget::Current),
            "CURRENT_MIN" => Ok(VitalTarget::CurrentMin),
            "CURRENT_MAX" => Ok(VitalTarget::CurrentMax),
            other => Err(StatError::malformed(format!("unknown vital target '{}'", other))),
        }
    }
}

impl fmt::Display for VitalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
