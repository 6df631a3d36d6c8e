//! Modifies - what an attribute does to other stats
//!
//! Declared in the attribute JSON:
//!
//! ```json
//! "modifies": [
//!     { "targetType": "VITAL", "targetName": "Health", "ModifyType": "ADD", "ModifyValuePer": 5.0 }
//! ]
//! ```

use crate::error::StatError;
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a `Modifies` entry changes its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModifyType {
    /// Adds `value_per * source value` to the target
    Add,
    Multiply,
    Set,
    #[default]
    Unknown,
}

impl ModifyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifyType::Add => "ADD",
            ModifyType::Multiply => "MULTIPLY",
            ModifyType::Set => "SET",
            ModifyType::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for ModifyType {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => ModifyType::Add,
            "MULTIPLY" => ModifyType::Multiply,
            "SET" => ModifyType::Set,
            _ => ModifyType::Unknown,
        }
    }
}

impl From<String> for ModifyType {
    fn from(s: String) -> Self {
        ModifyType::from(s.as_str())
    }
}

impl From<ModifyType> for String {
    fn from(t: ModifyType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ModifyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared effect of one definition on another definition's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifies {
    #[serde(rename = "targetType")]
    pub target_type: DataType,
    #[serde(rename = "targetName")]
    pub target_name: String,
    #[serde(rename = "ModifyType")]
    pub modify_type: ModifyType,
    /// Amount applied per point of the source (e.g. 5 health per constitution)
    #[serde(rename = "ModifyValuePer")]
    pub modify_value_per: f64,
}

impl Modifies {
    pub fn new(
        target_type: DataType,
        target_name: impl Into<String>,
        modify_type: ModifyType,
        modify_value_per: f64,
    ) -> Self {
        Modifies {
            target_type,
            target_name: target_name.into(),
            modify_type,
            modify_value_per,
        }
    }
}

/// Text form: `targetType:targetName:modifyType:modifyValuePer`
impl fmt::Display for Modifies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.target_type, self.target_name, self.modify_type, self.modify_value_per
        )
    }
}

impl FromStr for Modifies {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(':').collect();
        let [target_type, target_name, modify_type, value_per] = tokens.as_slice() else {
            return Err(StatError::malformed(format!(
                "expected 4 ':'-separated fields in Modifies, found {}",
                tokens.len()
            )));
        };

        let modify_value_per = value_per.trim().parse::<f64>().map_err(|_| {
            StatError::malformed(format!("invalid ModifyValuePer '{}'", value_per))
        })?;

        Ok(Modifies {
            target_type: DataType::from(*target_type),
            target_name: target_name.to_string(),
            modify_type: ModifyType::from(*modify_type),
            modify_value_per,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "targetType": "VITAL",
            "targetName": "Health",
            "ModifyType": "add",
            "ModifyValuePer": 5.0
        }"#;

        let modifies: Modifies = serde_json::from_str(json).unwrap();
        assert_eq!(modifies.target_type, DataType::Vital);
        assert_eq!(modifies.target_name, "Health");
        assert_eq!(modifies.modify_type, ModifyType::Add);
        assert!((modifies.modify_value_per - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unrecognised_modify_type_is_unknown() {
        let json = r#"{ "targetType": "VITAL", "targetName": "Health", "ModifyType": "ADD_MAX", "ModifyValuePer": 1 }"#;
        let modifies: Modifies = serde_json::from_str(json).unwrap();
        assert_eq!(modifies.modify_type, ModifyType::Unknown);
    }

    #[test]
    fn test_text_form() {
        let modifies = Modifies::new(DataType::Vital, "Mana", ModifyType::Multiply, 1.5);
        let text = modifies.to_string();
        assert_eq!(text, "VITAL:Mana:MULTIPLY:1.5");
        assert_eq!(text.parse::<Modifies>().unwrap(), modifies);
    }

    #[test]
    fn test_text_form_errors() {
        assert!(matches!(
            "VITAL:Mana:ADD".parse::<Modifies>(),
            Err(StatError::MalformedSerialization(_))
        ));
        assert!(matches!(
            "VITAL:Mana:ADD:lots".parse::<Modifies>(),
            Err(StatError::MalformedSerialization(_))
        ));
    }
}
