use crate::types::VitalType;
use registry_core::Definition;
use serde::{Deserialize, Serialize};

/// Template for a character resource (health, mana, rage, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vital {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub vital_type: VitalType,
    #[serde(rename = "baseMin", default)]
    pub base_min: i32,
    #[serde(rename = "baseMax", default = "default_base_max")]
    pub base_max: i32,
}

fn default_base_max() -> i32 {
    100
}

impl Vital {
    pub fn new(id: u32, name: impl Into<String>, vital_type: VitalType) -> Self {
        Vital {
            id,
            name: name.into(),
            description: String::new(),
            vital_type,
            base_min: 0,
            base_max: default_base_max(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_bounds(mut self, base_min: i32, base_max: i32) -> Self {
        self.base_min = base_min;
        self.base_max = base_max;
        self
    }
}

impl Definition for Vital {
    const JSON_KEY: &'static str = "VITAL";

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!(
            "Name: {}, Description: {}, Type: {}, BaseMin: {}, BaseMax: {}",
            self.name, self.description, self.vital_type, self.base_min, self.base_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_core::Registry;

    #[test]
    fn test_load_vitals() {
        let json = r#"{
            "VITAL": [
                { "id": 1, "name": "Health", "description": "Hit points.", "type": "DEPLETIVE", "baseMin": 0, "baseMax": 250 },
                { "id": 2, "name": "Rage", "type": "accumulative" },
                { "id": 3, "name": "Focus" }
            ]
        }"#;
        let registry = Registry::<Vital>::parse(json).unwrap();

        let health = registry.get_by_name("Health").unwrap();
        assert_eq!(health.vital_type, VitalType::Depletive);
        assert_eq!(health.base_max, 250);

        let rage = registry.get_by_id(2).unwrap();
        assert_eq!(rage.vital_type, VitalType::Accumulative);
        assert_eq!((rage.base_min, rage.base_max), (0, 100));

        assert_eq!(registry.get_by_id(3).unwrap().vital_type, VitalType::Unknown);
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result = Registry::<Vital>::parse(r#"{ "VITAL": [ { "id": 1 } ] }"#);
        assert!(matches!(
            result,
            Err(registry_core::RegistryError::InvalidEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_describe() {
        let mana = Vital::new(2, "Mana", VitalType::Depletive).with_description("Spell fuel.");
        assert_eq!(
            mana.describe(),
            "Name: Mana, Description: Spell fuel., Type: DEPLETIVE, BaseMin: 0, BaseMax: 100"
        );
    }
}
