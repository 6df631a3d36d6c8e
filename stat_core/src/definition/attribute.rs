use crate::modifier::Modifies;
use registry_core::Definition;
use serde::{Deserialize, Serialize};

/// Template for a character attribute (strength, constitution, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "baseValue", default)]
    pub base_value: i32,
    /// Effects this attribute has on other stats
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifies: Vec<Modifies>,
}

impl Attribute {
    pub fn new(id: u32, name: impl Into<String>, base_value: i32) -> Self {
        Attribute {
            id,
            name: name.into(),
            description: String::new(),
            base_value,
            modifies: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_modifies(mut self, modifies: Modifies) -> Self {
        self.modifies.push(modifies);
        self
    }
}

impl Definition for Attribute {
    const JSON_KEY: &'static str = "ATTRIBUTE";

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        let mut out = format!(
            "Name: {}, Description: {}, BaseValue: {}",
            self.name, self.description, self.base_value
        );
        if !self.modifies.is_empty() {
            let modifies: Vec<String> = self.modifies.iter().map(|m| m.to_string()).collect();
            out.push_str(&format!(", Modifies: [{}]", modifies.join(", ")));
        }
        out
    }
}
