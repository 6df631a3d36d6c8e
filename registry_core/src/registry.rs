use crate::definition::{Definition, Identifier};
use crate::RegistryError;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Catalog of definitions of one type, loaded from a JSON document
///
/// Loading replaces the whole catalog. Lookups never fail: absence is
/// reported as `None` and the caller decides whether that is an error.
#[derive(Debug)]
pub struct Registry<D> {
    definitions: HashMap<u32, D>,
    name_to_id: HashMap<String, u32>,
}

impl<D> Default for Registry<D> {
    fn default() -> Self {
        Registry {
            definitions: HashMap::new(),
            name_to_id: HashMap::new(),
        }
    }
}

impl<D: Definition> Registry<D> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON file
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.load_from_file(path)?;
        Ok(registry)
    }

    /// Parse a registry from a JSON string (for testing)
    pub fn parse(json: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.load_from_str(json)?;
        Ok(registry)
    }

    /// Replace the contents of this registry with the definitions in a JSON file
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        let data: Value = serde_json::from_str(&content).map_err(|e| RegistryError::Json {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        self.load_from_value(&data)
    }

    /// Replace the contents of this registry with the definitions in a JSON string
    pub fn load_from_str(&mut self, json: &str) -> Result<(), RegistryError> {
        let data: Value =
            serde_json::from_str(json).map_err(|e| RegistryError::Json { error: e, path: None })?;
        self.load_from_value(&data)
    }

    /// Replace the contents of this registry with the array under `D::JSON_KEY`
    ///
    /// The key is validated before anything is cleared. A malformed element
    /// aborts the load, but elements parsed before it stay registered.
    pub fn load_from_value(&mut self, data: &Value) -> Result<(), RegistryError> {
        let key = D::JSON_KEY;
        let entries = data
            .get(key)
            .ok_or_else(|| RegistryError::MissingKey(key.to_string()))?
            .as_array()
            .ok_or_else(|| RegistryError::NotAnArray(key.to_string()))?;

        self.clear();
        for (index, entry) in entries.iter().enumerate() {
            let definition = D::deserialize(entry).map_err(|e| RegistryError::InvalidEntry {
                key: key.to_string(),
                index,
                message: e.to_string(),
            })?;
            self.insert(definition);
        }

        debug!(key, count = self.definitions.len(), "loaded registry");
        Ok(())
    }

    /// Register a single definition, replacing any previous one with the same id
    pub fn insert(&mut self, definition: D) {
        let id = definition.id();
        if let Some(previous) = self.definitions.get(&id) {
            if self.name_to_id.get(previous.name()) == Some(&id) {
                self.name_to_id.remove(previous.name());
            }
        }
        self.name_to_id.insert(definition.name().to_string(), id);
        self.definitions.insert(id, definition);
    }

    /// Remove every definition
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.name_to_id.clear();
    }

    /// Get a definition by ID
    pub fn get_by_id(&self, id: u32) -> Option<&D> {
        self.definitions.get(&id)
    }

    /// Get a definition by name
    pub fn get_by_name(&self, name: &str) -> Option<&D> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.definitions.get(id))
    }

    /// Resolve any kind of identifier to the registered definition
    pub fn resolve(&self, identifier: Identifier<'_, D>) -> Option<&D> {
        match identifier {
            Identifier::ByName(name) => self.get_by_name(name),
            Identifier::ById(id) => self.get_by_id(id),
            Identifier::ByDefinition(def) => self.get_by_id(def.id()),
        }
    }

    /// Check if a definition with this ID exists
    pub fn contains(&self, id: u32) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate all definitions (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.definitions.values()
    }

    /// All registered IDs in ascending order
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.definitions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Write a human readable listing, one definition per line, sorted by ID
    pub fn dump<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for id in self.ids() {
            if let Some(definition) = self.definitions.get(&id) {
                writeln!(out, "ID: {}, {}", id, definition.describe())?;
            }
        }
        Ok(())
    }
}

impl<D: Definition> FromIterator<D> for Registry<D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.insert(definition);
        }
        registry
    }
}
