//! Stat registry loading with global registry support

use super::ConfigError;
use crate::definition::{Attribute, Vital};
use registry_core::Registry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// Global registries instance
static REGISTRIES: OnceLock<StatRegistries> = OnceLock::new();

/// Location of the combined stats document inside a config directory
const STATS_FILE: &str = "stats/stats.json";

/// One registry per definition type
#[derive(Debug, Default)]
pub struct StatRegistries {
    pub vitals: Registry<Vital>,
    pub attributes: Registry<Attribute>,
}

/// TOML manifest naming the JSON files each registry loads from
///
/// ```toml
/// [registries]
/// vitals = "stats/stats.json"
/// attributes = "stats/stats.json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    #[serde(default)]
    pub registries: RegistryPaths,
}

/// Paths relative to the manifest's directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryPaths {
    #[serde(default = "default_stats_path")]
    pub vitals: PathBuf,
    #[serde(default = "default_stats_path")]
    pub attributes: PathBuf,
}

fn default_stats_path() -> PathBuf {
    PathBuf::from(STATS_FILE)
}

impl Default for RegistryPaths {
    fn default() -> Self {
        RegistryPaths {
            vitals: default_stats_path(),
            attributes: default_stats_path(),
        }
    }
}

impl StatRegistries {
    /// Create empty registries
    pub fn new() -> Self {
        Self::default()
    }

    /// Load both registries from one JSON document with `"VITAL"` and
    /// `"ATTRIBUTE"` keys
    pub fn load_from_str(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            registry_core::RegistryError::Json {
                error: e,
                path: None,
            }
        })?;
        Self::load_from_value(&value)
    }

    /// Load both registries from `dir/stats/stats.json`
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_from_file(&dir.join(STATS_FILE))
    }

    /// Load both registries from one JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut registries = Self::new();
        registries.vitals.load_from_file(path)?;
        registries.attributes.load_from_file(path)?;
        Ok(registries)
    }

    /// Load each registry from the file the manifest names
    pub fn load_from_manifest(path: &Path) -> Result<Self, ConfigError> {
        let manifest: RegistryManifest = super::load_toml(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        let mut registries = Self::new();
        registries
            .vitals
            .load_from_file(&base.join(&manifest.registries.vitals))?;
        registries
            .attributes
            .load_from_file(&base.join(&manifest.registries.attributes))?;
        Ok(registries)
    }

    fn load_from_value(value: &Value) -> Result<Self, ConfigError> {
        let mut registries = Self::new();
        registries.vitals.load_from_value(value)?;
        registries.attributes.load_from_value(value)?;
        Ok(registries)
    }

    /// Write both registries under headed sections
    pub fn dump<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "=== Stat Registries ===")?;
        writeln!(out, "--- Vitals ({}) ---", self.vitals.len())?;
        self.vitals.dump(out)?;
        writeln!(out, "--- Attributes ({}) ---", self.attributes.len())?;
        self.attributes.dump(out)?;
        Ok(())
    }
}

/// Initialize the global registries from a config directory
pub fn init_registries(dir: &Path) -> Result<(), ConfigError> {
    init_registries_from(StatRegistries::load_from_dir(dir)?)
}

/// Install already loaded registries as the global instance
pub fn init_registries_from(registries: StatRegistries) -> Result<(), ConfigError> {
    let vitals = registries.vitals.len();
    let attributes = registries.attributes.len();
    REGISTRIES
        .set(registries)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    info!(vitals, attributes, "initialized stat registries");
    Ok(())
}

/// Get the global registries
pub fn registries() -> Result<&'static StatRegistries, ConfigError> {
    REGISTRIES.get().ok_or(ConfigError::NotInitialized)
}

/// Check if the global registries have been initialized
pub fn registries_initialized() -> bool {
    REGISTRIES.get().is_some()
}

/// Ensure the global registries are initialized (for tests)
/// Uses empty registries if not already initialized
pub fn ensure_registries_initialized() {
    REGISTRIES.get_or_init(StatRegistries::new);
}
