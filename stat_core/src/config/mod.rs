//! Registry loading and the optional process-wide registries

mod registries;

pub use registries::{
    ensure_registries_initialized, init_registries, init_registries_from, registries,
    registries_initialized, RegistryManifest, RegistryPaths, StatRegistries,
};

use registry_core::RegistryError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading stat configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("TOML parse error in '{path:?}': {error}")]
    Toml {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("stat registries already initialized")]
    AlreadyInitialized,
    #[error("stat registries not initialized, call init_registries() first")]
    NotInitialized,
}

/// Load and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        error: e,
        path: Some(path.to_path_buf()),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Toml {
        error: e,
        path: Some(path.to_path_buf()),
    })
}

/// Deserialize a TOML string
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Toml {
        error: e,
        path: None,
    })
}
