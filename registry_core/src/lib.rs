mod definition;
mod registry;

pub use definition::{Definition, Identifier};
pub use registry::Registry;

use std::path::PathBuf;
use thiserror::Error;

/// Error loading a definition registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("JSON parse error in '{path:?}': {error}")]
    Json {
        error: serde_json::Error,
        path: Option<PathBuf>,
    },
    #[error("JSON does not contain key: {0}")]
    MissingKey(String),
    #[error("JSON key '{0}' is not an array")]
    NotAnArray(String),
    #[error("Invalid entry {index} under '{key}': {message}")]
    InvalidEntry {
        key: String,
        index: usize,
        message: String,
    },
}
