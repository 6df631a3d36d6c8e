//! stat_core - Attribute and vital tracking for game entities
//!
//! This library provides:
//! - Attribute / Vital: definitions loaded from JSON into registries
//! - Attributes / Vitals: per-entity containers with stacked modifiers
//! - ModifierApplicator: turns an attribute's `modifies` list into modifiers
//! - A compact text serialization for container state
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stat_core::prelude::*;
//!
//! let registries = StatRegistries::load_from_dir(Path::new("config/")).unwrap();
//!
//! let mut attributes = Attributes::new(&registries.attributes);
//! let mut vitals = Vitals::new(&registries.vitals);
//! attributes.add("Constitution", 12).unwrap();
//!
//! // Constitution raises max health
//! ModifierApplicator::default()
//!     .apply_all(&attributes, &mut vitals)
//!     .unwrap();
//!
//! vitals.update("Health", 40).unwrap();
//! let saved = vitals.serialize();
//! let restored = Vitals::deserialize(&registries.vitals, &saved).unwrap();
//! ```

pub mod config;
pub mod container;
pub mod data;
pub mod definition;
pub mod error;
pub mod modifier;
pub mod prelude;
pub mod types;

// Core API - what most users need
pub use container::{Attributes, Vitals};
pub use data::{AttributeData, VitalData};
pub use definition::{Attribute, Vital};
pub use error::{ErrorKind, StatError, StatResult};
pub use modifier::{Modifier, ModifierApplicator, ModifierTarget, Modifies, ModifyType, Rounding};
pub use types::{DataType, ModifierSourceType, VitalTarget, VitalType};

// Configuration
pub use config::{init_registries, registries, ConfigError, StatRegistries};

// Re-export the registry types containers are built on
pub use registry_core::{Definition, Identifier, Registry, RegistryError};
