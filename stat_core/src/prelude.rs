//! Prelude module for convenient imports
//!
//! ```rust
//! use stat_core::prelude::*;
//! ```

// Definitions and registries
pub use crate::definition::{Attribute, Vital};
pub use registry_core::{Identifier, Registry};

// Containers and instance data
pub use crate::container::{Attributes, Vitals};
pub use crate::data::{AttributeData, VitalData};

// Modifiers
pub use crate::modifier::{Modifier, ModifierApplicator, Modifies, ModifyType, Rounding};
pub use crate::types::{DataType, ModifierSourceType, VitalTarget, VitalType};

// Errors
pub use crate::error::{ErrorKind, StatError, StatResult};

// Config
pub use crate::config::{init_registries, registries, StatRegistries};
