//! Definition types - immutable templates loaded into registries

mod attribute;
mod vital;

pub use attribute::Attribute;
pub use vital::Vital;
