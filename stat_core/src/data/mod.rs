//! Per-entity instance data for attributes and vitals

mod attribute_data;
mod vital_data;

pub use attribute_data::AttributeData;
pub use vital_data::VitalData;
