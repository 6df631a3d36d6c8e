//! Modifiers, the declarative `Modifies` metadata, and the applicator that
//! turns one into the other

mod applicator;
mod modifies;

pub use applicator::{ModifierApplicator, ModifierTarget, Rounding};
pub use modifies::{Modifies, ModifyType};

use crate::types::ModifierSourceType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed delta stacked onto a stat, attributed to a source
///
/// `==` compares every field. Removal matches on the source only, see
/// [`Modifier::same_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    /// ID of the source (attribute ID, item ID, ...)
    pub source_id: u32,
    pub source_type: ModifierSourceType,
    pub value: i32,
}

impl Modifier {
    pub fn new(source_id: u32, source_type: ModifierSourceType, value: i32) -> Self {
        Modifier {
            source_id,
            source_type,
            value,
        }
    }

    /// Whether two modifiers come from the same source, ignoring value
    pub fn same_source(&self, source_id: u32, source_type: ModifierSourceType) -> bool {
        self.source_id == source_id && self.source_type == source_type
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Modifier{{sourceID={}, source={}, value={}}}",
            self.source_id, self.source_type, self.value
        )
    }
}

/// Sum of modifier values, widened so it cannot overflow
pub(crate) fn total(modifiers: &[Modifier]) -> i64 {
    modifiers.iter().map(|m| m.value as i64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_includes_value() {
        let a = Modifier::new(1, ModifierSourceType::Item, 5);
        let b = Modifier::new(1, ModifierSourceType::Item, 6);
        assert_ne!(a, b);
        assert!(a.same_source(b.source_id, b.source_type));
        assert!(!a.same_source(1, ModifierSourceType::Buff));
    }

    #[test]
    fn test_display() {
        let m = Modifier::new(3, ModifierSourceType::Buff, -2);
        assert_eq!(m.to_string(), "Modifier{sourceID=3, source=BUFF, value=-2}");
    }

    #[test]
    fn test_total_is_widened() {
        let mods = vec![
            Modifier::new(1, ModifierSourceType::Item, 5),
            Modifier::new(2, ModifierSourceType::Buff, -8),
        ];
        assert_eq!(total(&mods), -3);

        let large = vec![
            Modifier::new(1, ModifierSourceType::Item, i32::MAX),
            Modifier::new(2, ModifierSourceType::Item, 1),
        ];
        assert_eq!(total(&large), i32::MAX as i64 + 1);
    }
}
