use crate::error::{StatError, StatResult};
use crate::modifier::{total, Modifier};
use crate::types::ModifierSourceType;
use serde::{Deserialize, Serialize};

/// Live value of one attribute for one entity
///
/// `current` always equals the base value plus the sum of all modifiers;
/// it is adjusted incrementally on every add/remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeData {
    current: i32,
    modifiers: Vec<Modifier>,
}

impl AttributeData {
    /// Create data with no modifiers
    pub fn new(current: i32) -> Self {
        AttributeData {
            current,
            modifiers: Vec::new(),
        }
    }

    /// Rebuild data whose `current` already includes `modifiers`
    pub fn with_modifiers(current: i32, modifiers: Vec<Modifier>) -> StatResult<Self> {
        let total = total(&modifiers);
        checked_split(current as i64, total)?;
        Ok(AttributeData { current, modifiers })
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Sum of all modifier values
    pub fn modifier_total(&self) -> i32 {
        // Every mutation keeps the total within i32
        total(&self.modifiers) as i32
    }

    /// Value before modifiers
    pub fn base(&self) -> i32 {
        (self.current as i64 - total(&self.modifiers)) as i32
    }

    /// Set the current value; modifiers stay stacked on top of the new base
    pub fn set_current(&mut self, value: i32) -> StatResult<()> {
        checked_split(value as i64, total(&self.modifiers))?;
        self.current = value;
        Ok(())
    }

    /// Stack a modifier and apply its value
    ///
    /// Returns `false` if an identical modifier (all fields equal) is
    /// already present, in which case nothing changes.
    pub fn add_modifier(&mut self, modifier: Modifier) -> StatResult<bool> {
        if self.modifiers.contains(&modifier) {
            return Ok(false);
        }

        let total = total(&self.modifiers) + modifier.value as i64;
        let current = checked_split(self.current as i64 + modifier.value as i64, total)?;

        self.modifiers.push(modifier);
        self.current = current;
        Ok(true)
    }

    /// Remove the first modifier from this source and undo its value
    ///
    /// No match is a no-op and returns `Ok(None)`.
    pub fn remove_modifier(
        &mut self,
        source_id: u32,
        source_type: ModifierSourceType,
    ) -> StatResult<Option<Modifier>> {
        let Some(index) = self
            .modifiers
            .iter()
            .position(|m| m.same_source(source_id, source_type))
        else {
            return Ok(None);
        };

        let value = self.modifiers[index].value as i64;
        let total = total(&self.modifiers) - value;
        let current = checked_split(self.current as i64 - value, total)?;

        let removed = self.modifiers.remove(index);
        self.current = current;
        Ok(Some(removed))
    }
}

/// Check that a current value, its modifier total and the implied base all fit in i32
fn checked_split(current: i64, total: i64) -> StatResult<i32> {
    let base = current - total;
    let fits = |v: i64| i32::try_from(v).is_ok();
    if fits(current) && fits(total) && fits(base) {
        Ok(current as i32)
    } else {
        Err(StatError::InvalidData(format!(
            "current {} with modifier total {} is out of range",
            current, total
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strength_mod() -> Modifier {
        Modifier::new(1, ModifierSourceType::Attribute, 5)
    }

    fn item_mod() -> Modifier {
        Modifier::new(2, ModifierSourceType::Item, 10)
    }

    #[test]
    fn test_new() {
        let data = AttributeData::new(10);
        assert_eq!(data.current(), 10);
        assert!(data.modifiers().is_empty());
    }

    #[test]
    fn test_with_modifiers_keeps_current() {
        let data = AttributeData::with_modifiers(15, vec![strength_mod()]).unwrap();
        assert_eq!(data.current(), 15);
        assert_eq!(data.base(), 10);
        assert_eq!(data.modifiers(), &[strength_mod()]);
    }

    #[test]
    fn test_add_modifier() {
        let mut data = AttributeData::new(10);
        assert!(data.add_modifier(strength_mod()).unwrap());
        assert_eq!(data.current(), 15);

        assert!(data.add_modifier(item_mod()).unwrap());
        assert_eq!(data.modifiers().len(), 2);
        assert_eq!(data.current(), 25);
    }

    #[test]
    fn test_identical_modifier_is_ignored() {
        let mut data = AttributeData::new(10);
        data.add_modifier(strength_mod()).unwrap();
        assert!(!data.add_modifier(strength_mod()).unwrap());
        assert_eq!(data.modifiers().len(), 1);
        assert_eq!(data.current(), 15);
    }

    #[test]
    fn test_same_source_different_value_stacks() {
        let mut data = AttributeData::new(10);
        data.add_modifier(strength_mod()).unwrap();
        data.add_modifier(Modifier::new(1, ModifierSourceType::Attribute, 7))
            .unwrap();
        assert_eq!(data.modifiers().len(), 2);
        assert_eq!(data.current(), 22);
    }

    #[test]
    fn test_remove_modifier_removes_first_match_only() {
        let mut data = AttributeData::new(10);
        data.add_modifier(strength_mod()).unwrap();
        data.add_modifier(item_mod()).unwrap();
        data.add_modifier(Modifier::new(1, ModifierSourceType::Attribute, 7))
            .unwrap();

        let removed = data.remove_modifier(1, ModifierSourceType::Attribute).unwrap();
        assert_eq!(removed, Some(strength_mod()));
        assert_eq!(data.modifiers().len(), 2);
        assert_eq!(data.current(), 27);
    }

    #[test]
    fn test_remove_missing_modifier_is_noop() {
        let mut data = AttributeData::new(10);
        data.add_modifier(item_mod()).unwrap();

        assert_eq!(data.remove_modifier(15, ModifierSourceType::Item).unwrap(), None);
        assert_eq!(data.modifiers().len(), 1);
        assert_eq!(data.current(), 20);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut data = AttributeData::new(i32::MAX - 1);
        let result = data.add_modifier(item_mod());
        assert!(matches!(result, Err(StatError::InvalidData(_))));
        assert_eq!(data.current(), i32::MAX - 1);
        assert!(data.modifiers().is_empty());
    }

    #[test]
    fn test_set_current_rejects_unrepresentable_base() {
        let mut data = AttributeData::new(0);
        data.add_modifier(item_mod()).unwrap();
        assert!(data.set_current(i32::MIN).is_err());
        assert_eq!(data.current(), 10);
    }

    #[test]
    fn test_set_current_keeps_modifiers_stacked() {
        let mut data = AttributeData::new(10);
        data.add_modifier(item_mod()).unwrap();
        data.set_current(50).unwrap();
        assert_eq!(data.base(), 40);

        data.remove_modifier(2, ModifierSourceType::Item).unwrap();
        assert_eq!(data.current(), 40);
    }

    proptest! {
        #[test]
        fn prop_current_is_base_plus_modifiers(
            base in -1000i32..1000,
            ops in prop::collection::vec((any::<bool>(), 0u32..4, -100i32..100), 0..40),
        ) {
            let mut data = AttributeData::new(base);
            for (add, source_id, value) in ops {
                if add {
                    data.add_modifier(Modifier::new(source_id, ModifierSourceType::Item, value))
                        .unwrap();
                } else {
                    data.remove_modifier(source_id, ModifierSourceType::Item).unwrap();
                }
                let sum: i32 = data.modifiers().iter().map(|m| m.value).sum();
                prop_assert_eq!(data.current(), base + sum);
                prop_assert_eq!(data.base(), base);
            }
        }
    }
}
