use super::{extract_block, parse_field, parse_modifier, resolve, split_id, write_modifier};
use crate::data::VitalData;
use crate::definition::Vital;
use crate::error::{StatError, StatResult};
use crate::modifier::{Modifier, ModifierTarget};
use crate::types::{DataType, ModifierSourceType, VitalTarget};
use registry_core::{Identifier, Registry};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

const BEGIN: &str = "[VITALS_BEGIN]";
const END: &str = "[VITALS_END]";

/// One entity's vitals, keyed by vital ID
///
/// Same identifier and failure rules as [`Attributes`](super::Attributes).
#[derive(Debug, Clone)]
pub struct Vitals<'r> {
    registry: &'r Registry<Vital>,
    data: BTreeMap<u32, VitalData>,
}

impl<'r> Vitals<'r> {
    pub fn new(registry: &'r Registry<Vital>) -> Self {
        Vitals {
            registry,
            data: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &'r Registry<Vital> {
        self.registry
    }

    /// Data for a vital, created from its definition if absent
    pub fn get<'a>(&mut self, identifier: impl Into<Identifier<'a, Vital>>) -> StatResult<&VitalData> {
        let definition = resolve(self.registry, identifier.into())?;
        match self.data.entry(definition.id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(default_data(definition)?)),
        }
    }

    /// Data for a vital, without creating it
    pub fn peek<'a>(
        &self,
        identifier: impl Into<Identifier<'a, Vital>>,
    ) -> StatResult<Option<&VitalData>> {
        let definition = resolve(self.registry, identifier.into())?;
        Ok(self.data.get(&definition.id))
    }

    /// Create data with explicit numbers
    pub fn add<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Vital>>,
        current: i32,
        min: i32,
        max: i32,
    ) -> StatResult<()> {
        let definition = resolve(self.registry, identifier.into())?;
        match self.data.entry(definition.id) {
            Entry::Occupied(_) => Err(StatError::DuplicateValue(format!(
                "vital '{}' (id {}) already has data",
                definition.name, definition.id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(VitalData::new(current, min, max)?);
                Ok(())
            }
        }
    }

    /// Set the current value, clamped into bounds; returns the stored value
    pub fn update<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Vital>>,
        value: i32,
    ) -> StatResult<i32> {
        self.update_bound(identifier, VitalTarget::Current, value)
    }

    /// Set current, min or max; returns the stored value of `target`
    pub fn update_bound<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Vital>>,
        target: VitalTarget,
        value: i32,
    ) -> StatResult<i32> {
        self.modify(identifier.into(), |data| {
            data.set_bound(target, value)?;
            Ok(data.value(target))
        })
    }

    /// Stack a modifier on `CurrentMin` or `CurrentMax`, replacing one from
    /// the same source
    pub fn add_modifier<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Vital>>,
        source_id: u32,
        source_type: ModifierSourceType,
        value: i32,
        target: VitalTarget,
    ) -> StatResult<()> {
        let modifier = Modifier::new(source_id, source_type, value);
        self.modify(identifier.into(), |data| data.add_modifier(modifier, target))
    }

    /// Remove the first modifier from this source; absent data is a no-op
    pub fn remove_modifier<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Vital>>,
        source_id: u32,
        source_type: ModifierSourceType,
        target: VitalTarget,
    ) -> StatResult<Option<Modifier>> {
        let definition = resolve(self.registry, identifier.into())?;
        match self.data.get_mut(&definition.id) {
            Some(data) => data.remove_modifier(source_id, source_type, target),
            None => Ok(None),
        }
    }

    /// Drop a vital's data; `false` if there was none
    pub fn remove<'a>(&mut self, identifier: impl Into<Identifier<'a, Vital>>) -> StatResult<bool> {
        let definition = resolve(self.registry, identifier.into())?;
        Ok(self.data.remove(&definition.id).is_some())
    }

    /// Whether data exists and its current value is at least `amount`
    pub fn has<'a>(
        &self,
        identifier: impl Into<Identifier<'a, Vital>>,
        amount: i32,
    ) -> StatResult<bool> {
        Ok(self
            .peek(identifier)?
            .is_some_and(|data| data.current() >= amount))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Entries in ascending ID order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &VitalData)> + '_ {
        self.data.iter().map(|(id, data)| (*id, data))
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// `[VITALS_BEGIN]id:current,min,max(;sourceId,SOURCE,value,TARGET)*(|...)*[VITALS_END]`
    ///
    /// Min modifiers are written before max modifiers.
    pub fn serialize(&self) -> String {
        let entries: Vec<String> = self
            .data
            .iter()
            .map(|(id, data)| {
                let mut entry = format!(
                    "{}:{},{},{}",
                    id,
                    data.current(),
                    data.current_min(),
                    data.current_max()
                );
                for target in [VitalTarget::CurrentMin, VitalTarget::CurrentMax] {
                    for modifier in data.modifiers(target) {
                        entry.push(';');
                        write_modifier(&mut entry, modifier);
                        entry.push(',');
                        entry.push_str(target.as_str());
                    }
                }
                entry
            })
            .collect();

        format!("{}{}{}", BEGIN, entries.join("|"), END)
    }

    /// Rebuild a container from text produced by [`Vitals::serialize`]
    ///
    /// Stored numbers are taken as-is; bases are derived from them and the
    /// modifiers.
    pub fn deserialize(registry: &'r Registry<Vital>, text: &str) -> StatResult<Self> {
        let block = extract_block(text, BEGIN, END)?;
        let mut vitals = Vitals::new(registry);
        if block.is_empty() {
            return Ok(vitals);
        }

        for entry in block.split('|') {
            let mut parts = entry.split(';');
            let (id, base) = split_id(parts.next().unwrap_or_default())?;

            let numbers: Vec<&str> = base.split(',').collect();
            let [current, min, max] = numbers.as_slice() else {
                return Err(StatError::malformed(format!(
                    "vital {} has {} values, expected current,min,max",
                    id,
                    numbers.len()
                )));
            };
            let current = parse_field(current, "current")?;
            let min = parse_field(min, "current min")?;
            let max = parse_field(max, "current max")?;

            let mut min_modifiers: Vec<Modifier> = Vec::new();
            let mut max_modifiers = Vec::new();
            for part in parts {
                let fields: Vec<&str> = part.split(',').collect();
                let [source_id, source_type, value, target] = fields.as_slice() else {
                    return Err(StatError::malformed(format!(
                        "vital {} modifier '{}' has {} fields, expected 4",
                        id,
                        part,
                        fields.len()
                    )));
                };
                let modifier = parse_modifier(source_id, source_type, value)?;
                let target = target.trim().parse::<VitalTarget>()?;
                let list = match target {
                    VitalTarget::CurrentMin => &mut min_modifiers,
                    VitalTarget::CurrentMax => &mut max_modifiers,
                    VitalTarget::Current => {
                        return Err(StatError::malformed(format!(
                            "vital {} modifier targets CURRENT",
                            id
                        )))
                    }
                };
                // At most one modifier per source on each bound
                if list
                    .iter()
                    .any(|m| m.same_source(modifier.source_id, modifier.source_type))
                {
                    return Err(StatError::malformed(format!(
                        "vital {} has two {} modifiers from {} {}",
                        id, target, modifier.source_type, modifier.source_id
                    )));
                }
                list.push(modifier);
            }

            let definition = resolve(registry, Identifier::ById(id))?;
            let Entry::Vacant(slot) = vitals.data.entry(definition.id) else {
                return Err(StatError::DuplicateValue(format!("vital {} appears twice", id)));
            };
            slot.insert(VitalData::with_modifiers(
                current,
                min,
                max,
                min_modifiers,
                max_modifiers,
            )?);
        }

        debug!(entries = vitals.len(), "deserialized vitals");
        Ok(vitals)
    }

    fn modify<R>(
        &mut self,
        identifier: Identifier<'_, Vital>,
        f: impl FnOnce(&mut VitalData) -> StatResult<R>,
    ) -> StatResult<R> {
        let definition = resolve(self.registry, identifier)?;
        match self.data.entry(definition.id) {
            Entry::Occupied(mut entry) => f(entry.get_mut()),
            Entry::Vacant(entry) => {
                let mut data = default_data(definition)?;
                let result = f(&mut data)?;
                entry.insert(data);
                Ok(result)
            }
        }
    }
}

fn default_data(definition: &Vital) -> StatResult<VitalData> {
    VitalData::for_type(definition.vital_type, definition.base_min, definition.base_max)
}

/// Attributes raise a vital's maximum
impl ModifierTarget for Vitals<'_> {
    const DATA_TYPE: DataType = DataType::Vital;
    type Checkpoint = BTreeMap<u32, VitalData>;

    fn resolves(&self, name: &str) -> bool {
        self.registry.get_by_name(name).is_some()
    }

    fn push_modifier(&mut self, name: &str, modifier: Modifier) -> StatResult<()> {
        self.modify(Identifier::ByName(name), |data| {
            data.add_modifier(modifier, VitalTarget::CurrentMax)
        })
    }

    fn pull_modifier(
        &mut self,
        name: &str,
        source_id: u32,
        source_type: ModifierSourceType,
    ) -> StatResult<bool> {
        self.remove_modifier(name, source_id, source_type, VitalTarget::CurrentMax)
            .map(|removed| removed.is_some())
    }

    fn checkpoint(&self) -> Self::Checkpoint {
        self.data.clone()
    }

    fn restore(&mut self, checkpoint: Self::Checkpoint) {
        self.data = checkpoint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    const REGISTRY: &str = r#"{
        "VITAL": [
            { "id": 1, "name": "Health", "type": "DEPLETIVE", "baseMin": 0, "baseMax": 100 },
            { "id": 2, "name": "Mana", "type": "depletive", "baseMax": 50 },
            { "id": 3, "name": "Rage", "type": "ACCUMULATIVE" },
            { "id": 4, "name": "Focus", "type": "sideways", "baseMin": 10, "baseMax": 20 }
        ]
    }"#;

    fn registry() -> Registry<Vital> {
        Registry::parse(REGISTRY).unwrap()
    }

    #[test]
    fn test_get_creates_typed_default() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        assert_eq!(vitals.get("Health").unwrap().current(), 100);
        assert_eq!(vitals.get("Mana").unwrap().current(), 50);
        assert_eq!(vitals.get("Rage").unwrap().current(), 0);
        assert_eq!(vitals.get(4u32).unwrap().current(), 15);
        assert_eq!(vitals.len(), 4);
    }

    #[test]
    fn test_max_modifier_keeps_current() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        vitals.add("Health", 80, 0, 100).unwrap();
        vitals
            .add_modifier("Health", 1, ModifierSourceType::Attribute, 20, VitalTarget::CurrentMax)
            .unwrap();

        let health = vitals.get("Health").unwrap();
        assert_eq!(health.current_max(), 120);
        assert_eq!(health.current(), 80);
    }

    #[test]
    fn test_lowering_max_clamps_current() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        vitals.add("Health", 80, 0, 100).unwrap();
        assert_eq!(vitals.update_bound(1u32, VitalTarget::CurrentMax, 50).unwrap(), 50);
        assert_eq!(vitals.get("Health").unwrap().current(), 50);
    }

    #[test]
    fn test_add_out_of_bounds() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        let err = vitals.add("Health", 150, 0, 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(vitals.is_empty());
    }

    #[test]
    fn test_add_duplicate() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        vitals.add("Health", 80, 0, 100).unwrap();
        let err = vitals.add("Health", 80, 0, 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateValue);
    }

    #[test]
    fn test_undefined_identifier() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        let err = vitals.get("Stamina").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedValue);
        assert!(err.detail().contains("Stamina"));
    }

    #[test]
    fn test_remove_unknown_modifier_is_noop() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        vitals.add("Health", 80, 0, 100).unwrap();
        let before = vitals.get("Health").unwrap().clone();
        let removed = vitals
            .remove_modifier("Health", 999, ModifierSourceType::Attribute, VitalTarget::CurrentMax)
            .unwrap();
        assert_eq!(removed, None);
        assert_eq!(vitals.get("Health").unwrap(), &before);
    }

    #[test]
    fn test_update_clamps() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        assert_eq!(vitals.update("Mana", 75).unwrap(), 50);
        assert_eq!(vitals.update("Mana", -5).unwrap(), 0);
    }

    #[test]
    fn test_inverting_update_leaves_container_unchanged() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        let err = vitals
            .update_bound("Focus", VitalTarget::CurrentMin, 30)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(vitals.peek("Focus").unwrap(), None);

        let err = vitals
            .add_modifier("Health", 1, ModifierSourceType::Item, 5, VitalTarget::Current)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(vitals.is_empty());
    }

    #[test]
    fn test_has_and_remove() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        assert!(!vitals.has("Health", 1).unwrap());
        vitals.add("Health", 30, 0, 100).unwrap();
        assert!(vitals.has("Health", 30).unwrap());
        assert!(!vitals.has("Health", 31).unwrap());

        assert!(vitals.remove("Health").unwrap());
        assert!(!vitals.remove("Health").unwrap());
    }

    #[test]
    fn test_serialize_format() {
        let registry = registry();
        let mut vitals = Vitals::new(&registry);

        vitals.get("Rage").unwrap();
        vitals.add("Health", 80, 0, 100).unwrap();
        vitals
            .add_modifier("Health", 1, ModifierSourceType::Attribute, 20, VitalTarget::CurrentMax)
            .unwrap();
        vitals
            .add_modifier("Health", 3, ModifierSourceType::Buff, 5, VitalTarget::CurrentMin)
            .unwrap();

        assert_eq!(
            vitals.serialize(),
            "[VITALS_BEGIN]1:80,5,120;3,BUFF,5,CURRENT_MIN;1,ATTRIBUTE,20,CURRENT_MAX|3:0,0,100[VITALS_END]"
        );
    }

    #[test]
    fn test_deserialize() {
        let registry = registry();
        let text = "name=Bob;[VITALS_BEGIN]1:80,5,120;3,BUFF,5,CURRENT_MIN;1,ATTRIBUTE,20,CURRENT_MAX|3:0,0,100[VITALS_END]";
        let mut vitals = Vitals::deserialize(&registry, text).unwrap();

        let health = vitals.get("Health").unwrap();
        assert_eq!(health.current(), 80);
        assert_eq!(health.current_min(), 5);
        assert_eq!(health.current_max(), 120);
        assert_eq!(health.base_min(), 0);
        assert_eq!(health.base_max(), 100);
        assert_eq!(health.modifiers(VitalTarget::CurrentMin).len(), 1);
        assert_eq!(vitals.peek("Rage").unwrap().map(VitalData::current), Some(0));
        assert_eq!(vitals.len(), 2);
    }

    #[test]
    fn test_deserialize_empty_block() {
        let registry = registry();
        let vitals = Vitals::deserialize(&registry, "[VITALS_BEGIN][VITALS_END]").unwrap();
        assert!(vitals.is_empty());
    }

    #[test]
    fn test_deserialize_errors() {
        let registry = registry();
        let kind = |text: &str| Vitals::deserialize(&registry, text).unwrap_err().kind();

        assert_eq!(kind("1:80,0,100"), ErrorKind::MalformedSerialization);
        assert_eq!(kind("[VITALS_END][VITALS_BEGIN]"), ErrorKind::MalformedSerialization);
        assert_eq!(
            kind("[VITALS_BEGIN]1:80,0[VITALS_END]"),
            ErrorKind::MalformedSerialization
        );
        assert_eq!(
            kind("[VITALS_BEGIN]1:80,0,100;1,ITEM,5[VITALS_END]"),
            ErrorKind::MalformedSerialization
        );
        assert_eq!(
            kind("[VITALS_BEGIN]1:80,0,100;1,ITEM,5,CURRENT[VITALS_END]"),
            ErrorKind::MalformedSerialization
        );
        assert_eq!(
            kind("[VITALS_BEGIN]1:80,0,100;1,ITEM,5,BOTTOM[VITALS_END]"),
            ErrorKind::MalformedSerialization
        );
        assert_eq!(
            kind("[VITALS_BEGIN]7:80,0,100[VITALS_END]"),
            ErrorKind::UndefinedValue
        );
        assert_eq!(
            kind("[VITALS_BEGIN]1:80,0,100|1:80,0,100[VITALS_END]"),
            ErrorKind::DuplicateValue
        );
        assert_eq!(
            kind("[VITALS_BEGIN]1:150,0,100[VITALS_END]"),
            ErrorKind::InvalidData
        );
    }

    #[test]
    fn test_deserialize_rejects_repeated_source_on_one_bound() {
        let registry = registry();
        let text = "[VITALS_BEGIN]1:80,0,120;1,ATTRIBUTE,10,CURRENT_MAX;1,ATTRIBUTE,10,CURRENT_MAX[VITALS_END]";
        let err = Vitals::deserialize(&registry, text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSerialization);

        // The same source on different bounds is fine
        let text = "[VITALS_BEGIN]1:80,10,120;1,ATTRIBUTE,10,CURRENT_MIN;1,ATTRIBUTE,20,CURRENT_MAX[VITALS_END]";
        let mut vitals = Vitals::deserialize(&registry, text).unwrap();
        vitals
            .add_modifier("Health", 1, ModifierSourceType::Attribute, 30, VitalTarget::CurrentMax)
            .unwrap();
        let health = vitals.get("Health").unwrap();
        assert_eq!(health.current_max(), 130);
        assert_eq!(health.modifiers(VitalTarget::CurrentMax).len(), 1);
    }

    fn source_type() -> impl Strategy<Value = ModifierSourceType> {
        prop::sample::select(ModifierSourceType::all().to_vec())
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            entries in prop::collection::btree_map(
                1u32..=4,
                (
                    -50i32..150,
                    prop::collection::vec((0u32..4, source_type(), -20i32..20, any::<bool>()), 0..5),
                ),
                0..=4,
            )
        ) {
            let registry = registry();
            let mut vitals = Vitals::new(&registry);
            for (id, (current, modifiers)) in &entries {
                vitals.update(*id, *current).unwrap();
                for (source_id, source_type, value, is_max) in modifiers {
                    let target = if *is_max { VitalTarget::CurrentMax } else { VitalTarget::CurrentMin };
                    let _ = vitals.add_modifier(*id, *source_id, *source_type, *value, target);
                }
            }

            let restored = Vitals::deserialize(&registry, &vitals.serialize()).unwrap();
            let original: Vec<_> = vitals.iter().collect();
            let round_tripped: Vec<_> = restored.iter().collect();
            prop_assert_eq!(original, round_tripped);
        }
    }
}
