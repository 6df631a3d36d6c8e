use super::{extract_block, parse_field, parse_modifier, resolve, split_id, write_modifier};
use crate::data::AttributeData;
use crate::definition::Attribute;
use crate::error::{StatError, StatResult};
use crate::modifier::{Modifier, ModifierTarget};
use crate::types::{DataType, ModifierSourceType};
use registry_core::{Identifier, Registry};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

const BEGIN: &str = "[ATTRIBUTES_BEGIN]";
const END: &str = "[ATTRIBUTES_END]";

/// One entity's attributes, keyed by attribute ID
///
/// Every operation accepts a name, an ID or an `&Attribute`. Identifiers
/// that do not resolve in the registry fail with `UndefinedValue`; a failed
/// operation leaves the container unchanged.
#[derive(Debug, Clone)]
pub struct Attributes<'r> {
    registry: &'r Registry<Attribute>,
    data: BTreeMap<u32, AttributeData>,
}

impl<'r> Attributes<'r> {
    pub fn new(registry: &'r Registry<Attribute>) -> Self {
        Attributes {
            registry,
            data: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &'r Registry<Attribute> {
        self.registry
    }

    /// Insert data under an ID without resolving it
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, id: u32, data: AttributeData) {
        self.data.insert(id, data);
    }

    /// Data for an attribute, created from its base value if absent
    pub fn get<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Attribute>>,
    ) -> StatResult<&AttributeData> {
        let definition = resolve(self.registry, identifier.into())?;
        Ok(self
            .data
            .entry(definition.id)
            .or_insert_with(|| AttributeData::new(definition.base_value)))
    }

    /// Data for an attribute, without creating it
    pub fn peek<'a>(
        &self,
        identifier: impl Into<Identifier<'a, Attribute>>,
    ) -> StatResult<Option<&AttributeData>> {
        let definition = resolve(self.registry, identifier.into())?;
        Ok(self.data.get(&definition.id))
    }

    /// Create data with an explicit current value
    pub fn add<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Attribute>>,
        current: i32,
    ) -> StatResult<()> {
        let definition = resolve(self.registry, identifier.into())?;
        match self.data.entry(definition.id) {
            Entry::Occupied(_) => Err(StatError::DuplicateValue(format!(
                "attribute '{}' (id {}) already has data",
                definition.name, definition.id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(AttributeData::new(current));
                Ok(())
            }
        }
    }

    /// Set the current value; returns it
    pub fn update<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Attribute>>,
        value: i32,
    ) -> StatResult<i32> {
        self.modify(identifier.into(), |data| {
            data.set_current(value)?;
            Ok(data.current())
        })
    }

    /// Stack a modifier; `false` if an identical one was already present
    pub fn add_modifier<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Attribute>>,
        source_id: u32,
        source_type: ModifierSourceType,
        value: i32,
    ) -> StatResult<bool> {
        let modifier = Modifier::new(source_id, source_type, value);
        self.modify(identifier.into(), |data| data.add_modifier(modifier))
    }

    /// Remove the first modifier from this source; absent data is a no-op
    pub fn remove_modifier<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Attribute>>,
        source_id: u32,
        source_type: ModifierSourceType,
    ) -> StatResult<Option<Modifier>> {
        let definition = resolve(self.registry, identifier.into())?;
        match self.data.get_mut(&definition.id) {
            Some(data) => data.remove_modifier(source_id, source_type),
            None => Ok(None),
        }
    }

    /// Drop an attribute's data; `false` if there was none
    pub fn remove<'a>(
        &mut self,
        identifier: impl Into<Identifier<'a, Attribute>>,
    ) -> StatResult<bool> {
        let definition = resolve(self.registry, identifier.into())?;
        Ok(self.data.remove(&definition.id).is_some())
    }

    /// Whether data exists and its current value is at least `amount`
    pub fn has<'a>(
        &self,
        identifier: impl Into<Identifier<'a, Attribute>>,
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
    pub fn iter(&self) -> impl Iterator<Item = (u32, &AttributeData)> + '_ {
        self.data.iter().map(|(id, data)| (*id, data))
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// `[ATTRIBUTES_BEGIN]id:current(,sourceId,SOURCE,value)*(;...)*[ATTRIBUTES_END]`
    pub fn serialize(&self) -> String {
        let entries: Vec<String> = self
            .data
            .iter()
            .map(|(id, data)| {
                let mut entry = format!("{}:{}", id, data.current());
                for modifier in data.modifiers() {
                    entry.push(',');
                    write_modifier(&mut entry, modifier);
                }
                entry
            })
            .collect();

        format!("{}{}{}", BEGIN, entries.join(";"), END)
    }

    /// Rebuild a container from text produced by [`Attributes::serialize`]
    ///
    /// The block may be embedded in a larger string. Every ID is resolved
    /// again through `registry`.
    pub fn deserialize(registry: &'r Registry<Attribute>, text: &str) -> StatResult<Self> {
        let block = extract_block(text, BEGIN, END)?;
        let mut attributes = Attributes::new(registry);
        if block.is_empty() {
            return Ok(attributes);
        }

        for entry in block.split(';') {
            let (id, rest) = split_id(entry)?;
            let mut fields = rest.split(',');
            let current = parse_field(fields.next().unwrap_or_default(), "current")?;

            let fields: Vec<&str> = fields.collect();
            if fields.len() % 3 != 0 {
                return Err(StatError::malformed(format!(
                    "attribute {} has {} modifier fields, expected a multiple of 3",
                    id,
                    fields.len()
                )));
            }
            let modifiers = fields
                .chunks(3)
                .map(|f| parse_modifier(f[0], f[1], f[2]))
                .collect::<StatResult<Vec<_>>>()?;

            let definition = resolve(registry, Identifier::ById(id))?;
            let Entry::Vacant(slot) = attributes.data.entry(definition.id) else {
                return Err(StatError::DuplicateValue(format!(
                    "attribute {} appears twice",
                    id
                )));
            };
            slot.insert(AttributeData::with_modifiers(current, modifiers)?);
        }

        debug!(entries = attributes.len(), "deserialized attributes");
        Ok(attributes)
    }

    /// Run `f` on existing data, or on fresh default data that is only
    /// kept if `f` succeeds
    fn modify<R>(
        &mut self,
        identifier: Identifier<'_, Attribute>,
        f: impl FnOnce(&mut AttributeData) -> StatResult<R>,
    ) -> StatResult<R> {
        let definition = resolve(self.registry, identifier)?;
        match self.data.entry(definition.id) {
            Entry::Occupied(mut entry) => f(entry.get_mut()),
            Entry::Vacant(entry) => {
                let mut data = AttributeData::new(definition.base_value);
                let result = f(&mut data)?;
                entry.insert(data);
                Ok(result)
            }
        }
    }
}

impl ModifierTarget for Attributes<'_> {
    const DATA_TYPE: DataType = DataType::Attribute;
    type Checkpoint = BTreeMap<u32, AttributeData>;

    fn resolves(&self, name: &str) -> bool {
        self.registry.get_by_name(name).is_some()
    }

    fn push_modifier(&mut self, name: &str, modifier: Modifier) -> StatResult<()> {
        self.modify(Identifier::ByName(name), |data| data.add_modifier(modifier))
            .map(|_| ())
    }

    fn pull_modifier(
        &mut self,
        name: &str,
        source_id: u32,
        source_type: ModifierSourceType,
    ) -> StatResult<bool> {
        self.remove_modifier(name, source_id, source_type)
            .map(|removed| removed.is_some())
    }

    fn checkpoint(&self) -> Self::Checkpoint {
        self.data.clone()
    }

    fn restore(&mut self, checkpoint: Self::Checkpoint) {
        self.data = checkpoint;
    }
}
