use serde::de::DeserializeOwned;

/// A template loaded in bulk into a [`Registry`](crate::Registry)
///
/// Implementors are parsed from one element of the JSON array stored under
/// [`Definition::JSON_KEY`]. Every element must carry an `id` and a `name`.
pub trait Definition: DeserializeOwned {
    /// Top-level JSON key holding the array of definitions (e.g. `"VITAL"`)
    const JSON_KEY: &'static str;

    /// Stable numeric id
    fn id(&self) -> u32;

    /// Unique name
    fn name(&self) -> &str;

    /// One-line human readable summary used by [`Registry::dump`](crate::Registry::dump)
    fn describe(&self) -> String {
        format!("Name: {}", self.name())
    }
}

/// The three ways a caller can point at a definition
#[derive(Debug)]
pub enum Identifier<'a, D> {
    ByName(&'a str),
    ById(u32),
    /// Resolved through the definition's id, so a definition that is not
    /// (or no longer) registered does not resolve.
    ByDefinition(&'a D),
}

// Manual impls: deriving would require `D: Clone`/`D: Copy`.
impl<D> Clone for Identifier<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Identifier<'_, D> {}

impl<D: Definition> Identifier<'_, D> {
    /// Text used in error messages
    pub fn describe(&self) -> String {
        match self {
            Identifier::ByName(name) => format!("name '{}'", name),
            Identifier::ById(id) => format!("id {}", id),
            Identifier::ByDefinition(def) => format!("definition '{}' (id {})", def.name(), def.id()),
        }
    }
}

impl<'a, D> From<&'a str> for Identifier<'a, D> {
    fn from(name: &'a str) -> Self {
        Identifier::ByName(name)
    }
}

impl<D> From<u32> for Identifier<'_, D> {
    fn from(id: u32) -> Self {
        Identifier::ById(id)
    }
}

impl<'a, D: Definition> From<&'a D> for Identifier<'a, D> {
    fn from(def: &'a D) -> Self {
        Identifier::ByDefinition(def)
    }
}
