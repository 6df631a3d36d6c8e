//! Turns an attribute's `Modifies` declarations into modifiers on another
//! container

use super::{Modifier, Modifies, ModifyType};
use crate::container::Attributes;
use crate::definition::Attribute;
use crate::error::{StatError, StatResult};
use crate::types::{DataType, ModifierSourceType};
use tracing::{debug, warn};

/// A container that can receive modifiers by definition name
///
/// Implemented by `Attributes` and `Vitals`. Vitals receive them on
/// `CURRENT_MAX`.
pub trait ModifierTarget {
    /// The `targetType` a `Modifies` entry must carry to reach this container
    const DATA_TYPE: DataType;

    /// Saved state used to undo a partially applied batch
    type Checkpoint;

    /// Whether `name` resolves in this container's registry
    fn resolves(&self, name: &str) -> bool;

    fn push_modifier(&mut self, name: &str, modifier: Modifier) -> StatResult<()>;

    /// Returns whether a modifier was removed
    fn pull_modifier(
        &mut self,
        name: &str,
        source_id: u32,
        source_type: ModifierSourceType,
    ) -> StatResult<bool>;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn restore(&mut self, checkpoint: Self::Checkpoint);
}

/// How a fractional delta becomes an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Toward zero
    #[default]
    Truncate,
    Floor,
    Ceil,
    /// Half away from zero
    Nearest,
}

impl Rounding {
    /// Round and saturate into i32 (NaN becomes 0)
    pub fn apply(&self, value: f64) -> i32 {
        let rounded = match self {
            Rounding::Truncate => value.trunc(),
            Rounding::Floor => value.floor(),
            Rounding::Ceil => value.ceil(),
            Rounding::Nearest => value.round(),
        };
        rounded as i32
    }
}

/// Pushes the modifiers an attribute declares onto a target container
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierApplicator {
    pub rounding: Rounding,
}

impl ModifierApplicator {
    pub fn new(rounding: Rounding) -> Self {
        ModifierApplicator { rounding }
    }

    /// Delta produced by one entry for a source value
    ///
    /// Only `ADD` has a numeric rule: `modify_value_per * source_value`.
    pub fn delta(&self, modifies: &Modifies, source_value: i32) -> Option<i32> {
        match modifies.modify_type {
            ModifyType::Add => Some(
                self.rounding
                    .apply(modifies.modify_value_per * source_value as f64),
            ),
            ModifyType::Multiply | ModifyType::Set | ModifyType::Unknown => None,
        }
    }

    /// Apply every entry of `source` aimed at `T` with the given source value
    ///
    /// Target names are all resolved before anything is pushed. If a push
    /// fails, the target is restored to its state before the call. Returns
    /// the number of modifiers pushed.
    pub fn apply<T: ModifierTarget>(
        &self,
        source: &Attribute,
        source_value: i32,
        target: &mut T,
    ) -> StatResult<usize> {
        let pending = self.plan(source, source_value, target)?;

        let checkpoint = target.checkpoint();
        for (name, delta) in &pending {
            let modifier = Modifier::new(source.id, ModifierSourceType::Attribute, *delta);
            if let Err(e) = target.push_modifier(name, modifier) {
                target.restore(checkpoint);
                return Err(e);
            }
            debug!(source = %source.name, target = %name, delta, "pushed modifier");
        }
        Ok(pending.len())
    }

    /// Run [`apply`](Self::apply) for every attribute held by `sources`,
    /// using each one's current value
    ///
    /// All or nothing: a failure restores the target.
    pub fn apply_all<T: ModifierTarget>(
        &self,
        sources: &Attributes<'_>,
        target: &mut T,
    ) -> StatResult<usize> {
        let checkpoint = target.checkpoint();
        let mut pushed = 0;
        for (id, data) in sources.iter() {
            let Some(source) = sources.registry().get_by_id(id) else {
                target.restore(checkpoint);
                return Err(StatError::UndefinedValue(format!(
                    "ATTRIBUTE id {} held by the source container",
                    id
                )));
            };
            match self.apply(source, data.current(), target) {
                Ok(count) => pushed += count,
                Err(e) => {
                    target.restore(checkpoint);
                    return Err(e);
                }
            }
        }
        Ok(pushed)
    }

    /// Remove the modifiers `source` pushed onto `target`
    ///
    /// Returns the number removed. Entries whose target no longer resolves
    /// are skipped.
    pub fn revoke<T: ModifierTarget>(&self, source: &Attribute, target: &mut T) -> StatResult<usize> {
        let checkpoint = target.checkpoint();
        let mut removed = 0;
        for modifies in self.entries_for::<T>(source) {
            if modifies.modify_type != ModifyType::Add || !target.resolves(&modifies.target_name) {
                continue;
            }
            match target.pull_modifier(&modifies.target_name, source.id, ModifierSourceType::Attribute) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    target.restore(checkpoint);
                    return Err(e);
                }
            }
        }
        Ok(removed)
    }

    fn entries_for<'s, T: ModifierTarget>(
        &self,
        source: &'s Attribute,
    ) -> impl Iterator<Item = &'s Modifies> {
        source
            .modifies
            .iter()
            .filter(|m| m.target_type == T::DATA_TYPE)
    }

    /// Resolve every applicable entry to `(target name, delta)`
    fn plan<'s, T: ModifierTarget>(
        &self,
        source: &'s Attribute,
        source_value: i32,
        target: &T,
    ) -> StatResult<Vec<(&'s str, i32)>> {
        let mut pending = Vec::new();
        for modifies in self.entries_for::<T>(source) {
            let Some(delta) = self.delta(modifies, source_value) else {
                warn!(
                    source = %source.name,
                    entry = %modifies,
                    "skipping modifies entry without a numeric rule"
                );
                continue;
            };
            if !target.resolves(&modifies.target_name) {
                return Err(StatError::UndefinedValue(format!(
                    "{} '{}' named by attribute '{}'",
                    T::DATA_TYPE,
                    modifies.target_name,
                    source.name
                )));
            }
            pending.push((modifies.target_name.as_str(), delta));
        }
        Ok(pending)
    }
}
