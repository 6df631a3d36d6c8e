use crate::error::{StatError, StatResult};
use crate::modifier::{total, Modifier};
use crate::types::{ModifierSourceType, VitalTarget, VitalType};
use serde::{Deserialize, Serialize};

/// Live value of one vital for one entity
///
/// Invariants held after every successful call:
/// - `current_min <= current <= current_max`
/// - `current_min == base_min + sum(min_modifiers)`
/// - `current_max == base_max + sum(max_modifiers)`
///
/// A failed call leaves the data unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalData {
    current: i32,
    current_min: i32,
    current_max: i32,
    min_modifiers: Vec<Modifier>,
    max_modifiers: Vec<Modifier>,
}

impl VitalData {
    /// Create data with explicit numbers and no modifiers
    pub fn new(current: i32, min: i32, max: i32) -> StatResult<Self> {
        check_bounds(current, min, max)?;
        Ok(VitalData {
            current,
            current_min: min,
            current_max: max,
            min_modifiers: Vec::new(),
            max_modifiers: Vec::new(),
        })
    }

    /// Default data for a freshly created vital
    ///
    /// Depletive vitals start full, accumulative ones start empty and
    /// anything else starts halfway.
    pub fn for_type(vital_type: VitalType, min: i32, max: i32) -> StatResult<Self> {
        if min > max {
            return Err(inverted(min, max));
        }
        let current = match vital_type {
            VitalType::Depletive => max,
            VitalType::Accumulative => min,
            VitalType::Unknown => (min as i64 + (max as i64 - min as i64) / 2) as i32,
        };
        VitalData::new(current, min, max)
    }

    /// Rebuild data whose bounds already include their modifiers
    pub fn with_modifiers(
        current: i32,
        min: i32,
        max: i32,
        min_modifiers: Vec<Modifier>,
        max_modifiers: Vec<Modifier>,
    ) -> StatResult<Self> {
        check_bounds(current, min, max)?;
        check_one_per_source(&min_modifiers)?;
        check_one_per_source(&max_modifiers)?;
        checked_base(min as i64, total(&min_modifiers))?;
        checked_base(max as i64, total(&max_modifiers))?;
        Ok(VitalData {
            current,
            current_min: min,
            current_max: max,
            min_modifiers,
            max_modifiers,
        })
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn current_min(&self) -> i32 {
        self.current_min
    }

    pub fn current_max(&self) -> i32 {
        self.current_max
    }

    /// Value of `target`
    pub fn value(&self, target: VitalTarget) -> i32 {
        match target {
            VitalTarget::Current => self.current,
            VitalTarget::CurrentMin => self.current_min,
            VitalTarget::CurrentMax => self.current_max,
        }
    }

    /// Minimum before modifiers
    pub fn base_min(&self) -> i32 {
        (self.current_min as i64 - total(&self.min_modifiers)) as i32
    }

    /// Maximum before modifiers
    pub fn base_max(&self) -> i32 {
        (self.current_max as i64 - total(&self.max_modifiers)) as i32
    }

    /// Modifiers stacked on `target`; `Current` never carries any
    pub fn modifiers(&self, target: VitalTarget) -> &[Modifier] {
        match target {
            VitalTarget::Current => &[],
            VitalTarget::CurrentMin => &self.min_modifiers,
            VitalTarget::CurrentMax => &self.max_modifiers,
        }
    }

    /// Set the current value, clamped into `[current_min, current_max]`
    pub fn set_current(&mut self, value: i32) {
        self.current = value.clamp(self.current_min, self.current_max);
    }

    /// Set one of the three numbers
    ///
    /// `Current` clamps. A bound keeps its modifiers stacked on top of a new
    /// base and fails if it would cross the other bound.
    pub fn set_bound(&mut self, target: VitalTarget, value: i32) -> StatResult<()> {
        match target {
            VitalTarget::Current => self.set_current(value),
            VitalTarget::CurrentMin => {
                if value > self.current_max {
                    return Err(inverted(value, self.current_max));
                }
                checked_base(value as i64, total(&self.min_modifiers))?;
                self.current_min = value;
                self.clamp();
            }
            VitalTarget::CurrentMax => {
                if self.current_min > value {
                    return Err(inverted(self.current_min, value));
                }
                checked_base(value as i64, total(&self.max_modifiers))?;
                self.current_max = value;
                self.clamp();
            }
        }
        Ok(())
    }

    /// Stack a modifier on `CurrentMin` or `CurrentMax`
    ///
    /// A modifier already present from the same source is replaced.
    pub fn add_modifier(&mut self, modifier: Modifier, target: VitalTarget) -> StatResult<()> {
        let list = self.list(target)?;
        let existing = list
            .iter()
            .position(|m| m.same_source(modifier.source_id, modifier.source_type));
        let replaced = existing.map_or(0, |i| list[i].value as i64);
        let delta = modifier.value as i64 - replaced;

        let bound = self.bound_after(target, delta, total(list) + delta)?;

        let list = self.list_mut(target);
        match existing {
            Some(i) => list[i] = modifier,
            None => list.push(modifier),
        }
        self.set_bound_unchecked(target, bound);
        Ok(())
    }

    /// Remove the first modifier from this source on `target`
    ///
    /// No match is a no-op and returns `Ok(None)`.
    pub fn remove_modifier(
        &mut self,
        source_id: u32,
        source_type: ModifierSourceType,
        target: VitalTarget,
    ) -> StatResult<Option<Modifier>> {
        let list = self.list(target)?;
        let Some(index) = list
            .iter()
            .position(|m| m.same_source(source_id, source_type))
        else {
            return Ok(None);
        };
        let delta = -(list[index].value as i64);

        let bound = self.bound_after(target, delta, total(list) + delta)?;

        let removed = self.list_mut(target).remove(index);
        self.set_bound_unchecked(target, bound);
        Ok(Some(removed))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn list(&self, target: VitalTarget) -> StatResult<&Vec<Modifier>> {
        match target {
            VitalTarget::CurrentMin => Ok(&self.min_modifiers),
            VitalTarget::CurrentMax => Ok(&self.max_modifiers),
            VitalTarget::Current => Err(StatError::InvalidData(
                "modifiers can only target CURRENT_MIN or CURRENT_MAX".to_string(),
            )),
        }
    }

    /// Only called after `list` has accepted the target
    fn list_mut(&mut self, target: VitalTarget) -> &mut Vec<Modifier> {
        match target {
            VitalTarget::CurrentMin => &mut self.min_modifiers,
            _ => &mut self.max_modifiers,
        }
    }

    /// The bound `target` would have after shifting by `delta`, checked
    /// against the other bound and i32 range
    fn bound_after(&self, target: VitalTarget, delta: i64, new_total: i64) -> StatResult<i32> {
        let bound = self.value(target) as i64 + delta;
        let bound = checked_base(bound, new_total)?;
        match target {
            VitalTarget::CurrentMin if bound > self.current_max => {
                Err(inverted(bound, self.current_max))
            }
            VitalTarget::CurrentMax if self.current_min > bound => {
                Err(inverted(self.current_min, bound))
            }
            _ => Ok(bound),
        }
    }

    fn set_bound_unchecked(&mut self, target: VitalTarget, bound: i32) {
        match target {
            VitalTarget::CurrentMin => self.current_min = bound,
            _ => self.current_max = bound,
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.current = self.current.clamp(self.current_min, self.current_max);
    }
}

fn check_bounds(current: i32, min: i32, max: i32) -> StatResult<()> {
    if min > max {
        return Err(inverted(min, max));
    }
    if current < min || current > max {
        return Err(StatError::InvalidData(format!(
            "current({}) outside [{}, {}]",
            current, min, max
        )));
    }
    Ok(())
}

fn check_one_per_source(modifiers: &[Modifier]) -> StatResult<()> {
    for (i, modifier) in modifiers.iter().enumerate() {
        if modifiers[..i]
            .iter()
            .any(|m| m.same_source(modifier.source_id, modifier.source_type))
        {
            return Err(StatError::InvalidData(format!(
                "more than one modifier from {} {}",
                modifier.source_type, modifier.source_id
            )));
        }
    }
    Ok(())
}

/// Check that a bound, its modifier total and the implied base all fit in i32
fn checked_base(bound: i64, total: i64) -> StatResult<i32> {
    let fits = |v: i64| i32::try_from(v).is_ok();
    if fits(bound) && fits(total) && fits(bound - total) {
        Ok(bound as i32)
    } else {
        Err(StatError::InvalidData(format!(
            "bound {} with modifier total {} is out of range",
            bound, total
        )))
    }
}

fn inverted(min: impl std::fmt::Display, max: impl std::fmt::Display) -> StatError {
    StatError::InvalidData(format!("min({}) > max({})", min, max))
}
