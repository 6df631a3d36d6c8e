//! Per-entity containers and their text serialization
//!
//! Both containers map definition ID to instance data, borrow the registry
//! they resolve identifiers through, and keep entries ordered by ID so that
//! `serialize` is deterministic.
//!
//! Wire format (delimiters differ between the two blocks):
//!
//! ```text
//! [VITALS_BEGIN]id:current,min,max;sourceId,SOURCE,value,CURRENT_MAX|id:...[VITALS_END]
//! [ATTRIBUTES_BEGIN]id:current,sourceId,SOURCE,value;id:current[ATTRIBUTES_END]
//! ```

mod attributes;
mod vitals;

pub use attributes::Attributes;
pub use vitals::Vitals;

use crate::error::{StatError, StatResult};
use crate::modifier::Modifier;
use crate::types::ModifierSourceType;
use registry_core::{Definition, Identifier, Registry};
use std::str::FromStr;

/// Resolve an identifier or fail with `UndefinedValue`
fn resolve<'r, D: Definition>(
    registry: &'r Registry<D>,
    identifier: Identifier<'_, D>,
) -> StatResult<&'r D> {
    registry.resolve(identifier).ok_or_else(|| {
        StatError::UndefinedValue(format!("{} {}", D::JSON_KEY, identifier.describe()))
    })
}

/// The text between `begin` and the first `end` that follows it
fn extract_block<'t>(text: &'t str, begin: &str, end: &str) -> StatResult<&'t str> {
    let start = text
        .find(begin)
        .ok_or_else(|| StatError::malformed(format!("missing {}", begin)))?
        + begin.len();
    let len = text[start..]
        .find(end)
        .ok_or_else(|| StatError::malformed(format!("missing {} after {}", end, begin)))?;
    Ok(&text[start..start + len])
}

/// Split `id:rest` and parse the ID
fn split_id(entry: &str) -> StatResult<(u32, &str)> {
    let (id, rest) = entry
        .split_once(':')
        .ok_or_else(|| StatError::malformed(format!("entry '{}' has no ':' separator", entry)))?;
    Ok((parse_field(id, "id")?, rest))
}

fn parse_field<T: FromStr>(field: &str, what: &str) -> StatResult<T> {
    field
        .trim()
        .parse()
        .map_err(|_| StatError::malformed(format!("invalid {} '{}'", what, field)))
}

/// Parse `sourceId`, `SOURCE`, `value`
fn parse_modifier(source_id: &str, source_type: &str, value: &str) -> StatResult<Modifier> {
    Ok(Modifier::new(
        parse_field(source_id, "modifier source id")?,
        ModifierSourceType::from(source_type.trim()),
        parse_field(value, "modifier value")?,
    ))
}

fn write_modifier(out: &mut String, modifier: &Modifier) {
    out.push_str(&format!(
        "{},{},{}",
        modifier.source_id, modifier.source_type, modifier.value
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_block() {
        let text = "header [ATTRIBUTES_BEGIN]1:10[ATTRIBUTES_END] trailer";
        assert_eq!(
            extract_block(text, "[ATTRIBUTES_BEGIN]", "[ATTRIBUTES_END]").unwrap(),
            "1:10"
        );
        assert_eq!(
            extract_block("[A][B]", "[A]", "[B]").unwrap(),
            ""
        );
    }

    #[test]
    fn test_extract_block_requires_ordered_markers() {
        assert!(extract_block("1:10[B]", "[A]", "[B]").is_err());
        assert!(extract_block("[A]1:10", "[A]", "[B]").is_err());
        assert!(extract_block("[B]1:10[A]", "[A]", "[B]").is_err());
    }

    #[test]
    fn test_split_id() {
        assert_eq!(split_id("12:5,6").unwrap(), (12, "5,6"));
        assert!(matches!(split_id("12"), Err(StatError::MalformedSerialization(_))));
        assert!(matches!(split_id("x:1"), Err(StatError::MalformedSerialization(_))));
        assert!(matches!(split_id("-1:1"), Err(StatError::MalformedSerialization(_))));
    }

    #[test]
    fn test_parse_modifier() {
        let modifier = parse_modifier("3", "BUFF", "-7").unwrap();
        assert_eq!(modifier, Modifier::new(3, ModifierSourceType::Buff, -7));
        assert!(parse_modifier("3", "BUFF", "seven").is_err());
    }
}
