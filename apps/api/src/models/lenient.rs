//! Tolerant field deserializers for plan records.
//!
//! Plan records are produced by an LLM and stored as loose JSON, so any field
//! may be missing, null, or of the wrong shape. These helpers never fail on a
//! shape mismatch: they return the empty value instead, and the field is left
//! out of the report. Use them together with `#[serde(default)]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::models::blocks::ContentBlock;
use crate::models::plan::SectionSource;

/// Scalar text: strings (trimmed, empty → `None`), numbers and booleans.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Array of scalar text. Non-scalar elements are dropped; a non-array is empty.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        Value::Null => Vec::new(),
        other => {
            debug!(found = kind_of(&other), "expected a list of text, skipping");
            Vec::new()
        }
    })
}

/// Booleans, plus the strings "true"/"yes"/"1". Anything else is `false`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}

/// A nested record. Only JSON objects are accepted.
pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(object_as(Value::deserialize(deserializer)?))
}

/// An array of nested records. Elements that do not parse are dropped.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(object_as).collect(),
        _ => Vec::new(),
    })
}

/// A report section: a block array, a structured record, or a JSON string
/// holding either. Anything unusable becomes `None`.
pub fn section<'de, D, T>(deserializer: D) -> Result<Option<SectionSource<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(section_from_value(Value::deserialize(deserializer)?))
}

pub(crate) fn section_from_value<T: DeserializeOwned>(value: Value) -> Option<SectionSource<T>> {
    match value {
        Value::Array(items) => {
            let blocks: Vec<ContentBlock> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect();
            Some(SectionSource::Blocks(blocks))
        }
        value @ Value::Object(_) => object_as(value).map(SectionSource::Record),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(inner @ (Value::Array(_) | Value::Object(_))) => section_from_value(inner),
            _ => {
                debug!("section string is not JSON, skipping");
                None
            }
        },
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn object_as<T: DeserializeOwned>(value: Value) -> Option<T> {
    if !value.is_object() {
        if !value.is_null() {
            debug!(found = kind_of(&value), "expected an object, skipping");
        }
        return None;
    }
    serde_json::from_value(value)
        .map_err(|e| debug!("dropping malformed record: {e}"))
        .ok()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        #[serde(default, deserialize_with = "text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "text_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "flag")]
        on: bool,
    }

    fn probe(value: Value) -> Probe {
        serde_json::from_value(value).expect("lenient probe never fails")
    }

    #[test]
    fn test_text_accepts_scalars() {
        assert_eq!(probe(json!({"name": " Rover "})).name.as_deref(), Some("Rover"));
        assert_eq!(probe(json!({"name": 42})).name.as_deref(), Some("42"));
        assert_eq!(probe(json!({"name": ""})).name, None);
        assert_eq!(probe(json!({"name": {"x": 1}})).name, None);
        assert_eq!(probe(json!({})).name, None);
    }

    #[test]
    fn test_text_list_drops_bad_elements() {
        let p = probe(json!({"tags": ["a", null, {"b": 1}, 3, "  ", "c"]}));
        assert_eq!(p.tags, vec!["a", "3", "c"]);
        assert!(probe(json!({"tags": "not a list"})).tags.is_empty());
    }

    #[test]
    fn test_flag_variants() {
        assert!(probe(json!({"on": true})).on);
        assert!(probe(json!({"on": "Yes"})).on);
        assert!(probe(json!({"on": 1})).on);
        assert!(!probe(json!({"on": "nope"})).on);
        assert!(!probe(json!({"on": null})).on);
    }

    #[test]
    fn test_section_from_string_payload() {
        let value = json!("[{\"kind\":\"paragraph\",\"text\":\"hi\"}]");
        match section_from_value::<Probe>(value) {
            Some(SectionSource::Blocks(blocks)) => {
                assert_eq!(blocks, vec![ContentBlock::paragraph("hi")])
            }
            other => panic!("expected blocks, got {other:?}"),
        }
    }

    #[test]
    fn test_section_rejects_scalars() {
        assert!(section_from_value::<Probe>(json!(12)).is_none());
        assert!(section_from_value::<Probe>(json!("plain words")).is_none());
        assert!(section_from_value::<Probe>(Value::Null).is_none());
    }

    #[test]
    fn test_section_block_array_keeps_valid_blocks() {
        let value = json!([{"kind": "paragraph", "text": "ok"}, {"kind": "table"}, 5]);
        match section_from_value::<Probe>(value) {
            Some(SectionSource::Blocks(blocks)) => assert_eq!(blocks.len(), 1),
            other => panic!("expected blocks, got {other:?}"),
        }
    }
}
