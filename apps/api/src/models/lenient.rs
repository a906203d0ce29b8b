//! Fail-soft field decoders for loosely-typed resume payloads.
//!
//! Used as `#[serde(default, deserialize_with = "lenient::...")]` on entry fields so a
//! single odd field (number where a string was expected, string where a list
//! was expected) degrades to a sensible value instead of rejecting the entry.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar as text. Strings pass through, numbers are written in
/// decimal, everything else becomes empty.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Splits a comma-delimited list, trimming each token and dropping blanks.
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub fn value_to_tokens(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Value::String(s) => split_tokens(s),
        _ => Vec::new(),
    }
}

/// Splits a newline-joined field back into lines. An empty field has none.
pub fn split_lines(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split('\n').map(String::from).collect()
}

pub fn value_to_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_text).collect(),
        Value::String(s) => split_lines(s),
        _ => Vec::new(),
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(&Value::deserialize(deserializer)?))
}

/// Array of tokens or a comma-delimited string.
pub fn tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_tokens(&Value::deserialize(deserializer)?))
}

/// Array of lines or a newline-delimited string.
pub fn lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_lines(&Value::deserialize(deserializer)?))
}

/// Collapses a list into a single `", "`-joined display string.
pub fn joined<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => value_to_text(&other),
    })
}

pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(n.map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "tokens")]
        stack: Vec<String>,
        #[serde(default, deserialize_with = "joined")]
        roles: String,
        #[serde(default, deserialize_with = "count")]
        members: u32,
        #[serde(default, deserialize_with = "lines")]
        summary: Vec<String>,
    }

    fn probe(value: Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_default() {
        let p = probe(json!({}));
        assert_eq!(p.name, "");
        assert!(p.stack.is_empty());
        assert_eq!(p.members, 0);
    }

    #[test]
    fn test_text_accepts_numbers_and_drops_objects() {
        assert_eq!(probe(json!({ "name": 2304 })).name, "2304");
        assert_eq!(probe(json!({ "name": { "a": 1 } })).name, "");
        assert_eq!(probe(json!({ "name": null })).name, "");
    }

    #[test]
    fn test_tokens_from_comma_string() {
        let p = probe(json!({ "stack": "React, Node" }));
        assert_eq!(p.stack, vec!["React", "Node"]);
    }

    #[test]
    fn test_tokens_from_array_trims_and_skips_blanks() {
        let p = probe(json!({ "stack": [" Rust ", "", "Go", null] }));
        assert_eq!(p.stack, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_tokens_from_other_type() {
        assert!(probe(json!({ "stack": 7 })).stack.is_empty());
    }

    #[test]
    fn test_joined_collapses_array() {
        let p = probe(json!({ "roles": ["FE 2", "BE 1"] }));
        assert_eq!(p.roles, "FE 2, BE 1");
        assert_eq!(probe(json!({ "roles": "solo" })).roles, "solo");
    }

    #[test]
    fn test_count_variants() {
        assert_eq!(probe(json!({ "members": 4 })).members, 4);
        assert_eq!(probe(json!({ "members": "5" })).members, 5);
        assert_eq!(probe(json!({ "members": -1 })).members, 0);
        assert_eq!(probe(json!({ "members": "many" })).members, 0);
    }

    #[test]
    fn test_lines_variants() {
        assert_eq!(probe(json!({ "summary": "a\nb" })).summary, vec!["a", "b"]);
        assert!(probe(json!({ "summary": "" })).summary.is_empty());
        assert_eq!(probe(json!({ "summary": ["x", "y"] })).summary, vec!["x", "y"]);
    }
}
