//! Stored documents and the `documents.jsonl` line format.
//!
//! Each line of the file is a single JSON object:
//! ```text
//! {"title": "Mars", "tokens": "fourth planet from the sun red planet"}
//! {"title": "Jupiter", "tokens": "largest planet gas giant"}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EvalError, Result};

/// Identifier of a document: its 0-based position among the non-blank lines
/// of `documents.jsonl`.
pub type DocId = u32;

/// A document's stored fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    fields: BTreeMap<String, String>,
}

impl StoredDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value.
    pub fn with_field<F: Into<String>, V: Into<String>>(mut self, field: F, value: V) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Get the value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Iterate over `(field, value)` pairs in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse one line of `documents.jsonl`.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified, arrays are
    /// joined with a space and `null` fields are skipped.
    pub fn parse_json_line(line: &str, line_number: usize) -> Result<Self> {
        let value: Value = serde_json::from_str(line).map_err(|e| {
            EvalError::index_unavailable(format!("document on line {line_number}: {e}"))
        })?;

        let Value::Object(map) = value else {
            return Err(EvalError::index_unavailable(format!(
                "document on line {line_number} is not a JSON object"
            )));
        };

        let mut doc = StoredDocument::new();
        for (key, val) in map {
            if let Some(text) = value_to_text(&val) {
                doc.fields.insert(key, text);
            }
        }
        Ok(doc)
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
            Some(parts.join(" "))
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_line() {
        let doc = StoredDocument::parse_json_line(
            r#"{"title": "Mars", "tokens": "red planet", "moons": 2, "tags": ["a", "b"], "x": null}"#,
            1,
        )
        .unwrap();

        assert_eq!(doc.get("title"), Some("Mars"));
        assert_eq!(doc.get("tokens"), Some("red planet"));
        assert_eq!(doc.get("moons"), Some("2"));
        assert_eq!(doc.get("tags"), Some("a b"));
        assert_eq!(doc.get("x"), None);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = StoredDocument::parse_json_line("[1, 2]", 4).unwrap_err();
        assert!(matches!(err, EvalError::IndexUnavailable(_)));
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(StoredDocument::parse_json_line("{\"title\": ", 1).is_err());
    }
}
