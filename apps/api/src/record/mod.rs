//! Property-bag model for parsed candidate CV data.
//!
//! Parsed CV JSON has no fixed schema. A field may be a string in one record
//! and a list in the next, or a single object where another record has an
//! array of objects. Every accessor here is total: missing keys and shape
//! mismatches come back as `None` or an empty sequence, never as an error.

use std::collections::BTreeMap;

use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed candidate JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A loosely-typed value inside a candidate record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Bag(BTreeMap<String, FieldValue>),
    Sequence(Vec<FieldValue>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => {
                FieldValue::Sequence(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Bag(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl FieldValue {
    /// Looks up `key` when this value is a bag. JSON `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Bag(map) => map.get(key).filter(|v| !v.is_null()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Scalar rendering. Bags and sequences have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null | FieldValue::Bag(_) | FieldValue::Sequence(_) => None,
        }
    }

    /// Scalar text of `key`, possibly empty.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// Scalar text of `key`, only when non-empty.
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.is_empty())
    }
}

/// Normalizes a singular-or-list field into a uniform sequence.
///
/// `None` and `null` give an empty sequence, a genuine sequence is returned
/// item by item, and any other value (scalar or bag) becomes a one-item
/// sequence.
pub fn as_sequence(value: Option<&FieldValue>) -> Vec<&FieldValue> {
    match value {
        None | Some(FieldValue::Null) => Vec::new(),
        Some(FieldValue::Sequence(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Non-blank scalar items of a singular-or-list field.
pub fn text_items(value: Option<&FieldValue>) -> Vec<String> {
    as_sequence(value)
        .into_iter()
        .filter_map(FieldValue::as_text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Scalar items of a singular-or-list field joined by `separator`, or `None`
/// if nothing printable remains.
pub fn joined_text(value: Option<&FieldValue>, separator: &str) -> Option<String> {
    let items = text_items(value);
    if items.is_empty() {
        None
    } else {
        Some(items.join(separator))
    }
}

/// One parsed candidate CV.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord(FieldValue);

impl CandidateRecord {
    /// Deserializes a stored JSON blob. Any well-formed JSON is accepted; a
    /// top-level value that is not an object yields a record with no fields.
    pub fn parse(json: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(CandidateRecord(FieldValue::from(value)))
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.0.non_empty(key)
    }

    /// The first of `keys` that is present, even if its value is empty.
    pub fn first_present(&self, keys: &[&str]) -> Option<&FieldValue> {
        keys.iter().find_map(|k| self.get(k))
    }
}
