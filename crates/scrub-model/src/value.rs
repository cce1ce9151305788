//! Scalar cell values.
//!
//! Records arrive from the ingestion boundary as flat JSON objects, so
//! `Value` serializes untagged: text, numbers, and booleans round-trip as
//! their native JSON scalars and `Missing` as `null`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell in a record.
///
/// Untagged variant order matters for deserialization: `null` must bind
/// to `Missing` and integral numbers to `Int` before `Float` is tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Shared sentinel for absent cells in sparse records.
pub static MISSING: Value = Value::Missing;

impl Value {
    /// Whether this cell counts as missing.
    ///
    /// The ingestion boundary represents missing data both as `null` and
    /// as the empty string, so both are treated as missing throughout the
    /// pipeline. Whitespace-only text is not missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell, if it has one.
    ///
    /// Intrinsic numbers convert directly; text is accepted when it parses
    /// as a finite number. Booleans and missing cells have no numeric view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            Value::Text(text) => parse_f64(text),
            _ => None,
        }
    }

    /// Text view of the cell, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Canonical string rendering used for join keys, dedup keys, and
    /// tabular output. Missing renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Bool(value) => value.to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => format_numeric(*value),
            Value::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Render a float without a trailing `.0` when it is integral.
pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_missing() {
        assert!(Value::Missing.is_missing());
        assert!(Value::Text(String::new()).is_missing());
        assert!(!Value::Text(" ".to_string()).is_missing());
        assert!(!Value::Int(0).is_missing());
    }

    #[test]
    fn numeric_view_parses_text() {
        assert_eq!(Value::Text("31.5".to_string()).as_f64(), Some(31.5));
        assert_eq!(Value::Text(" 42 ".to_string()).as_f64(), Some(42.0));
        assert_eq!(Value::Text("n/a".to_string()).as_f64(), None);
        assert_eq!(Value::Bool(true).as_f64(), None);
    }

    #[test]
    fn untagged_round_trip() {
        let json = r#"{"a": 1, "b": 1.5, "c": "x", "d": null, "e": true}"#;
        let cells: std::collections::BTreeMap<String, Value> =
            serde_json::from_str(json).expect("deserialize");
        assert_eq!(cells["a"], Value::Int(1));
        assert_eq!(cells["b"], Value::Float(1.5));
        assert_eq!(cells["c"], Value::Text("x".to_string()));
        assert_eq!(cells["d"], Value::Missing);
        assert_eq!(cells["e"], Value::Bool(true));
        assert_eq!(serde_json::to_string(&cells["d"]).expect("serialize"), "null");
    }

    #[test]
    fn render_drops_trailing_zero() {
        assert_eq!(Value::Float(31.0).render(), "31");
        assert_eq!(Value::Float(31.5).render(), "31.5");
    }
}
