//! Admin mutations: projects, sections, units, images and files.
//!
//! Every operation returns a `Result`. The dashboard turns the outcome into
//! an inline [`AdminMessage`] instead of failing.

pub mod media;
pub mod projects;
pub mod sections;
pub mod units;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SafwaError};
use crate::store::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Warning,
    Error,
}

/// Inline feedback shown after an admin action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl AdminMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

impl From<&SafwaError> for AdminMessage {
    fn from(err: &SafwaError) -> Self {
        AdminMessage::error(err.to_string())
    }
}

/// URL slug from a project name: lowercase, spaces to `-`, then everything
/// outside `[A-Za-z0-9_-]` dropped. Non-Latin names produce an empty slug.
pub fn generate_slug(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Text column: blank input is stored as null.
pub(crate) fn optional_text(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

/// Decimal column from form input: blank is null, anything else must parse.
pub(crate) fn optional_number(value: &str, field: &str) -> Result<Value> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Value::from)
        .ok_or_else(|| SafwaError::Validation(format!("{field} must be a number, got '{trimmed}'")))
}

/// Whole-number column from form input: blank is null.
pub(crate) fn optional_count(value: &str, field: &str) -> Result<Value> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    trimmed
        .parse::<u32>()
        .map(Value::from)
        .map_err(|_| SafwaError::Validation(format!("{field} must be a whole number, got '{trimmed}'")))
}

/// Build a row from `(column, value)` pairs.
pub(crate) fn row_of<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    pairs
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}
