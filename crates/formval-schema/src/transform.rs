//! # Transform Stage
//!
//! Normalizes raw input into the canonical JSON shape each field type
//! expects. Transforms never fail: input they cannot normalize is either
//! mapped to `null` or passed through unchanged for the shape check to
//! reject.
//!
//! Every transform is idempotent: applying it to its own output yields
//! the same value.

use formval_core::temporal::{format_date, parse_form_datetime, parse_strict_date, to_iso_millis};
use formval_core::{is_falsy, RelationRef};
use serde_json::Value;

/// The normalization applied before any check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Passthrough; an absent value becomes `null`.
    Identity,
    /// Trim strings, empty to `null`; non-strings become `null`.
    TrimToNull,
    /// Cast scalars to strings, trim, empty to `null`.
    CastTrimToNull,
    /// Cast scalars to strings, exact `""` to `null`, no trimming.
    CastEmptyToNull,
    /// `"true"`/`"false"` to booleans, other strings to `null`, absent to `false`.
    BoolFromText,
    /// Exact `""` to `null`; numeric text is left for the shape check.
    EmptyToNull,
    /// Falsy to `null`, otherwise the referenced identifier.
    RelationId,
    /// Array of references to array of identifiers; falsy or empty to `[]`.
    RelationIds,
    /// Keep trimmed non-empty strings only; `null`/absent to `[]`.
    CompactStrings,
    /// Drop falsy entries; `null`/absent to `[]`.
    CompactEnsure,
    /// Parse a form date-time and render it as an ISO timestamp, else `null`.
    IsoDateTime,
    /// Reformat a strict calendar date as `YYYY-MM-DD`, else `null`.
    CalendarDate,
}

impl Transform {
    /// Apply the transform. `None` is an absent value, distinct from an
    /// explicit `null`.
    pub fn apply(&self, raw: Option<&Value>) -> Value {
        match self {
            Self::Identity => raw.cloned().unwrap_or(Value::Null),
            Self::TrimToNull => match raw {
                Some(Value::String(s)) => trimmed_or_null(s),
                _ => Value::Null,
            },
            Self::CastTrimToNull => match raw.map(cast_scalar_to_string) {
                Some(Value::String(s)) => trimmed_or_null(&s),
                Some(other) => other,
                None => Value::Null,
            },
            Self::CastEmptyToNull => match raw.map(cast_scalar_to_string) {
                Some(Value::String(s)) if s.is_empty() => Value::Null,
                Some(other) => other,
                None => Value::Null,
            },
            Self::BoolFromText => match raw {
                None => Value::Bool(false),
                Some(Value::String(s)) => match s.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => Value::Null,
                },
                Some(other) => other.clone(),
            },
            Self::EmptyToNull => match raw {
                None => Value::Null,
                Some(Value::String(s)) if s.is_empty() => Value::Null,
                Some(other) => other.clone(),
            },
            Self::RelationId => match raw {
                Some(v) if !is_falsy(v) => RelationRef::from_value(v)
                    .map(|r| Value::String(r.id))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
            Self::RelationIds => match raw {
                Some(Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .filter_map(RelationRef::from_value)
                        .map(|r| Value::String(r.id))
                        .collect(),
                ),
                Some(v) if !is_falsy(v) => v.clone(),
                _ => Value::Array(Vec::new()),
            },
            Self::CompactStrings => match raw {
                Some(Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Value::String(s) if !s.trim().is_empty() => {
                                Some(Value::String(s.trim().to_string()))
                            }
                            _ => None,
                        })
                        .collect(),
                ),
                None | Some(Value::Null) => Value::Array(Vec::new()),
                Some(other) => other.clone(),
            },
            Self::CompactEnsure => match raw {
                Some(Value::Array(items)) => {
                    Value::Array(items.iter().filter(|v| !is_falsy(v)).cloned().collect())
                }
                None | Some(Value::Null) => Value::Array(Vec::new()),
                Some(other) => other.clone(),
            },
            Self::IsoDateTime => match raw {
                Some(Value::String(s)) if !s.is_empty() => parse_form_datetime(s)
                    .map(|dt| Value::String(to_iso_millis(&dt)))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
            Self::CalendarDate => match raw {
                Some(Value::String(s)) if !s.is_empty() => parse_strict_date(s)
                    .map(|d| Value::String(format_date(d)))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            },
        }
    }
}

fn trimmed_or_null(s: &str) -> Value {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

/// Numbers and booleans become their string rendering; everything else
/// is returned as-is.
fn cast_scalar_to_string(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => other.clone(),
    }
}
