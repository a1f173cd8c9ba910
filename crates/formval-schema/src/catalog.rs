//! # Validator Catalog
//!
//! One factory per supported field type. Each factory takes a label and a
//! [`FieldConfig`] and returns a fresh, immutable [`Validator`]; factories
//! are pure and perform no I/O.
//!
//! ## Configuration checks
//!
//! Configuration is validated once, at construction:
//!
//! - `matches` must compile as a regular expression.
//! - `min`/`max` must be finite; for length and item-count bounds they
//!   must also be non-negative integers.
//! - `min` greater than `max` is rejected.
//!
//! Options a field type does not use are ignored.
//!
//! ## Array-like fields
//!
//! For `relationToMany`, `stringArray`, `images` and `files` an explicit
//! `min` (including `0`) always wins; otherwise `required` implies a
//! minimum of one item. A positive `min` also implies `required`.

use std::fmt;
use std::str::FromStr;

use formval_core::{ConfigError, ErrorKind, FieldConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constraint::{Constraint, EMAIL_PATTERN};
use crate::shape::Shape;
use crate::transform::Transform;
use crate::validator::{RawCheck, Validator};

/// The supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Untyped passthrough.
    Generic,
    /// Trimmed text.
    String,
    /// Trimmed text in email shape.
    Email,
    /// Boolean, with `"true"`/`"false"` text accepted.
    Boolean,
    /// A single related entity, stored by identifier.
    RelationToOne,
    /// Several related entities, stored as identifiers.
    RelationToMany,
    /// A list of trimmed, non-empty strings.
    StringArray,
    /// A list of image descriptors.
    Images,
    /// A list of file descriptors.
    Files,
    /// One value from a fixed option set.
    Enumerator,
    /// A number written with a fractional part.
    Decimal,
    /// A whole number.
    Integer,
    /// A date and time, normalized to an ISO timestamp.
    Datetime,
    /// A calendar date, normalized to `YYYY-MM-DD`.
    Date,
}

impl FieldKind {
    /// Every catalog entry, in catalog order.
    pub const ALL: [FieldKind; 14] = [
        Self::Generic,
        Self::String,
        Self::Email,
        Self::Boolean,
        Self::RelationToOne,
        Self::RelationToMany,
        Self::StringArray,
        Self::Images,
        Self::Files,
        Self::Enumerator,
        Self::Decimal,
        Self::Integer,
        Self::Datetime,
        Self::Date,
    ];

    /// The type name used in declarations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::String => "string",
            Self::Email => "email",
            Self::Boolean => "boolean",
            Self::RelationToOne => "relationToOne",
            Self::RelationToMany => "relationToMany",
            Self::StringArray => "stringArray",
            Self::Images => "images",
            Self::Files => "files",
            Self::Enumerator => "enumerator",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::Datetime => "datetime",
            Self::Date => "date",
        }
    }

    /// True for the array-valued types.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::RelationToMany | Self::StringArray | Self::Images | Self::Files
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type name that is not in the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown field type '{0}'")]
pub struct UnknownFieldKind(pub String);

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownFieldKind(s.to_string()))
    }
}

/// Build the validator for `kind`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` is unusable for this type.
pub fn build(kind: FieldKind, label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let validator = match kind {
        FieldKind::Generic => Ok(generic(label)),
        FieldKind::String => string(label, config),
        FieldKind::Email => email(label, config),
        FieldKind::Boolean => Ok(boolean(label, config)),
        FieldKind::RelationToOne => Ok(relation_to_one(label, config)),
        FieldKind::RelationToMany => relation_to_many(label, config),
        FieldKind::StringArray => string_array(label, config),
        FieldKind::Images => images(label, config),
        FieldKind::Files => files(label, config),
        FieldKind::Enumerator => Ok(enumerator(label, config)),
        FieldKind::Decimal => decimal(label, config),
        FieldKind::Integer => integer(label, config),
        FieldKind::Datetime => Ok(datetime(label, config)),
        FieldKind::Date => Ok(date(label, config)),
    }?;
    tracing::trace!(
        %kind,
        label,
        constraints = validator.constraints().len(),
        "built validator"
    );
    Ok(validator)
}

/// Untyped passthrough with no checks.
pub fn generic(label: &str) -> Validator {
    Validator::new(label, FieldKind::Generic, Transform::Identity, Shape::Any)
}

/// Trimmed text; whitespace-only and non-string input become null.
pub fn string(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = Validator::new(label, FieldKind::String, Transform::TrimToNull, Shape::Text);
    text_constraints(base, label, config)
}

/// Trimmed text that must look like an email address.
pub fn email(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let regex = compile(label, EMAIL_PATTERN)?;
    let base = Validator::new(label, FieldKind::Email, Transform::CastTrimToNull, Shape::Text)
        .with_constraint(Constraint::Email(regex));
    text_constraints(base, label, config)
}

/// Boolean defaulting to `false` when absent.
pub fn boolean(label: &str, config: &FieldConfig) -> Validator {
    let base = Validator::new(label, FieldKind::Boolean, Transform::BoolFromText, Shape::Bool);
    with_required(base, config)
}

/// Identifier of a single related entity.
pub fn relation_to_one(label: &str, config: &FieldConfig) -> Validator {
    let base = Validator::new(label, FieldKind::RelationToOne, Transform::RelationId, Shape::Text);
    with_required(base, config)
}

/// Identifiers of several related entities; never null.
pub fn relation_to_many(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = Validator::new(
        label,
        FieldKind::RelationToMany,
        Transform::RelationIds,
        Shape::TextList,
    );
    item_constraints(base, label, config)
}

/// Trimmed, non-empty strings; never null.
pub fn string_array(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = Validator::new(
        label,
        FieldKind::StringArray,
        Transform::CompactStrings,
        Shape::TextList,
    );
    item_constraints(base, label, config)
}

/// Image descriptors, passed through untouched.
pub fn images(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = Validator::new(label, FieldKind::Images, Transform::Identity, Shape::List);
    item_constraints(base, label, config)
}

/// File descriptors with falsy entries dropped; never null.
pub fn files(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = Validator::new(label, FieldKind::Files, Transform::CompactEnsure, Shape::List);
    item_constraints(base, label, config)
}

/// One of `config.options`, or null. `required` is not enforced.
pub fn enumerator(label: &str, config: &FieldConfig) -> Validator {
    let options = config.options.clone().unwrap_or_default();
    Validator::new(label, FieldKind::Enumerator, Transform::CastEmptyToNull, Shape::Text)
        .with_constraint(Constraint::OneOf(options))
}

/// A number whose textual form has a decimal point.
pub fn decimal(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = Validator::new(label, FieldKind::Decimal, Transform::EmptyToNull, Shape::Number);
    let mut v = value_bounds(with_required(base, config), label, config)?;
    v = v.with_constraint(Constraint::Decimal);
    Ok(v)
}

/// A whole number.
///
/// When `min` equals `max` the bound is checked against the number of
/// characters in the rendered value, not the value itself: `min = max = 3`
/// accepts any three-digit integer.
pub fn integer(label: &str, config: &FieldConfig) -> Result<Validator, ConfigError> {
    let base = with_required(
        Validator::new(label, FieldKind::Integer, Transform::EmptyToNull, Shape::Number),
        config,
    );
    let v = match (config.min, config.max) {
        (Some(min), Some(max)) if min == max => {
            let len = count_bound(label, "min", min)?;
            base.with_constraint(Constraint::ExactLength(len))
        }
        _ => value_bounds(base, label, config)?,
    };
    Ok(v.with_constraint(Constraint::Integer))
}

/// A form date-time, normalized to an ISO timestamp; unparseable input
/// becomes null.
pub fn datetime(label: &str, config: &FieldConfig) -> Validator {
    let base = Validator::new(label, FieldKind::Datetime, Transform::IsoDateTime, Shape::Text);
    with_required(base, config)
}

/// A strict `YYYY-MM-DD` calendar date. The format check runs on the raw
/// input whether or not the field is required.
pub fn date(label: &str, config: &FieldConfig) -> Validator {
    let base = Validator::new(label, FieldKind::Date, Transform::CalendarDate, Shape::Text)
        .with_raw_check(RawCheck::StrictDate);
    with_required(base, config)
}

fn with_required(v: Validator, config: &FieldConfig) -> Validator {
    if config.required {
        v.with_constraint(Constraint::Required)
    } else {
        v
    }
}

/// Required, length bounds, and pattern for text fields.
fn text_constraints(
    base: Validator,
    label: &str,
    config: &FieldConfig,
) -> Result<Validator, ConfigError> {
    check_order(label, config)?;
    let mut v = with_required(base, config);
    if let Some(min) = config.min {
        v = v.with_constraint(Constraint::MinLength(count_bound(label, "min", min)?));
    }
    if let Some(max) = config.max {
        v = v.with_constraint(Constraint::MaxLength(count_bound(label, "max", max)?));
    }
    if let Some(pattern) = &config.matches {
        v = v.with_constraint(Constraint::Pattern {
            regex: compile(label, pattern)?,
            message: config.matches_message.clone(),
        });
    }
    Ok(v)
}

/// Required and item-count bounds for array-like fields.
fn item_constraints(
    base: Validator,
    label: &str,
    config: &FieldConfig,
) -> Result<Validator, ConfigError> {
    check_order(label, config)?;
    let mut v = base;
    if config.requires_items() {
        v = v.with_constraint(Constraint::Required);
    }
    if let Some(min) = config.min_items() {
        let kind = if config.min.is_some() {
            ErrorKind::Range
        } else {
            ErrorKind::Required
        };
        v = v.with_constraint(Constraint::MinItems {
            min: count_bound(label, "min", min)?,
            kind,
        });
    }
    if let Some(max) = config.max {
        v = v.with_constraint(Constraint::MaxItems(count_bound(label, "max", max)?));
    }
    Ok(v)
}

/// Numeric value bounds.
fn value_bounds(
    base: Validator,
    label: &str,
    config: &FieldConfig,
) -> Result<Validator, ConfigError> {
    check_order(label, config)?;
    let mut v = base;
    if let Some(min) = config.min {
        v = v.with_constraint(Constraint::MinValue(finite_bound(label, "min", min)?));
    }
    if let Some(max) = config.max {
        v = v.with_constraint(Constraint::MaxValue(finite_bound(label, "max", max)?));
    }
    Ok(v)
}

fn check_order(label: &str, config: &FieldConfig) -> Result<(), ConfigError> {
    match (config.min, config.max) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::InvertedBounds {
            label: label.to_string(),
            min,
            max,
        }),
        _ => Ok(()),
    }
}

fn finite_bound(label: &str, bound: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidBound {
            label: label.to_string(),
            bound,
            value,
            reason: "must be a finite number",
        })
    }
}

fn count_bound(label: &str, bound: &'static str, value: f64) -> Result<usize, ConfigError> {
    let value = finite_bound(label, bound, value)?;
    if value < 0.0 || value.fract() != 0.0 {
        return Err(ConfigError::InvalidBound {
            label: label.to_string(),
            bound,
            value,
            reason: "must be a non-negative integer",
        });
    }
    Ok(value as usize)
}

fn compile(label: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        label: label.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
