//! # Constraint Check Stage
//!
//! Named rules applied to a shape-checked [`FieldValue`]. Each constraint
//! inspects only the variant it applies to and passes everything else;
//! in particular every constraint except [`Constraint::Required`] passes
//! `null`.

use formval_core::value::format_number;
use formval_core::{ErrorKind, FieldValue, Violation};
use regex::Regex;

/// Email shape, following the HTML living standard's valid-email rule.
pub(crate) const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// A configured rule.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// The value must not be null.
    Required,
    /// Minimum string length in characters.
    MinLength(usize),
    /// Maximum string length in characters.
    MaxLength(usize),
    /// The string must contain a match for `regex`.
    Pattern {
        /// Compiled pattern.
        regex: Regex,
        /// Custom failure message; a default one is derived when absent.
        message: Option<String>,
    },
    /// The string must be an email address.
    Email(Regex),
    /// Minimum array length. `kind` is [`ErrorKind::Required`] when the
    /// bound was implied by `required` rather than configured.
    MinItems {
        /// Minimum item count.
        min: usize,
        /// Category reported on failure.
        kind: ErrorKind,
    },
    /// Maximum array length.
    MaxItems(usize),
    /// Minimum numeric value, inclusive.
    MinValue(f64),
    /// Maximum numeric value, inclusive.
    MaxValue(f64),
    /// The number's textual form must contain a decimal point.
    Decimal,
    /// The number must have no fractional part.
    Integer,
    /// The rendered number must be exactly this many characters long.
    ExactLength(usize),
    /// The string must be one of the listed options.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Short rule name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Pattern { .. } => "matches",
            Self::Email(_) => "email",
            Self::MinItems { .. } => "min_items",
            Self::MaxItems(_) => "max_items",
            Self::MinValue(_) => "min",
            Self::MaxValue(_) => "max",
            Self::Decimal => "is_decimal",
            Self::Integer => "is_integer",
            Self::ExactLength(_) => "is_exact_value",
            Self::OneOf(_) => "one_of",
        }
    }

    /// Check `value`, returning the violation if the rule fails.
    pub fn check(&self, value: &FieldValue, label: &str) -> Option<Violation> {
        let fail = |kind: ErrorKind, message: String| Some(Violation::new(kind, label, message));

        match (self, value) {
            (Self::Required, v) if v.is_null() => {
                fail(ErrorKind::Required, format!("{label} is required"))
            }
            (Self::MinLength(min), FieldValue::Text(s)) if s.chars().count() < *min => fail(
                ErrorKind::Range,
                format!("{label} must be at least {min} characters"),
            ),
            (Self::MaxLength(max), FieldValue::Text(s)) if s.chars().count() > *max => fail(
                ErrorKind::Range,
                format!("{label} must be at most {max} characters"),
            ),
            (Self::Pattern { regex, message }, FieldValue::Text(s)) if !regex.is_match(s) => {
                let message = message.clone().unwrap_or_else(|| {
                    format!("{label} must match the following: \"{}\"", regex.as_str())
                });
                fail(ErrorKind::Format, message)
            }
            (Self::Email(regex), FieldValue::Text(s)) if !regex.is_match(s) => {
                fail(ErrorKind::Format, format!("{label} must be a valid email"))
            }
            (Self::MinItems { min, kind }, FieldValue::List(items)) if items.len() < *min => fail(
                *kind,
                format!("{label} field must have at least {min} items"),
            ),
            (Self::MaxItems(max), FieldValue::List(items)) if items.len() > *max => fail(
                ErrorKind::Range,
                format!("{label} field must have less than or equal to {max} items"),
            ),
            (Self::MinValue(min), FieldValue::Number(n)) if n.value() < *min => fail(
                ErrorKind::Range,
                format!(
                    "{label} must be greater than or equal to {}",
                    format_number(*min)
                ),
            ),
            (Self::MaxValue(max), FieldValue::Number(n)) if n.value() > *max => fail(
                ErrorKind::Range,
                format!("{label} must be less than or equal to {}", format_number(*max)),
            ),
            (Self::Decimal, FieldValue::Number(n)) if !n.has_decimal_point() => fail(
                ErrorKind::Format,
                format!("{label} must be a valid decimal number"),
            ),
            (Self::Integer, FieldValue::Number(n)) if !n.is_integer() => {
                fail(ErrorKind::Format, format!("{label} must be a valid integer"))
            }
            (Self::ExactLength(len), FieldValue::Number(n)) if n.rendered_len() != *len => {
                fail(ErrorKind::Range, format!("{label} must be equal to {len}"))
            }
            (Self::OneOf(options), FieldValue::Text(s)) if !options.iter().any(|o| o == s) => {
                fail(
                    ErrorKind::Membership,
                    format!(
                        "{label} must be one of the following values: {}",
                        options.join(", ")
                    ),
                )
            }
            _ => None,
        }
    }
}
