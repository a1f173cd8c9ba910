//! # Error Types: Violation Taxonomy
//!
//! Defines the structured results of a failed validation and the errors
//! raised while building a validator from its configuration. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A rejected value yields every violation found, each tagged with its
//!   [`ErrorKind`] and the label of the field it belongs to.
//! - Configuration errors are raised once, at construction, and name the
//!   offending option.
//! - Nothing here is fatal: callers decide whether a rejected field blocks
//!   submission.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Category of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input cannot be coerced to the expected primitive shape.
    Type,
    /// A null, empty, or under-length value where one is required.
    Required,
    /// A min/max violation on a length, item count, or numeric value.
    Range,
    /// A pattern, email, numeric-shape, or date-format mismatch.
    Format,
    /// A value outside the enumerated option set.
    Membership,
}

impl ErrorKind {
    /// Stable lowercase name, used in CLI and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Required => "required",
            Self::Range => "range",
            Self::Format => "format",
            Self::Membership => "membership",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed check with its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Which category of check failed.
    pub kind: ErrorKind,
    /// Label of the field the check belongs to.
    pub label: String,
    /// Human-readable message, already interpolated with the label.
    pub message: String,
}

impl Violation {
    /// Create a violation for the field labelled `label`.
    pub fn new(kind: ErrorKind, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  [{}] {}", self.kind, self.message)
    }
}

/// Ordered collection of violations, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over the messages only.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.message.as_str())
    }

    /// True if any violation has the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A field value was rejected by its validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    /// One or more checks failed.
    #[error("field '{label}' rejected:\n{violations}")]
    Rejected {
        /// Label of the rejected field.
        label: String,
        /// Every failed check, in evaluation order.
        violations: Violations,
    },
}

impl FieldValidationError {
    /// The violations carried by this error.
    pub fn violations(&self) -> &Violations {
        match self {
            Self::Rejected { violations, .. } => violations,
        }
    }

    /// Consumes self and returns the violations.
    pub fn into_violations(self) -> Violations {
        match self {
            Self::Rejected { violations, .. } => violations,
        }
    }
}

/// A field configuration cannot produce a validator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `matches` is not a valid regular expression.
    #[error("field '{label}': invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// Field label.
        label: String,
        /// The pattern as configured.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// `min` or `max` has a value the field type cannot use.
    #[error("field '{label}': invalid {bound} {value}: {reason}")]
    InvalidBound {
        /// Field label.
        label: String,
        /// Which bound, `"min"` or `"max"`.
        bound: &'static str,
        /// The configured value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// `min` is greater than `max`, so no value could ever pass.
    #[error("field '{label}': min {min} is greater than max {max}")]
    InvertedBounds {
        /// Field label.
        label: String,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
}
