//! # Validator: The Staged Pipeline
//!
//! A [`Validator`] runs its stages strictly in order:
//!
//! 0. **Raw check** (date fields only): a format check on the untouched
//!    input, before anything is normalized.
//! 1. **Transform**: normalize the raw input ([`Transform`]).
//! 2. **Shape check**: convert to a typed [`FieldValue`] or report a type
//!    error ([`Shape`]).
//! 3. **Constraint check**: run every configured [`Constraint`] and
//!    collect all violations.
//!
//! A failure in stage 0 or 2 ends the run with that single violation.
//! Validators are immutable once built and hold no state between calls.

use formval_core::temporal::parse_strict_date;
use formval_core::{
    is_falsy, ErrorKind, FieldValidationError, FieldValue, Violation, Violations,
};
use serde_json::Value;

use crate::catalog::FieldKind;
use crate::constraint::Constraint;
use crate::shape::Shape;
use crate::transform::Transform;

/// A check applied to the raw input before the transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCheck {
    /// Truthy input must be a strict `YYYY-MM-DD` calendar date.
    StrictDate,
}

impl RawCheck {
    fn check(&self, raw: Option<&Value>, label: &str) -> Option<Violation> {
        match self {
            Self::StrictDate => match raw {
                None => None,
                Some(v) if is_falsy(v) => None,
                Some(Value::String(s)) if parse_strict_date(s).is_some() => None,
                Some(_) => Some(Violation::new(
                    ErrorKind::Format,
                    label,
                    "Invalid date format",
                )),
            },
        }
    }
}

/// A composed transform-and-check rule for one field.
#[derive(Debug, Clone)]
pub struct Validator {
    label: String,
    kind: FieldKind,
    raw_check: Option<RawCheck>,
    transform: Transform,
    shape: Shape,
    constraints: Vec<Constraint>,
}

impl Validator {
    pub(crate) fn new(
        label: impl Into<String>,
        kind: FieldKind,
        transform: Transform,
        shape: Shape,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            raw_check: None,
            transform,
            shape,
            constraints: Vec::new(),
        }
    }

    pub(crate) fn with_raw_check(mut self, check: RawCheck) -> Self {
        self.raw_check = Some(check);
        self
    }

    pub(crate) fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Label interpolated into every message.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The catalog entry this validator was built from.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Configured constraints, in evaluation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Run only the transform stage.
    pub fn transform(&self, raw: Option<&Value>) -> Value {
        self.transform.apply(raw)
    }

    /// Run the transform and shape stages without checking constraints.
    pub fn cast(&self, raw: Option<&Value>) -> Result<FieldValue, FieldValidationError> {
        self.shape
            .check(self.transform.apply(raw), &self.label)
            .map_err(|v| self.rejected(v.into()))
    }

    /// Run every stage. `None` is an absent value; `Some(&Value::Null)` is
    /// an explicit null.
    ///
    /// # Errors
    ///
    /// Returns `FieldValidationError::Rejected` with every violation found.
    pub fn validate(&self, raw: Option<&Value>) -> Result<FieldValue, FieldValidationError> {
        if let Some(violation) = self
            .raw_check
            .and_then(|check| check.check(raw, &self.label))
        {
            return Err(self.rejected(violation.into()));
        }

        let value = self.cast(raw)?;

        let violations: Violations = self
            .constraints
            .iter()
            .filter_map(|c| c.check(&value, &self.label))
            .collect();

        if violations.is_empty() {
            Ok(value)
        } else {
            Err(self.rejected(violations))
        }
    }

    /// Validate a present value.
    pub fn validate_value(&self, raw: &Value) -> Result<FieldValue, FieldValidationError> {
        self.validate(Some(raw))
    }

    /// True if `raw` passes every stage.
    pub fn is_valid(&self, raw: Option<&Value>) -> bool {
        self.validate(raw).is_ok()
    }

    fn rejected(&self, violations: Violations) -> FieldValidationError {
        tracing::trace!(
            label = %self.label,
            kind = %self.kind,
            violations = violations.len(),
            "field rejected"
        );
        FieldValidationError::Rejected {
            label: self.label.clone(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date_like(label: &str) -> Validator {
        Validator::new(label, FieldKind::Date, Transform::CalendarDate, Shape::Text)
            .with_raw_check(RawCheck::StrictDate)
            .with_constraint(Constraint::Required)
    }

    #[test]
    fn raw_check_runs_before_transform() {
        let err = date_like("Due").validate_value(&json!("2024-02-30")).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.violations()[0].message, "Invalid date format");
    }

    #[test]
    fn raw_check_skips_falsy_input() {
        let err = date_like("Due").validate_value(&json!("")).unwrap_err();
        assert!(err.violations().has_kind(ErrorKind::Required));
    }

    #[test]
    fn shape_failure_stops_constraints() {
        let v = Validator::new("Age", FieldKind::Integer, Transform::EmptyToNull, Shape::Number)
            .with_constraint(Constraint::Required)
            .with_constraint(Constraint::Integer);
        let err = v.validate_value(&json!("abc")).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.violations().has_kind(ErrorKind::Type));
    }

    #[test]
    fn all_constraint_violations_are_collected() {
        let v = Validator::new("Qty", FieldKind::Integer, Transform::EmptyToNull, Shape::Number)
            .with_constraint(Constraint::MaxValue(1.0))
            .with_constraint(Constraint::Integer);
        let err = v.validate_value(&json!(2.5)).unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn cast_skips_constraints() {
        let v = Validator::new("Qty", FieldKind::Integer, Transform::EmptyToNull, Shape::Number)
            .with_constraint(Constraint::Required);
        assert_eq!(v.cast(Some(&json!(""))).unwrap(), FieldValue::Null);
        assert!(!v.is_valid(Some(&json!(""))));
    }

    #[test]
    fn accessors() {
        let v = date_like("Due");
        assert_eq!(v.label(), "Due");
        assert_eq!(v.kind(), FieldKind::Date);
        assert_eq!(v.constraints().len(), 1);
        assert_eq!(v.transform(Some(&json!("2024-01-02"))), json!("2024-01-02"));
    }
}
