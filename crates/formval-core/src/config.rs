//! # Field Configuration
//!
//! The options a form-schema author may set on a field. Every member is
//! optional; an absent member means "no constraint". `min: Some(0.0)` is
//! an explicit bound and is never conflated with an unset `min`.
//!
//! Configurations deserialize from JSON or YAML (`matchesMessage` is
//! accepted in camelCase) and can be assembled with the builder methods.

use serde::{Deserialize, Serialize};

/// Options recognized by the validator catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldConfig {
    /// The field must carry a value.
    #[serde(default)]
    pub required: bool,

    /// Lower bound: a length, an item count, or a numeric value
    /// depending on the field type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Upper bound, same interpretation as `min`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Regular expression the value must match (unanchored search).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,

    /// Message reported when `matches` fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_message: Option<String>,

    /// Allowed values for enumerated fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldConfig {
    /// An empty configuration: no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Require the value to match `pattern`, reporting `message` on failure.
    pub fn matches(mut self, pattern: impl Into<String>, message: Option<&str>) -> Self {
        self.matches = Some(pattern.into());
        self.matches_message = message.map(str::to_string);
        self
    }

    /// Restrict the value to `options`.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// True if `min` and `max` are both set and equal.
    pub fn is_exact(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min == max)
    }

    /// Array-like fields treat a positive `min` as implying `required`.
    pub fn requires_items(&self) -> bool {
        self.required || self.min.is_some_and(|m| m > 0.0)
    }

    /// Minimum item count for array-like fields: an explicit `min` always
    /// wins; otherwise `required` implies one item.
    pub fn min_items(&self) -> Option<f64> {
        match self.min {
            Some(min) => Some(min),
            None if self.required => Some(1.0),
            None => None,
        }
    }
}
