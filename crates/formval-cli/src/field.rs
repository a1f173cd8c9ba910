//! # Field Subcommand
//!
//! Evaluates one value against a single catalog validator and prints the
//! normalized value, or the violations when it is rejected.

use anyhow::{Context, Result};
use clap::Args;
use formval_core::{FieldConfig, FieldValidationError, FieldValue};
use formval_schema::{build, FieldKind};
use serde_json::Value;

use crate::{EXIT_ACCEPTED, EXIT_REJECTED};

/// Arguments for the field subcommand.
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Catalog field type (see `formval kinds`).
    pub kind: FieldKind,

    /// Label used in messages. Defaults to the type name.
    #[arg(long)]
    pub label: Option<String>,

    /// Field configuration as a JSON object or YAML flow mapping,
    /// e.g. `{required: true, max: 3}`.
    #[arg(long)]
    pub config: Option<String>,

    /// The value as JSON. Omit both `--json` and `--text` to evaluate an
    /// absent value.
    #[arg(long, conflicts_with = "text")]
    pub json: Option<String>,

    /// The value as a literal string.
    #[arg(long)]
    pub text: Option<String>,
}

/// Execute the field subcommand.
pub fn run_field(args: &FieldArgs) -> Result<u8> {
    match evaluate(args)? {
        Ok(value) => {
            println!("{}", serde_json::to_string(&value)?);
            Ok(EXIT_ACCEPTED)
        }
        Err(e) => {
            println!("{e}");
            Ok(EXIT_REJECTED)
        }
    }
}

/// Build the validator described by `args` and run it.
///
/// The outer `Result` carries usage errors (bad configuration or input
/// syntax); the inner one is the validation outcome.
pub fn evaluate(args: &FieldArgs) -> Result<Result<FieldValue, FieldValidationError>> {
    let config = parse_config(args.config.as_deref())?;
    let label = args.label.as_deref().unwrap_or(args.kind.as_str());
    let validator = build(args.kind, label, &config)
        .with_context(|| format!("invalid configuration for {} field", args.kind))?;

    let raw = raw_input(args)?;
    tracing::debug!(kind = %args.kind, label, absent = raw.is_none(), "evaluating field");
    Ok(validator.validate(raw.as_ref()))
}

/// Parse a `--config` argument. YAML is a superset of JSON, so both
/// syntaxes are accepted.
pub fn parse_config(text: Option<&str>) -> Result<FieldConfig> {
    match text {
        None => Ok(FieldConfig::default()),
        Some(text) => serde_yaml::from_str(text)
            .with_context(|| format!("invalid field configuration: {text}")),
    }
}

fn raw_input(args: &FieldArgs) -> Result<Option<Value>> {
    if let Some(json) = &args.json {
        let value =
            serde_json::from_str(json).with_context(|| format!("--json is not valid JSON: {json}"))?;
        return Ok(Some(value));
    }
    Ok(args.text.clone().map(Value::String))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formval_core::ErrorKind;

    fn args(kind: FieldKind) -> FieldArgs {
        FieldArgs {
            kind,
            label: None,
            config: None,
            json: None,
            text: None,
        }
    }

    #[test]
    fn accepted_value_is_normalized() {
        let a = FieldArgs {
            text: Some("  Ada  ".to_string()),
            label: Some("Name".to_string()),
            ..args(FieldKind::String)
        };
        assert_eq!(
            evaluate(&a).unwrap().unwrap(),
            FieldValue::Text("Ada".to_string())
        );
    }

    #[test]
    fn absent_value_uses_type_default() {
        let value = evaluate(&args(FieldKind::Boolean)).unwrap().unwrap();
        assert_eq!(value, FieldValue::Bool(false));
    }

    #[test]
    fn rejection_uses_type_name_as_default_label() {
        let a = FieldArgs {
            config: Some("{required: true}".to_string()),
            ..args(FieldKind::Email)
        };
        let err = evaluate(&a).unwrap().unwrap_err();
        assert!(err.violations().has_kind(ErrorKind::Required));
        assert_eq!(err.violations().violations()[0].message, "email is required");
    }

    #[test]
    fn json_config_and_value() {
        let a = FieldArgs {
            config: Some(r#"{"min": 1, "max": 10}"#.to_string()),
            json: Some("11".to_string()),
            label: Some("Qty".to_string()),
            ..args(FieldKind::Integer)
        };
        let err = evaluate(&a).unwrap().unwrap_err();
        assert_eq!(
            err.violations().violations()[0].message,
            "Qty must be less than or equal to 10"
        );
    }

    #[test]
    fn invalid_config_is_a_usage_error() {
        let a = FieldArgs {
            config: Some("{matches: '(['}".to_string()),
            ..args(FieldKind::String)
        };
        assert!(evaluate(&a).is_err());

        let a = FieldArgs {
            config: Some("{minimum: 1}".to_string()),
            ..args(FieldKind::String)
        };
        assert!(evaluate(&a).is_err());
    }

    #[test]
    fn invalid_json_value_is_a_usage_error() {
        let a = FieldArgs {
            json: Some("{not json".to_string()),
            ..args(FieldKind::Generic)
        };
        assert!(evaluate(&a).is_err());
    }

    #[test]
    fn parse_config_defaults_when_absent() {
        assert_eq!(parse_config(None).unwrap(), FieldConfig::default());
        let config = parse_config(Some("{required: true, options: [a, b]}")).unwrap();
        assert!(config.required);
        assert_eq!(config.options, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
