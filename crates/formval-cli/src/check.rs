//! # Check Subcommand
//!
//! Validates a values document against a form declaration. Both files may
//! be YAML (`.yaml`/`.yml`) or JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use formval_schema::{load_document, FieldFailures, FormSchema, FormValidationError, FormValues};
use serde::Serialize;

use crate::{EXIT_ACCEPTED, EXIT_REJECTED};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the form declaration.
    pub declaration: PathBuf,

    /// Path to the values document.
    pub values: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Report format for `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Machine-readable JSON object.
    Json,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let form = FormSchema::load(&args.declaration).with_context(|| {
        format!("failed to load declaration {}", args.declaration.display())
    })?;
    let document = load_document(&args.values)
        .with_context(|| format!("failed to load values {}", args.values.display()))?;

    let outcome = form.validate(&document);
    let code = if outcome.is_ok() {
        EXIT_ACCEPTED
    } else {
        EXIT_REJECTED
    };
    print!("{}", render_report(&form, &outcome, args.format)?);
    Ok(code)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    form: Option<&'a str>,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<&'a FormValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failures: Option<&'a FieldFailures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Render the outcome of a form check.
pub fn render_report(
    form: &FormSchema,
    outcome: &Result<FormValues, FormValidationError>,
    format: OutputFormat,
) -> Result<String> {
    let name = form.name();
    match format {
        OutputFormat::Json => {
            let mut report = JsonReport {
                form: name,
                valid: outcome.is_ok(),
                values: None,
                failures: None,
                error: None,
            };
            match outcome {
                Ok(values) => report.values = Some(values),
                Err(FormValidationError::Rejected { failures }) => report.failures = Some(failures),
                Err(e) => report.error = Some(e.to_string()),
            }
            Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
        }
        OutputFormat::Text => {
            let title = name.unwrap_or("form");
            Ok(match outcome {
                Ok(values) => format!(
                    "{title}: OK ({} fields)\n{}\n",
                    values.len(),
                    serde_json::to_string_pretty(values)?
                ),
                Err(FormValidationError::Rejected { failures }) => {
                    format!("{title}: FAILED ({} fields rejected)\n{failures}\n", failures.len())
                }
                Err(e) => format!("{title}: FAILED\n  {e}\n"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const DECLARATION: &str = r#"
name: contact
fields:
  - name: email
    type: email
    label: Email
    config: { required: true }
  - name: topics
    type: stringArray
    config: { max: 2 }
"#;

    fn form() -> FormSchema {
        FormSchema::from_yaml_str(DECLARATION).unwrap()
    }

    #[test]
    fn text_report_for_accepted_form() {
        let form = form();
        let outcome = form.validate(&json!({"email": "a@b.co"}));
        let out = render_report(&form, &outcome, OutputFormat::Text).unwrap();
        assert!(out.starts_with("contact: OK (2 fields)"));
        assert!(out.contains("\"topics\": []"));
    }

    #[test]
    fn text_report_lists_failures() {
        let form = form();
        let outcome = form.validate(&json!({"topics": ["a", "b", "c"]}));
        let out = render_report(&form, &outcome, OutputFormat::Text).unwrap();
        assert!(out.starts_with("contact: FAILED (2 fields rejected)"));
        assert!(out.contains("email:"));
        assert!(out.contains("Email is required"));
        assert!(out.contains("topics field must have less than or equal to 2 items"));
    }

    #[test]
    fn json_report_for_rejected_form() {
        let form = form();
        let outcome = form.validate(&json!({"email": "nope"}));
        let out = render_report(&form, &outcome, OutputFormat::Json).unwrap();
        let report: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["form"], "contact");
        assert_eq!(report["valid"], false);
        assert_eq!(report["failures"][0]["name"], "email");
        assert_eq!(report["failures"][0]["violations"][0]["kind"], "format");
        assert!(report.get("values").is_none());
    }

    #[test]
    fn json_report_for_non_object_document() {
        let form = form();
        let outcome = form.validate(&json!("text"));
        let out = render_report(&form, &outcome, OutputFormat::Json).unwrap();
        let report: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["valid"], false);
        assert_eq!(report["error"], "form values must be an object, got string");
    }

    #[test]
    fn run_check_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let declaration = dir.path().join("contact.yaml");
        std::fs::write(&declaration, DECLARATION).unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"email": "a@b.co"}"#).unwrap();
        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "email: ''\n").unwrap();

        let args = |values: &std::path::Path| CheckArgs {
            declaration: declaration.clone(),
            values: values.to_path_buf(),
            format: OutputFormat::Json,
        };
        assert_eq!(run_check(&args(&good)).unwrap(), EXIT_ACCEPTED);
        assert_eq!(run_check(&args(&bad)).unwrap(), EXIT_REJECTED);
        assert!(run_check(&args(&dir.path().join("missing.json"))).is_err());
    }
}
