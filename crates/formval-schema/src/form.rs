//! # Form Declarations
//!
//! Binds named fields to catalog validators. A declaration is an ordered
//! list of fields, each with a `name`, a catalog `type`, an optional
//! `label` (defaulting to the name) and an optional `config`:
//!
//! ```yaml
//! name: signup
//! fields:
//!   - name: email
//!     type: email
//!     label: Email
//!     config: { required: true }
//!   - name: tags
//!     type: stringArray
//!     config: { max: 5 }
//! ```
//!
//! ## Declaration Checking
//!
//! Declaration documents are a trust boundary. Before deserialization
//! each document is checked against the embedded `form.schema.json`
//! (Draft 2020-12); failures carry the instance path, the schema path and
//! a message. Field configurations are then checked by the catalog.
//!
//! ## Evaluation
//!
//! [`FormSchema::validate`] runs each field's validator against the value
//! under its name. Fields are independent; a key missing from the
//! document is an absent value, and keys with no declaration are ignored.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use formval_core::{ConfigError, FieldConfig, FieldValue, Violations};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{self, FieldKind};
use crate::validator::Validator;

/// JSON Schema every declaration document must satisfy.
pub const FORM_DECLARATION_SCHEMA: &str = include_str!("../schemas/form.schema.json");

/// Error loading or building a form declaration.
#[derive(Error, Debug)]
pub enum FormSchemaError {
    /// The declaration did not conform to the declaration schema.
    #[error("declaration '{source_name}' does not conform to the form schema:\n{violations}")]
    DeclarationInvalid {
        /// File path or other name of the declaration.
        source_name: String,
        /// Structured list of individual violations.
        violations: DeclarationViolations,
    },

    /// The document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The embedded declaration schema could not be compiled.
    #[error("declaration schema error: {0}")]
    SchemaBuild(String),

    /// Two fields share a name.
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    /// A field configuration is unusable for its type.
    #[error("field '{name}': {source}")]
    InvalidField {
        /// Name of the field.
        name: String,
        /// What the catalog rejected.
        #[source]
        source: ConfigError,
    },

    /// IO error reading a document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single declaration-schema violation.
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationViolation {
    /// JSON Pointer path to the violating member of the declaration.
    pub instance_path: String,
    /// JSON Pointer path within the declaration schema.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for DeclarationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of declaration-schema violations.
#[derive(Debug, Clone)]
pub struct DeclarationViolations {
    violations: Vec<DeclarationViolation>,
}

impl DeclarationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[DeclarationViolation] {
        &self.violations
    }
}

impl fmt::Display for DeclarationViolations {
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

/// One declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Key of the field in a values document.
    pub name: String,
    /// Catalog type.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Label used in messages; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Field options.
    #[serde(default)]
    pub config: FieldConfig,
}

impl FieldDeclaration {
    /// Declare a field with no label and an empty configuration.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            config: FieldConfig::default(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// The label, falling back to the name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
struct FormDeclaration {
    #[serde(default)]
    name: Option<String>,
    fields: Vec<FieldDeclaration>,
}

/// A declared field with its built validator.
#[derive(Debug, Clone)]
pub struct FormField {
    declaration: FieldDeclaration,
    validator: Validator,
}

impl FormField {
    /// Key of the field in a values document.
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    /// The declaration this field was built from.
    pub fn declaration(&self) -> &FieldDeclaration {
        &self.declaration
    }

    /// The field's validator.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

/// An ordered set of named field validators.
#[derive(Debug, Clone)]
pub struct FormSchema {
    name: Option<String>,
    fields: Vec<FormField>,
}

impl FormSchema {
    /// Build from declarations, rejecting duplicate names and unusable
    /// configurations.
    pub fn from_declarations(
        name: Option<String>,
        declarations: Vec<FieldDeclaration>,
    ) -> Result<Self, FormSchemaError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            if !seen.insert(declaration.name.clone()) {
                return Err(FormSchemaError::DuplicateField(declaration.name));
            }
            let validator =
                catalog::build(declaration.kind, declaration.label(), &declaration.config)
                    .map_err(|source| FormSchemaError::InvalidField {
                        name: declaration.name.clone(),
                        source,
                    })?;
            fields.push(FormField {
                declaration,
                validator,
            });
        }

        Ok(Self { name, fields })
    }

    /// Build from a parsed declaration document. `source_name` names the
    /// document in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `FormSchemaError::DeclarationInvalid` with structured
    /// violation details if the document does not match the declaration
    /// schema, and `InvalidField`/`DuplicateField` for field-level errors.
    pub fn from_json_value(document: &Value, source_name: &str) -> Result<Self, FormSchemaError> {
        check_declaration(document, source_name)?;

        let declaration: FormDeclaration =
            serde_json::from_value(document.clone()).map_err(|e| {
                FormSchemaError::DocumentLoadError {
                    path: source_name.to_string(),
                    reason: format!("invalid declaration: {e}"),
                }
            })?;

        let schema = Self::from_declarations(declaration.name, declaration.fields)?;
        tracing::debug!(
            source = source_name,
            fields = schema.len(),
            "loaded form declaration"
        );
        Ok(schema)
    }

    /// Build from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, FormSchemaError> {
        let document = parse_yaml(text, "<inline>")?;
        Self::from_json_value(&document, "<inline>")
    }

    /// Load a declaration file. The format is chosen by extension:
    /// `.yaml`/`.yml` for YAML, anything else for JSON.
    pub fn load(path: &Path) -> Result<Self, FormSchemaError> {
        let document = load_document(path)?;
        Self::from_json_value(&document, &path.display().to_string())
    }

    /// Name of the form, if declared.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a values document.
    ///
    /// # Errors
    ///
    /// Returns `FormValidationError::NotAnObject` if `document` is not a
    /// JSON object, and `Rejected` listing every failing field otherwise.
    pub fn validate(&self, document: &Value) -> Result<FormValues, FormValidationError> {
        let Value::Object(map) = document else {
            return Err(FormValidationError::NotAnObject(json_type_name(document)));
        };

        let mut values = Vec::with_capacity(self.fields.len());
        let mut failures = Vec::new();

        for field in &self.fields {
            match field.validator.validate(map.get(field.name())) {
                Ok(value) => values.push((field.name().to_string(), value)),
                Err(e) => failures.push(FieldFailure {
                    name: field.name().to_string(),
                    violations: e.into_violations(),
                }),
            }
        }

        tracing::debug!(
            form = self.name.as_deref().unwrap_or("<unnamed>"),
            accepted = values.len(),
            rejected = failures.len(),
            "validated form document"
        );

        if failures.is_empty() {
            Ok(FormValues { values })
        } else {
            Err(FormValidationError::Rejected {
                failures: FieldFailures(failures),
            })
        }
    }
}

/// Normalized values of an accepted form, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    values: Vec<(String, FieldValue)>,
}

impl FormValues {
    /// Value of the named field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the form declares no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert to a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(n, v)| (n.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Violations of one rejected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFailure {
    /// Name of the field.
    pub name: String,
    /// Every failed check.
    pub violations: Violations,
}

/// Every rejected field of a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldFailures(pub Vec<FieldFailure>);

impl FieldFailures {
    /// Look up the failure for a field.
    pub fn get(&self, name: &str) -> Option<&FieldFailure> {
        self.0.iter().find(|f| f.name == name)
    }

    /// Number of rejected fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no field was rejected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", failure.name)?;
            write!(f, "{}", failure.violations)?;
        }
        Ok(())
    }
}

/// A values document was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormValidationError {
    /// The document is not a JSON object.
    #[error("form values must be an object, got {0}")]
    NotAnObject(&'static str),

    /// One or more fields failed.
    #[error("form rejected:\n{failures}")]
    Rejected {
        /// Every failing field, in declaration order.
        failures: FieldFailures,
    },
}

/// Load a JSON or YAML document, choosing the format by extension.
pub fn load_document(path: &Path) -> Result<Value, FormSchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormSchemaError::DocumentLoadError {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => parse_yaml(&content, &path.display().to_string()),
        _ => serde_json::from_str(&content).map_err(|e| FormSchemaError::DocumentLoadError {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

fn parse_yaml(text: &str, source_name: &str) -> Result<Value, FormSchemaError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| FormSchemaError::DocumentLoadError {
            path: source_name.to_string(),
            reason: format!("invalid YAML: {e}"),
        })?;
    yaml_to_json_value(&yaml).map_err(|e| FormSchemaError::DocumentLoadError {
        path: source_name.to_string(),
        reason: format!("YAML-to-JSON conversion failed: {e}"),
    })
}

/// Check a declaration document against [`FORM_DECLARATION_SCHEMA`].
fn check_declaration(document: &Value, source_name: &str) -> Result<(), FormSchemaError> {
    let schema: Value = serde_json::from_str(FORM_DECLARATION_SCHEMA)
        .map_err(|e| FormSchemaError::SchemaBuild(format!("invalid JSON: {e}")))?;

    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    let validator = opts
        .build(&schema)
        .map_err(|e| FormSchemaError::SchemaBuild(e.to_string()))?;

    let violations: Vec<DeclarationViolation> = validator
        .iter_errors(document)
        .map(|e| DeclarationViolation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(FormSchemaError::DeclarationInvalid {
            source_name: source_name.to_string(),
            violations: DeclarationViolations { violations },
        })
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Declarations use only the JSON-compatible subset of YAML; tags are
/// dropped and non-string map keys are stringified.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
