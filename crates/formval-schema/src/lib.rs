//! # formval-schema — Field Validator Catalog & Form Declarations
//!
//! Builds per-field validators for form input and binds them to named
//! fields of a form.
//!
//! ## Validator Catalog (`catalog`)
//!
//! The [`catalog`] module holds one factory per field type (`string`,
//! `email`, `integer`, `date`, ...). Each factory returns a [`Validator`]
//! that normalizes raw input and then checks it:
//!
//! - [`Transform`]: the per-type normalization step.
//! - [`Shape`]: the primitive type check on the normalized value.
//! - [`Constraint`]: configured rules, all of which are evaluated.
//!
//! Use [`catalog::build`] to pick the factory from a [`FieldKind`].
//!
//! ## Form Declarations (`form`)
//!
//! The [`form`] module loads YAML or JSON form declarations, checks them
//! against the embedded `form.schema.json`, and validates whole values
//! documents field by field with [`FormSchema::validate`].
//!
//! ## Crate Policy
//!
//! - Depends only on `formval-core` internally.
//! - Validators are immutable and hold no state between calls; they may
//!   be shared freely across threads.
//! - Configuration problems surface when a validator is built, never
//!   while validating a value.

pub mod catalog;
pub mod constraint;
pub mod form;
pub mod shape;
pub mod transform;
pub mod validator;

pub use catalog::{build, FieldKind, UnknownFieldKind};
pub use constraint::Constraint;
pub use form::{
    load_document, DeclarationViolation, DeclarationViolations, FieldDeclaration, FieldFailure,
    FieldFailures, FormField, FormSchema, FormSchemaError, FormValidationError, FormValues,
};
pub use shape::Shape;
pub use transform::Transform;
pub use validator::{RawCheck, Validator};
