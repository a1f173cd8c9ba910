//! # formval-core — Foundational Types for Form Field Validation
//!
//! This crate defines the primitives shared by the validator catalog and
//! its consumers. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value model.** Raw form input arrives as untyped JSON. After
//!    normalization every value is one of the [`FieldValue`] variants, so
//!    consumers `match` instead of probing types at runtime.
//!
//! 2. **Typed configuration.** [`FieldConfig`] carries the recognized
//!    options with explicit `Option` members. Absence means "no constraint";
//!    an explicit `min: 0` is distinct from an unset `min`.
//!
//! 3. **Structured violations.** Every failed check is a [`Violation`]
//!    tagged with an [`ErrorKind`] and the field label, never a bare string.
//!
//! 4. **UTC-only temporal output.** Date/time input is normalized to
//!    `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS.sssZ`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use config::FieldConfig;
pub use error::{ConfigError, ErrorKind, FieldValidationError, Violation, Violations};
pub use value::{is_falsy, FieldValue, Numeric, RelationRef};
