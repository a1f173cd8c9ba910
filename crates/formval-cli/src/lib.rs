//! # formval-cli — Command-Line Interface for formval
//!
//! Provides the `formval` command-line interface over the validator
//! catalog and form declarations.
//!
//! ## Subcommands
//!
//! - `formval kinds`: List the catalog's field types.
//! - `formval field`: Evaluate one value against a single field validator.
//! - `formval check`: Check a values document against a form declaration.
//!
//! ```bash
//! formval field integer --label Age --config '{min: 18}' --json 21
//! formval field date --text 2024-02-30
//! formval check signup.yaml submission.json --format json
//! ```
//!
//! ## Exit Codes
//!
//! `0` when the input is accepted, `1` when it is rejected or the command
//! fails (unreadable files, invalid declarations, bad arguments).
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `formval-schema`; reports are rendered
//!   by pure functions so they can be tested without a process.

pub mod check;
pub mod field;
pub mod kinds;

/// Exit code for accepted input.
pub const EXIT_ACCEPTED: u8 = 0;

/// Exit code for rejected input.
pub const EXIT_REJECTED: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_ACCEPTED, EXIT_REJECTED);
    }

    #[test]
    fn public_modules_are_accessible() {
        let _ = std::any::type_name::<check::CheckArgs>();
        let _ = std::any::type_name::<field::FieldArgs>();
        let _ = std::any::type_name::<kinds::KindsArgs>();
    }
}
