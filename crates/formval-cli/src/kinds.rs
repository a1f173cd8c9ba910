//! # Kinds Subcommand
//!
//! Lists the field types the catalog can build.

use anyhow::Result;
use clap::Args;
use formval_schema::FieldKind;

use crate::EXIT_ACCEPTED;

/// Arguments for the kinds subcommand.
#[derive(Args, Debug)]
pub struct KindsArgs {
    /// Print the list as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Execute the kinds subcommand.
pub fn run_kinds(args: &KindsArgs) -> Result<u8> {
    print!("{}", render_kinds(args.json)?);
    Ok(EXIT_ACCEPTED)
}

/// Render the catalog listing.
pub fn render_kinds(json: bool) -> Result<String> {
    if json {
        let names: Vec<&str> = FieldKind::ALL.iter().map(FieldKind::as_str).collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&names)?));
    }

    let mut out = String::from("Field types:\n\n");
    for kind in FieldKind::ALL {
        let value = if kind.is_array() { "array" } else { "scalar" };
        out.push_str(&format!("  {:<16} {value}\n", kind.as_str()));
    }
    out.push_str(&format!("\nTotal: {} types\n", FieldKind::ALL.len()));
    Ok(out)
}
