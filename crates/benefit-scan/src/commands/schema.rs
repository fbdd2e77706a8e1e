//! Schema command implementation

use clap::Args;
use tracing::{debug, instrument};

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the JSON Schema of the report objects in `scan --json` output.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    debug!("executing schema command");
    let schema = benefit_scan_core::report_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
