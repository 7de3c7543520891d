//! Schema command.

use anyhow::Result;
use radar_core::analysis::analysis_schema;

pub fn execute() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&analysis_schema())?);
    Ok(())
}
