//! Validate a saved report against the analysis contract.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use radar_core::analysis::{parse_analysis, validate_analysis};
use std::io::Read;
use std::path::PathBuf;

use crate::output;

#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file to check (`-` reads stdin)
    pub file: PathBuf,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let text = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?
    };

    match parse_analysis(&text) {
        Ok(result) => {
            println!(
                "{} Valid report for {}",
                "✓".green().bold(),
                result.company_name.bold()
            );
            output::print_warnings(&validate_analysis(&result).warnings);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), e);
            anyhow::bail!("report rejected")
        }
    }
}
