//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use radar_core::config::RadarConfig;
use std::path::PathBuf;

pub mod analyze;
pub mod schema;
pub mod serve;
pub mod validate;

/// ReviewRadar - Know what they really think
#[derive(Parser)]
#[command(name = "radar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (defaults to ./radar.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze public sentiment about a company
    Analyze(analyze::AnalyzeArgs),

    /// Check a JSON report against the analysis contract
    Validate(validate::ValidateArgs),

    /// Print the JSON Schema of the analysis report
    Schema,

    /// Start the web dashboard
    Serve(serve::ServeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = RadarConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Analyze(args) => analyze::execute(args, config).await,
            Commands::Validate(args) => validate::execute(args),
            Commands::Schema => schema::execute(),
            Commands::Serve(args) => serve::execute(args, config).await,
        }
    }
}
