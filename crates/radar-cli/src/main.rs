//! ReviewRadar CLI
//!
//! Company sentiment reports from the terminal, plus the web dashboard server.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

/// Initialize tracing with optional file logging.
///
/// Console output goes to stderr so `--json` output on stdout stays clean.
/// The returned guard must live until exit to flush the file writer.
fn init_tracing(log_file: Option<&Path>, verbose: bool, serving: bool) -> Option<WorkerGuard> {
    let default_filter = if verbose {
        "radar=debug,radar_core=debug,radar_web=debug"
    } else if serving {
        "radar=info,radar_core=info,radar_web=debug"
    } else {
        "radar=info,radar_core=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if let Some(path) = log_file {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let _ = std::fs::create_dir_all(dir);
        let file_name = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("radar.log"));

        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

        // Log to both stderr and file when --log is used
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        None
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(
            args.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(".radar/serve.log")),
        ),
        _ => None,
    };

    let serving = matches!(&cli.command, Commands::Serve(_));
    let _guard = init_tracing(log_file.as_deref(), cli.verbose, serving);

    cli.execute().await
}
