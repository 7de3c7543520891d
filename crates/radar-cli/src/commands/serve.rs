//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use radar_core::config::RadarConfig;
use radar_core::provider::GeminiClient;
use radar_core::QueryController;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to .radar/serve.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: RadarConfig) -> Result<()> {
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);

    let client = GeminiClient::from_config(&config.provider)?;
    let model = client.model().to_string();
    let controller = QueryController::with_policy(Arc::new(client), config.search.stale_policy);

    println!();
    println!("  {} {}", "ReviewRadar".magenta().bold(), "Web Server".bold());
    println!();
    println!("  {}  http://{}:{}", "Dashboard".green(), host, port);
    println!("  {}        http://{}:{}/api", "API".green(), host, port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), host, port);
    println!("  {}      {}", "Model".green(), model);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    radar_web::run_server(controller, &host, port).await?;

    Ok(())
}
