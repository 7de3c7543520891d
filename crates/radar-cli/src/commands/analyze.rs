//! One-shot analysis command.

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use radar_core::config::RadarConfig;
use radar_core::provider::GeminiClient;
use radar_core::{QueryController, SearchPhase};
use std::sync::Arc;
use std::time::Duration;

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Company name to analyze
    pub company: String,

    /// Print the report as JSON instead of the terminal dashboard
    #[arg(long)]
    pub json: bool,

    /// Gemini model to use
    #[arg(long)]
    pub model: Option<String>,

    /// Ground the analysis in live search results
    #[arg(long)]
    pub grounded: bool,
}

pub async fn execute(args: AnalyzeArgs, config: RadarConfig) -> Result<()> {
    let mut provider_config = config.provider;
    if let Some(model) = args.model {
        provider_config.model = model;
    }
    if args.grounded {
        provider_config.grounded = true;
    }

    let client = GeminiClient::from_config(&provider_config)?;
    tracing::debug!(
        model = %provider_config.model,
        grounded = provider_config.grounded,
        "Provider configured"
    );
    let controller = QueryController::with_policy(Arc::new(client), config.search.stale_policy);

    let spinner = (!args.json).then(|| loading_spinner(&args.company));
    controller.submit_query(&args.company).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let state = controller.state();
    match (state.phase(), state.data, state.error) {
        (SearchPhase::Success, Some(data), _) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&*data)?);
            } else {
                output::print_analysis(&data);
            }
            Ok(())
        }
        (_, _, Some(message)) => {
            if args.json {
                anyhow::bail!(message);
            }
            output::print_failure(&message);
            anyhow::bail!("analysis failed")
        }
        _ => anyhow::bail!("analysis did not complete"),
    }
}

fn loading_spinner(company: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analyzing reviews, threads and posts about {}...", company));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
