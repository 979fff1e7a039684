// Entry point for the revenue-scout driver

use anyhow::{Context, Result};
use clap::Parser;
use estimation::{Estimator, SnippetSource};
use revenue_cli::sources::{BingSource, PacedSource, TavilySource};
use revenue_cli::{run, Args, Config, Ledger, RunOptions, SourceKind};
use std::num::NonZeroU32;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so env-backed arguments see it
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,estimation=debug,revenue_cli=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_args(Args::parse()).context("Failed to load configuration")?;
    tracing::info!(source = ?config.source, input = %config.input.display(), "Configuration loaded");

    let source = build_source(&config)?;
    let estimator = Estimator::new(source, config.estimation.clone());

    let mut ledger = Ledger::load(&config.input)?;
    let start = ledger.resume_from(&config.output);
    tracing::info!("Resuming from row {} of {}", start, ledger.len());

    let options = RunOptions {
        output: config.output.clone(),
        checkpoint_every: config.checkpoint_every,
        min_delay: config.min_delay,
        max_delay: config.max_delay,
    };

    match run(&estimator, &mut ledger, start, &options).await {
        Ok(summary) => {
            tracing::info!(
                "Processing complete: {} rows, {} estimated, {} unknown. Results saved to {}",
                summary.processed,
                summary.estimated,
                summary.unknown,
                config.output.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Unexpected error: {:#}", e);
            ledger
                .save_atomic(&config.crash_output)
                .context("Failed to write crash recovery ledger")?;
            tracing::info!("Partial results saved to {}", config.crash_output.display());
            Err(e)
        }
    }
}

fn build_source(config: &Config) -> Result<Box<dyn SnippetSource>> {
    let rate = NonZeroU32::new(config.requests_per_minute).context("requests-per-minute must be > 0")?;

    let source: Box<dyn SnippetSource> = match config.source {
        SourceKind::Bing => Box::new(PacedSource::per_minute(BingSource::new()?, rate)),
        SourceKind::Tavily => {
            let api_key = config
                .tavily_api_key
                .clone()
                .context("TAVILY_API_KEY must be set")?;
            Box::new(PacedSource::per_minute(TavilySource::new(api_key)?, rate))
        }
    };

    Ok(source)
}
