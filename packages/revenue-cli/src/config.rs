use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crate::ledger::LedgerFormat;
use estimation::EstimationConfig;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;

/// Which backend supplies search snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Scrape Bing result pages
    Bing,
    /// Tavily search API (needs TAVILY_API_KEY)
    Tavily,
}

/// Estimate company revenue from search snippets and fill in a CSV or xlsx ledger.
#[derive(Debug, Parser)]
#[command(name = "revenue-scout", version)]
pub struct Args {
    /// Input ledger with DBA NAME, BUSINESS NAME, ADDRESS and CITY columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output ledger; an existing file is resumed from
    #[arg(short, long)]
    pub output: PathBuf,

    /// Where the partial ledger goes if the run fails
    #[arg(long)]
    pub crash_output: Option<PathBuf>,

    #[arg(long, value_enum, env = "REVENUE_SCOUT_SOURCE", default_value = "bing")]
    pub source: SourceKind,

    /// Save progress every N rows
    #[arg(long, default_value_t = 10)]
    pub checkpoint_every: usize,

    /// Lower bound of the pause between companies, in seconds
    #[arg(long, env = "REVENUE_SCOUT_MIN_DELAY", default_value_t = 3.42)]
    pub min_delay: f64,

    /// Upper bound of the pause between companies, in seconds
    #[arg(long, env = "REVENUE_SCOUT_MAX_DELAY", default_value_t = 7.54)]
    pub max_delay: f64,

    /// Search requests allowed per minute
    #[arg(long, env = "REVENUE_SCOUT_REQUESTS_PER_MINUTE", default_value_t = 20)]
    pub requests_per_minute: u32,

    /// JSON file overriding scoring, reconciliation and search settings
    #[arg(long)]
    pub estimation_config: Option<PathBuf>,
}

/// Driver configuration assembled from arguments and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub crash_output: PathBuf,
    pub source: SourceKind,
    pub tavily_api_key: Option<SecretString>,
    pub checkpoint_every: usize,
    pub min_delay: f64,
    pub max_delay: f64,
    pub requests_per_minute: u32,
    pub estimation: EstimationConfig,
}

impl Config {
    /// Build from parsed arguments. Call `dotenvy::dotenv()` before parsing
    /// so `.env` values reach the `env` fallbacks.
    pub fn from_args(args: Args) -> Result<Self> {
        let estimation = match &args.estimation_config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                EstimationConfig::from_json(&json)
                    .with_context(|| format!("Invalid estimation config in {}", path.display()))?
            }
            None => EstimationConfig::default(),
        };

        let tavily_api_key = env::var("TAVILY_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);
        if args.source == SourceKind::Tavily && tavily_api_key.is_none() {
            bail!("TAVILY_API_KEY must be set to use the tavily source");
        }

        if !args.min_delay.is_finite()
            || !args.max_delay.is_finite()
            || args.min_delay < 0.0
            || args.min_delay > args.max_delay
        {
            bail!(
                "delay range must be finite and satisfy 0 <= min <= max (got {} and {})",
                args.min_delay,
                args.max_delay
            );
        }
        if args.checkpoint_every == 0 {
            bail!("checkpoint-every must be at least 1");
        }
        if args.requests_per_minute == 0 {
            bail!("requests-per-minute must be at least 1");
        }

        let crash_output = args.crash_output.clone().unwrap_or_else(|| {
            args.output
                .with_file_name("CRASH_RECOVERY")
                .with_extension(LedgerFormat::from_path(&args.output).extension())
        });

        Ok(Self {
            input: args.input,
            output: args.output,
            crash_output,
            source: args.source,
            tavily_api_key,
            checkpoint_every: args.checkpoint_every,
            min_delay: args.min_delay,
            max_delay: args.max_delay,
            requests_per_minute: args.requests_per_minute,
            estimation,
        })
    }
}
