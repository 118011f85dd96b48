//! CrashGuard command line.
//!
//! The JSON result of every command goes to stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crashguard::application::bootstrap::{Adapters, CrashGuardBootstrap};
use crashguard::application::crash_guard::{NotificationOutcome, RunOptions};
use crashguard::application::universe_scanner::UniverseScanner;
use crashguard::config::{Config, CrashGuardConfig};
use crashguard::domain::history::cri_series;
use crashguard::domain::market::IndicatorSet;
use crashguard::domain::ports::HistoryRepository;
use crashguard::domain::scoring::compute_scores;
use crashguard::infrastructure::JsonHistoryStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Crash Risk Index monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch indicators, score, scan tickers, save history and notify
    Run {
        /// Scoring configuration TOML (default: $CRASHGUARD_CONFIG or config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// History JSON file (default: $CRASHGUARD_HISTORY or crashguard_history.json)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Print the record without saving history or notifying
        #[arg(long)]
        dry_run: bool,

        /// Skip the ticker universe scan
        #[arg(long)]
        skip_stocks: bool,

        /// Write Prometheus text exposition to this file
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },
    /// Score an indicator set from a JSON file against stored history
    Score {
        /// JSON object with all eight indicator input keys
        #[arg(short, long)]
        inputs: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Analyze tickers only (defaults to the configured universe)
    Stocks {
        tickers: Vec<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the most recent history records
    History {
        #[arg(long)]
        history: Option<PathBuf>,

        /// Number of records to show
        #[arg(short = 'n', long, default_value = "10")]
        last: usize,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let env_config = Config::from_env()?;

    match cli.command {
        Commands::Run {
            config,
            history,
            dry_run,
            skip_stocks,
            metrics_file,
        } => {
            let scoring_config = load_config(&env_config, config)?;
            let service = CrashGuardBootstrap::init(&env_config, scoring_config, history)?;
            let options = RunOptions {
                dry_run,
                skip_stocks,
            };

            let evaluation = service.evaluate(options).await?;
            // Printed before saving so a failed write still leaves the result visible
            println!("{}", serde_json::to_string_pretty(&evaluation.record)?);

            let outcome = service.commit(evaluation, options).await?;
            if let Some(path) = metrics_file {
                service.metrics().write_textfile(&path)?;
                info!("Metrics written to {:?}", path);
            }

            match outcome.notification {
                NotificationOutcome::NotRequired => info!("No notification needed"),
                NotificationOutcome::Suppressed => info!("Notification suppressed (dry run)"),
                NotificationOutcome::Delivered => info!("Notification sent"),
                NotificationOutcome::Failed => info!("Notification could not be delivered"),
            }
        }
        Commands::Score {
            inputs,
            config,
            history,
        } => {
            let scoring_config = load_config(&env_config, config)?;
            let content = std::fs::read_to_string(&inputs)
                .with_context(|| format!("Failed to read inputs file {:?}", inputs))?;
            let set: IndicatorSet = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse inputs file {:?}", inputs))?;

            let store = JsonHistoryStore::new(history.unwrap_or(env_config.history_path.clone()));
            let records = store.load().await?;
            let result = compute_scores(&scoring_config.scoring, &set, &cri_series(&records))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Stocks { tickers, config } => {
            let scoring_config = load_config(&env_config, config)?;
            let mut stocks = scoring_config.stocks.clone();
            if !tickers.is_empty() {
                stocks.tickers = tickers;
            }
            let tickers = stocks.normalized_tickers();
            if tickers.is_empty() {
                anyhow::bail!("No tickers given and none configured under [stocks]");
            }

            let adapters = Adapters::from_env(&env_config);
            let scanner = UniverseScanner::new(adapters.prices, &stocks);
            let section = scanner.scan(&tickers).await;
            println!("{}", serde_json::to_string_pretty(&section)?);
        }
        Commands::History { history, last } => {
            let store = JsonHistoryStore::new(history.unwrap_or(env_config.history_path.clone()));
            let records = store.load().await?;
            let start = records.len().saturating_sub(last);
            for record in &records[start..] {
                println!(
                    "{} {:<6} {:>6.2}",
                    record.ts.format("%Y-%m-%dT%H:%M:%SZ"),
                    record.state,
                    record.cri
                );
            }
        }
    }

    Ok(())
}

fn load_config(env_config: &Config, path: Option<PathBuf>) -> Result<CrashGuardConfig> {
    let path = path.unwrap_or_else(|| env_config.config_path.clone());
    info!("Loading configuration from {:?}", path);
    CrashGuardConfig::load(&path)
}
