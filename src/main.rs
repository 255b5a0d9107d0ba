//! Augur command line.
//!
//! Usage:
//!   augur analyze AAPL BTC-USD
//!   augur --ai --provider anthropic analyze NVDA
//!   augur watchlist add TSLA
//!   augur watchlist analyze
//!   augur history AAPL

use anyhow::Result;
use augur::services::{
    AnalysisOutcome, Analyzer, JsonHistoryStore, LogNotifier, OpinionAdapter, SessionOptions,
    SignalHistoryStore, WatchlistStore,
};
use augur::sources::YahooFinanceSource;
use augur::{Config, ProviderKind};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "augur")]
#[command(about = "Technical and AI-assisted trading signals")]
#[command(version)]
struct Cli {
    /// Ask an AI provider for a second opinion
    #[arg(long, global = true, conflicts_with = "no_ai")]
    ai: bool,

    /// Technical analysis only
    #[arg(long, global = true)]
    no_ai: bool,

    /// AI provider (openai, anthropic, gemini, ollama)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one or more symbols
    Analyze {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Manage and analyze the watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
    /// Show recorded signals for a symbol
    History { symbol: String },
}

#[derive(Subcommand, Debug)]
enum WatchlistAction {
    List,
    Add { symbol: String },
    Remove { symbol: String },
    Analyze,
}

impl Cli {
    fn session(&self, config: &Config) -> SessionOptions {
        let mut session = SessionOptions::from(&config.ai);
        if self.ai {
            session.ai_enabled = true;
        }
        if self.no_ai {
            session.ai_enabled = false;
        }
        if let Some(provider) = self.provider {
            session.provider = provider;
        }
        session
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let session = cli.session(&config);

    let history = Arc::new(JsonHistoryStore::new(&config.data_dir));
    let watchlist = WatchlistStore::new(&config.data_dir);

    match &cli.command {
        Command::Analyze { symbols } => {
            let analyzer = build_analyzer(&config, history.clone())?;
            let outcomes = analyzer.analyze_batch(symbols, &session).await;
            print_outcomes(&outcomes);
        }
        Command::Watchlist { action } => match action {
            WatchlistAction::List => {
                let symbols = watchlist.list()?;
                if symbols.is_empty() {
                    println!("Watchlist is empty");
                }
                for symbol in symbols {
                    println!("{}", symbol);
                }
            }
            WatchlistAction::Add { symbol } => {
                if watchlist.add(symbol)? {
                    println!("Added {}", symbol.to_uppercase());
                } else {
                    println!("{} is already on the watchlist", symbol.to_uppercase());
                }
            }
            WatchlistAction::Remove { symbol } => {
                if watchlist.remove(symbol)? {
                    println!("Removed {}", symbol.to_uppercase());
                } else {
                    println!("{} is not on the watchlist", symbol.to_uppercase());
                }
            }
            WatchlistAction::Analyze => {
                let symbols = watchlist.list()?;
                if symbols.is_empty() {
                    println!("Watchlist is empty");
                    return Ok(());
                }
                let analyzer = build_analyzer(&config, history.clone())?;
                let outcomes = analyzer.analyze_batch(&symbols, &session).await;
                print_outcomes(&outcomes);
            }
        },
        Command::History { symbol } => {
            let entries = history.load(symbol)?;
            if entries.is_empty() {
                println!("No history for {}", symbol.to_uppercase());
            }
            for entry in entries {
                let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{:<16} {:<5} {:>4}% {:>12.2}  {}",
                    when,
                    entry.signal.label(),
                    entry.confidence,
                    entry.price,
                    entry.source.as_str()
                );
            }
        }
    }

    Ok(())
}

fn build_analyzer(config: &Config, history: Arc<JsonHistoryStore>) -> Result<Analyzer> {
    info!(
        "Using data directory {} (threshold {})",
        config.data_dir.display(),
        config.signal_threshold
    );

    Ok(Analyzer::new(
        config.clone(),
        Arc::new(YahooFinanceSource::new()?),
        history,
        Arc::new(LogNotifier),
        OpinionAdapter::new(config.ai.clone())?,
    ))
}

fn print_outcomes(outcomes: &[AnalysisOutcome]) {
    println!(
        "{:<10} {:>12} {:<6} {:>5}  {:<13} {:<5}",
        "SYMBOL", "PRICE", "SIGNAL", "CONF", "SOURCE", "PREV"
    );

    for outcome in outcomes {
        match outcome {
            AnalysisOutcome::Analyzed(report) => {
                let previous = report
                    .previous_signal
                    .as_ref()
                    .map(|p| p.signal.label())
                    .unwrap_or("-");
                println!(
                    "{:<10} {:>12.2} {:<6} {:>4}%  {:<13} {:<5}",
                    report.symbol,
                    report.price,
                    report.fused.signal.label(),
                    report.fused.confidence,
                    report.fused.source.as_str(),
                    previous
                );
                for reason in &report.fused.reasons {
                    println!("    - {}", reason);
                }
                if let Some(error) = report.ai.as_ref().and_then(|ai| ai.error.as_ref()) {
                    println!("    ! AI unavailable: {}", error);
                }
            }
            AnalysisOutcome::Unavailable { symbol, reason } => {
                println!("{:<10} unable to analyze: {}", symbol, reason);
            }
        }
    }
}
