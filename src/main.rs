use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use credrate::application::ml::orchestrator::DaySeriesOrchestrator;
use credrate::application::rating_service::RatingService;
use credrate::config::Config;
use credrate::infrastructure::{CsvSentimentTable, FredMacroProvider, YahooMarketDataProvider};
use credrate::interfaces::report::PredictionReport;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily credit rating series with feature attributions", long_about = None)]
struct Cli {
    /// Ticker symbol to rate
    #[arg(short, long)]
    symbol: String,

    /// Anchor date (YYYY-MM-DD); the series ends the day before. Defaults to today (UTC)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Lookback window in calendar days (overrides LOOKBACK_DAYS)
    #[arg(long)]
    lookback: Option<u32>,

    /// Number of top contributions per day (overrides TOP_CONTRIBUTIONS)
    #[arg(long)]
    top: Option<usize>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the JSON report
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(lookback) = cli.lookback {
        config.prediction.lookback_days = lookback;
    }
    if let Some(top) = cli.top {
        config.prediction.top_contributions = top;
    }
    config.prediction.validate()?;

    let ctx = config
        .artifacts
        .artifact_store()
        .load()
        .context("Failed to load model artifacts")?;
    info!("Model context ready: {:?}", ctx);

    let sentiment = CsvSentimentTable::load(&config.artifacts.sentiment_path())?;

    let providers = &config.providers;
    let service = RatingService::new(
        Arc::new(YahooMarketDataProvider::new(
            providers.yahoo_base_url.clone(),
            providers.price_history_range.clone(),
            providers.http_timeout_secs,
        )),
        Arc::new(FredMacroProvider::new(
            providers.fred_base_url.clone(),
            providers.fred_api_key.clone(),
            providers.http_timeout_secs,
        )),
        Arc::new(sentiment),
        DaySeriesOrchestrator::new(
            Arc::new(ctx),
            config.prediction.lookback_days,
            config.prediction.top_contributions,
        ),
    );

    let result = match cli.as_of {
        Some(as_of) => service.predict_as_of(&cli.symbol, as_of).await,
        None => service.predict(&cli.symbol).await,
    }
    .with_context(|| format!("Prediction failed for {}", cli.symbol))?;

    let report = PredictionReport::from(&result);
    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}
