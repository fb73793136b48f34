mod calendar;
mod config;
mod core;
mod enrich;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use tracing::info;

use calendar::aggregate::CalendarAggregator;
use calendar::whispers::EarningsWhispersClient;
use config::config::AppCfg;
use enrich::merge::enrich;
use enrich::ycharts::YChartsClient;

#[derive(Parser, Debug)]
#[command(name = "earnings-calendar", version, about = "Collect the upcoming earnings calendar")]
struct Cli {
    /// Number of business days to fetch
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,

    /// Business-day offset of the first day (0 is today)
    #[arg(long = "start-day", default_value_t = 1)]
    start_day: u32,

    /// File name prefix for the written calendar
    #[arg(long = "base-name", default_value = "earnings_calendar")]
    base_name: String,

    /// Directory the calendar file is written into
    #[arg(long = "out-dir", default_value = "earnings-calendar-files")]
    out_dir: PathBuf,

    /// Comma-separated provider fields to join onto the written file
    #[arg(long, value_delimiter = ',')]
    enrich: Vec<String>,

    /// Path to the config file
    #[arg(long, default_value = "config.yml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let cfg = AppCfg::load(&cli.config)?;

    let client = Client::builder()
        .user_agent(cfg.http.user_agent.clone())
        .timeout(cfg.http.timeout)
        .build()
        .context("building http client")?;

    info!(days = cli.days, start_day = cli.start_day, "fetching earnings calendar");
    let fetcher = EarningsWhispersClient::new(cfg.calendar.clone(), client.clone());
    let aggregator = CalendarAggregator::new(fetcher, cfg.calendar.show_more);
    let dataset = aggregator.aggregate(cli.days, cli.start_day).await?;

    let path = output::writer::write(&dataset, &cli.base_name, &cli.out_dir)?;

    if !cli.enrich.is_empty() {
        let api_key = std::env::var("YCHARTS_API_KEY")
            .context("YCHARTS_API_KEY must be set to enrich the calendar")?;
        let provider = YChartsClient::new(cfg.ycharts.clone(), client, api_key);
        enrich(&provider, &path, &cli.enrich).await?;
    }

    info!(path = %path.display(), "done");
    Ok(())
}
