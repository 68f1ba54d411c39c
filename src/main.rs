//! ratebot - Telegram bot for exchange rates
//!
//! Answers `/list`, `/exchange` and `/history` commands from a public exchange
//! rates API, with latest rates cached in memory for a short TTL.

use std::sync::Arc;

use clap::Parser;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ratebot::bot;
use ratebot::cache::RateCache;
use ratebot::cli::{BotConfig, Cli};
use ratebot::data::{ExchangeRatesClient, RateFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = BotConfig::from_cli(&cli)?;
    info!(
        api_url = %config.api_url,
        base = %config.base,
        cache_ttl = config.cache_ttl,
        "starting ratebot"
    );

    let cache = Arc::new(RateCache::new(config.cache_ttl));
    let client = ExchangeRatesClient::with_base_url(config.api_url.clone());
    let fetcher = RateFetcher::connect(client, cache, &config.base).await?;

    bot::run(Bot::new(config.token), Arc::new(fetcher)).await;

    info!("ratebot stopped");
    Ok(())
}
