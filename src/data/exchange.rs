//! Exchange rates API client
//!
//! This module fetches latest and historical rates from an exchangeratesapi-style
//! HTTP API and parses the responses into `Rates` and `RateHistory`.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;
use tracing::info;

use super::{RateHistory, Rates};

/// Base URL for the public exchange rates API
pub const DEFAULT_BASE_URL: &str = "https://api.exchangeratesapi.io";

/// Decimal places kept for latest rates
const LATEST_RATE_DP: u32 = 2;

/// Errors that can occur when fetching rates
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with an error message
    #[error("Exchange rates API error: {0}")]
    Upstream(String),

    /// The API returned no rates for the request
    #[error("No exchange rate data is available for the selected currency")]
    NoData,

    /// The request was rejected before being sent
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Anything that can supply rate snapshots, usually over the network
pub trait RateSource: Send + Sync {
    /// Fetch the latest rates expressed against `base`
    fn latest(&self, base: &str) -> impl Future<Output = Result<Rates, ApiError>> + Send;

    /// Fetch daily rates for `symbols` against `base` between `start` and `end` inclusive
    fn history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> impl Future<Output = Result<RateHistory, ApiError>> + Send;
}

/// Client for the exchange rates HTTP API
#[derive(Debug, Clone)]
pub struct ExchangeRatesClient {
    client: Client,
    base_url: String,
}

impl Default for ExchangeRatesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeRatesClient {
    /// Create a new client for the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new client against a custom API root
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL of the latest rates for `base`, shown to users as the data source
    pub fn latest_url(&self, base: &str) -> String {
        format!("{}/latest?base={}", self.base_url, base)
    }
}

impl RateSource for ExchangeRatesClient {
    async fn latest(&self, base: &str) -> Result<Rates, ApiError> {
        info!(base, "fetching latest rates");

        let url = format!("{}/latest", self.base_url);
        let response = self.client.get(&url).query(&[("base", base)]).send().await?;
        let text = response.text().await?;

        parse_latest(&text)
    }

    async fn history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> Result<RateHistory, ApiError> {
        if symbols.is_empty() {
            return Err(ApiError::InvalidParameters(
                "at least one target currency is required".to_string(),
            ));
        }

        info!(base, %start, %end, symbols = ?symbols, "fetching rate history");

        let url = format!("{}/history", self.base_url);
        let query = [
            ("start_at", start.format("%Y-%m-%d").to_string()),
            ("end_at", end.format("%Y-%m-%d").to_string()),
            ("base", base.to_string()),
            ("symbols", symbols.join(",")),
        ];
        let response = self.client.get(&url).query(&query).send().await?;
        let text = response.text().await?;

        parse_history(&text)
    }
}

/// Parse a `/latest` response body, rounding every rate to 2 decimal places
pub fn parse_latest(body: &str) -> Result<Rates, ApiError> {
    let response: LatestResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(ApiError::Upstream(error_message(error)));
    }

    let rates = response.rates.ok_or(ApiError::NoData)?;
    Ok(rates
        .into_iter()
        .map(|(code, rate)| (code, rate.round_dp(LATEST_RATE_DP)))
        .collect())
}

/// Parse a `/history` response body
pub fn parse_history(body: &str) -> Result<RateHistory, ApiError> {
    let response: HistoryResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(ApiError::Upstream(error_message(error)));
    }

    match response.rates {
        Some(rates) if !rates.is_empty() => Ok(rates),
        _ => Err(ApiError::NoData),
    }
}

/// The API reports errors either as a plain string or as an object
fn error_message(error: serde_json::Value) -> String {
    match error {
        serde_json::Value::String(message) => message,
        other => other.to_string(),
    }
}

/// `/latest` response structure
#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    rates: Option<Rates>,
}

/// `/history` response structure
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    rates: Option<RateHistory>,
}
