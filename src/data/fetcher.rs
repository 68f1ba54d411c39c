//! Rate fetching layer on top of the rate cache
//!
//! `RateFetcher` validates currency codes, serves latest rates from the
//! `RateCache` when fresh, and otherwise fetches from a `RateSource` and writes
//! the result back into the cache.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::{ApiError, Conversion, RateSource, Rates};
use crate::cache::RateCache;

/// Decimal places of a converted amount
const CONVERSION_DP: u32 = 2;

/// Errors that can occur when looking up rates
#[derive(Debug, Error)]
pub enum FetchError {
    /// The currency code is not in the supported set
    #[error("Unknown currency: '{0}'")]
    UnknownCurrency(String),

    /// The upstream API request failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The upstream snapshot did not contain the requested pair
    #[error("No {target} rate available for base {base}")]
    MissingRate { base: String, target: String },

    /// The converted amount does not fit in a decimal
    #[error("Amount {amount} {from} is too large to convert to {to}")]
    AmountOutOfRange {
        amount: Decimal,
        from: String,
        to: String,
    },
}

/// Serves rate lookups for the bot commands
///
/// Holds the shared `RateCache`; network fetches always happen outside the
/// cache lock, and a successful fetch replaces the cached snapshot for its base.
#[derive(Debug)]
pub struct RateFetcher<S> {
    source: S,
    cache: Arc<RateCache>,
    default_base: String,
    currencies: BTreeSet<String>,
}

impl<S: RateSource> RateFetcher<S> {
    /// Connects to the source and learns the supported currencies
    ///
    /// The latest snapshot for `default_base` lists every currency the API
    /// knows; it is also stored in the cache.
    pub async fn connect(
        source: S,
        cache: Arc<RateCache>,
        default_base: &str,
    ) -> Result<Self, FetchError> {
        let default_base = default_base.trim().to_uppercase();
        let rates = source.latest(&default_base).await?;

        let mut currencies: BTreeSet<String> = rates.keys().cloned().collect();
        currencies.insert(default_base.clone());
        info!(
            base = %default_base,
            currencies = currencies.len(),
            "loaded supported currencies"
        );

        cache.save(&default_base, Arc::new(rates));

        Ok(Self {
            source,
            cache,
            default_base,
            currencies,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn default_base(&self) -> &str {
        &self.default_base
    }

    /// All supported currency codes, sorted
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.currencies.iter().map(String::as_str)
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.currencies.contains(code)
    }

    /// Upper-cases `code` and checks it against the supported set
    fn validate(&self, code: &str) -> Result<String, FetchError> {
        let code = code.trim().to_uppercase();
        if self.is_supported(&code) {
            Ok(code)
        } else {
            Err(FetchError::UnknownCurrency(code))
        }
    }

    /// Latest rates for `base`, or for the default base when `None`
    ///
    /// Returns the cached snapshot when it is fresh, otherwise fetches and caches
    /// a new one.
    pub async fn latest(&self, base: Option<&str>) -> Result<Arc<Rates>, FetchError> {
        let base = match base {
            Some(code) => self.validate(code)?,
            None => self.default_base.clone(),
        };

        if let Some(rates) = self.cache.get(&base) {
            return Ok(rates);
        }

        debug!(base = %base, "rate cache miss");
        let rates = Arc::new(self.source.latest(&base).await?);
        self.cache.save(&base, Arc::clone(&rates));

        Ok(rates)
    }

    /// Converts `amount` of `from` into `to` using the latest rates
    pub async fn exchange(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Conversion, FetchError> {
        let from = self.validate(from)?;
        let to = self.validate(to)?;

        let rates = self.latest(Some(&from)).await?;
        let rate = lookup_rate(&rates, &from, &to)?;
        let Some(result) = amount.checked_mul(rate) else {
            return Err(FetchError::AmountOutOfRange { amount, from, to });
        };

        Ok(Conversion {
            amount,
            result: result.round_dp(CONVERSION_DP),
            rate,
            from,
            to,
        })
    }

    /// Daily `from`/`to` rates for the `days` days up to `today`, oldest first
    ///
    /// Histories are fetched on every call; only latest snapshots are cached.
    pub async fn history(
        &self,
        from: &str,
        to: &str,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Decimal)>, FetchError> {
        let from = self.validate(from)?;
        let to = self.validate(to)?;
        let (start, end) = history_window(today, days);

        let history = self
            .source
            .history(start, end, &from, std::slice::from_ref(&to))
            .await?;

        history
            .iter()
            .map(|(date, rates)| lookup_rate(rates, &from, &to).map(|rate| (*date, rate)))
            .collect()
    }
}

/// First and last day of a history window ending at `today`
pub fn history_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// Rate of `target` in a snapshot, where the base itself is always 1
fn lookup_rate(rates: &Rates, base: &str, target: &str) -> Result<Decimal, FetchError> {
    if let Some(rate) = rates.get(target) {
        return Ok(*rate);
    }
    if base == target {
        return Ok(Decimal::ONE);
    }
    Err(FetchError::MissingRate {
        base: base.to_string(),
        target: target.to_string(),
    })
}
