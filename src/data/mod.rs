//! Core data models for ratebot
//!
//! This module contains the rate types shared by the cache, the HTTP client and
//! the bot commands, plus the fetch layer that ties them together.

pub mod exchange;
pub mod fetcher;

pub use exchange::{ApiError, ExchangeRatesClient, RateSource, DEFAULT_BASE_URL};
pub use fetcher::{FetchError, RateFetcher};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A rate snapshot: currency code to exchange rate against some base currency
pub type Rates = BTreeMap<String, Decimal>;

/// Rate snapshots keyed by the day they were published
pub type RateHistory = BTreeMap<NaiveDate, Rates>;

/// Result of converting an amount between two currencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Amount in the source currency
    pub amount: Decimal,
    /// Source currency code
    pub from: String,
    /// Target currency code
    pub to: String,
    /// Rate applied (units of `to` per unit of `from`)
    pub rate: Decimal,
    /// Converted amount, rounded to 2 decimal places
    pub result: Decimal,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.result, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_conversion_display() {
        let conversion = Conversion {
            amount: Decimal::from(10),
            from: "EUR".to_string(),
            to: "USD".to_string(),
            rate: Decimal::from_str("1.18").unwrap(),
            result: Decimal::from_str("11.80").unwrap(),
        };

        assert_eq!(conversion.to_string(), "11.80 USD");
    }

    #[test]
    fn test_rates_are_ordered_by_code() {
        let rates: Rates = [
            ("USD".to_string(), Decimal::ONE),
            ("EUR".to_string(), Decimal::ONE),
            ("GBP".to_string(), Decimal::ONE),
        ]
        .into_iter()
        .collect();

        let codes: Vec<&str> = rates.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["EUR", "GBP", "USD"]);
    }
}
