//! Command-line interface parsing for ratebot
//!
//! This module handles parsing of CLI arguments using clap. Every option can also
//! be supplied through the environment (or a `.env` file loaded at startup).

use clap::Parser;
use thiserror::Error;

use crate::cache::DEFAULT_TTL_SECONDS;
use crate::data::DEFAULT_BASE_URL;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The bot token is empty
    #[error("Telegram bot token must not be empty (set --token or EXCHANGE_TELEGRAM_BOT)")]
    EmptyToken,

    /// The default base currency is not a three-letter code
    #[error("Invalid base currency: '{0}'. Expected a three-letter code such as USD")]
    InvalidBase(String),
}

/// ratebot - Telegram bot for exchange rates and currency conversion
#[derive(Parser, Debug)]
#[command(name = "ratebot")]
#[command(about = "Telegram bot for exchange rates, rate history and currency conversion")]
#[command(version)]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "EXCHANGE_TELEGRAM_BOT", hide_env_values = true)]
    pub token: String,

    /// Root URL of the exchange rates API
    #[arg(long, env = "RATEBOT_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Default base currency for /list
    #[arg(long, env = "RATEBOT_BASE", default_value = "USD")]
    pub base: String,

    /// Seconds a cached rate snapshot stays fresh
    #[arg(long, env = "RATEBOT_CACHE_TTL", default_value_t = DEFAULT_TTL_SECONDS)]
    pub cache_ttl: u64,
}

/// Validated runtime configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    /// Upper-case default base currency
    pub base: String,
    pub cache_ttl: u64,
}

impl BotConfig {
    /// Creates a BotConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(BotConfig)` with the base currency upper-cased
    /// * `Err(CliError)` if the token is blank or the base is malformed
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let token = cli.token.trim();
        if token.is_empty() {
            return Err(CliError::EmptyToken);
        }

        let base = cli.base.trim().to_uppercase();
        if base.len() != 3 || !base.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CliError::InvalidBase(cli.base.clone()));
        }

        Ok(BotConfig {
            token: token.to_string(),
            api_url: cli.api_url.clone(),
            base,
            cache_ttl: cli.cache_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(["ratebot", "--token", "123:abc"]).unwrap();
        assert_eq!(cli.token, "123:abc");
        assert_eq!(cli.base, "USD");
        assert_eq!(cli.cache_ttl, 10);
        assert_eq!(cli.api_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::try_parse_from([
            "ratebot",
            "--token",
            "123:abc",
            "--base",
            "eur",
            "--cache-ttl",
            "300",
            "--api-url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(cli.base, "eur");
        assert_eq!(cli.cache_ttl, 300);
        assert_eq!(cli.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_cli_rejects_negative_ttl() {
        let result = Cli::try_parse_from(["ratebot", "--token", "t", "--cache-ttl", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_cli_uppercases_base() {
        let cli = Cli::try_parse_from(["ratebot", "--token", " 123:abc ", "--base", "eur"]).unwrap();
        let config = BotConfig::from_cli(&cli).unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.base, "EUR");
        assert_eq!(config.cache_ttl, 10);
    }

    #[test]
    fn test_config_from_cli_empty_token() {
        let cli = Cli::try_parse_from(["ratebot", "--token", "  "]).unwrap();
        let err = BotConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_config_from_cli_invalid_base() {
        let cli = Cli::try_parse_from(["ratebot", "--token", "t", "--base", "DOLLAR"]).unwrap();
        let result = BotConfig::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidBase(_))));
    }
}
