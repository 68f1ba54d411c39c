//! Bot command parsing for ratebot
//!
//! This module turns the text of a Telegram message into a `Command`, including
//! the money shorthand accepted by `/exchange` (e.g. `10$` or `5€`).

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Reply to `/start`
pub const START_TEXT: &str = "Use /list to get list of latest exchange rates \
or specify custom currency with /list <valid currency>\n\n\
Also you can use /history and /exchange commands with arguments, \
send a command without arguments to see how to use it";

/// Usage of `/list`
pub const LIST_USAGE: &str = "Usage:\n/list\nor\n/list <valid currency>\n\n\
Example:\n/list\nor\n/list EUR";

/// Usage of `/exchange`
pub const EXCHANGE_USAGE: &str = "Usage:\n/exchange <number> <currency> to <currency>\nor\n\
/exchange <number with symbol> to <currency>\n\n\
Example:\n/exchange 10 EUR to USD\nor\n/exchange 10$ to EUR";

/// Usage of `/history`
pub const HISTORY_USAGE: &str = "Usage: /history <currency>/<currency> for <number> days \
(recommended to use 7 or more days)\n\n\
Example:\n/history USD/EUR for 7 days";

/// Currency symbols recognized in money strings, checked in order
///
/// `¥` is shared by CNY and JPY; the first match wins.
pub const CURRENCY_SYMBOLS: [(&str, &str); 7] = [
    ("GBP", "£"),
    ("CNY", "¥"),
    ("EUR", "€"),
    ("JPY", "¥"),
    ("PLN", "zł"),
    ("RUB", "₽"),
    ("USD", "$"),
];

/// Error types for command parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The message does not start with `/`
    #[error("Not a command")]
    NotACommand,

    /// The command name is not recognized
    #[error("Unknown command: /{0}")]
    Unknown(String),

    /// The command arguments are malformed; holds the command's usage text
    #[error("{0}")]
    Usage(&'static str),
}

/// A parsed bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/list [CUR]`, `None` meaning the default base
    List(Option<String>),
    /// `/exchange <amount> <CUR> to <CUR>`
    Exchange {
        amount: Decimal,
        from: String,
        to: String,
    },
    /// `/history <FROM>/<TO> for <N> days`
    History { from: String, to: String, days: u32 },
}

impl Command {
    /// Parses a message such as `/exchange 10 EUR to USD` or `/list@ratebot GBP`
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let mut words = text.split_whitespace();
        let head = words.next().ok_or(CommandError::NotACommand)?;
        let name = head.strip_prefix('/').ok_or(CommandError::NotACommand)?;
        // Commands in group chats carry the bot name: /list@ratebot
        let name = name.split('@').next().unwrap_or(name).to_lowercase();
        let args: Vec<&str> = words.collect();

        match name.as_str() {
            "start" | "help" => Ok(Command::Start),
            "list" => parse_latest(&args).map(Command::List),
            "exchange" => {
                let (amount, from, to) = parse_exchange(&args)?;
                Ok(Command::Exchange { amount, from, to })
            }
            "history" => {
                let (from, to, days) = parse_history(&args)?;
                Ok(Command::History { from, to, days })
            }
            _ => Err(CommandError::Unknown(name)),
        }
    }
}

/// Parses `/list` arguments: no argument or a single currency code
pub fn parse_latest(args: &[&str]) -> Result<Option<String>, CommandError> {
    match args {
        [] => Ok(None),
        [base] => Ok(Some(base.to_uppercase())),
        _ => Err(CommandError::Usage(LIST_USAGE)),
    }
}

/// Splits a money string like `10$` into its amount text and currency code
///
/// # Returns
/// * `Some((amount, code))` if a known currency symbol is present
/// * `None` otherwise
pub fn parse_money(s: &str) -> Option<(String, &'static str)> {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(_, symbol)| s.contains(symbol))
        .map(|(code, symbol)| (s.replace(symbol, ""), *code))
}

/// Parses `/exchange` arguments into amount, source and target currency
///
/// Accepts `<amount> <CUR> to <CUR>` and `<amount with symbol> to <CUR>`.
pub fn parse_exchange(args: &[&str]) -> Result<(Decimal, String, String), CommandError> {
    let (amount, from, to) = match args {
        [money, keyword, to] if keyword.eq_ignore_ascii_case("to") => {
            let (amount, from) = parse_money(money).ok_or(CommandError::Usage(EXCHANGE_USAGE))?;
            (amount, from.to_string(), *to)
        }
        [amount, from, keyword, to] if keyword.eq_ignore_ascii_case("to") => {
            (amount.to_string(), from.to_uppercase(), *to)
        }
        _ => return Err(CommandError::Usage(EXCHANGE_USAGE)),
    };

    let amount =
        Decimal::from_str(amount.trim()).map_err(|_| CommandError::Usage(EXCHANGE_USAGE))?;

    Ok((amount, from, to.to_uppercase()))
}

/// Parses `/history` arguments: `<FROM>/<TO> for <N> days`
pub fn parse_history(args: &[&str]) -> Result<(String, String, u32), CommandError> {
    let [pair, keyword, days, unit] = args else {
        return Err(CommandError::Usage(HISTORY_USAGE));
    };
    if !keyword.eq_ignore_ascii_case("for") || !unit.eq_ignore_ascii_case("days") {
        return Err(CommandError::Usage(HISTORY_USAGE));
    }

    let (from, to) = match pair.split('/').collect::<Vec<_>>().as_slice() {
        [from, to] if !from.is_empty() && !to.is_empty() => (from.to_uppercase(), to.to_uppercase()),
        _ => return Err(CommandError::Usage(HISTORY_USAGE)),
    };

    if !days.chars().all(|c| c.is_ascii_digit()) {
        return Err(CommandError::Usage(HISTORY_USAGE));
    }
    let days = days
        .parse::<u32>()
        .map_err(|_| CommandError::Usage(HISTORY_USAGE))?;

    Ok((from, to, days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_latest_variants() {
        assert_eq!(parse_latest(&[]), Ok(None));
        assert_eq!(parse_latest(&["eur"]), Ok(Some("EUR".to_string())));
        assert_eq!(
            parse_latest(&["EUR", "USD"]),
            Err(CommandError::Usage(LIST_USAGE))
        );
    }

    #[test]
    fn test_parse_money_symbols() {
        assert_eq!(parse_money("10$"), Some(("10".to_string(), "USD")));
        assert_eq!(parse_money("€5.5"), Some(("5.5".to_string(), "EUR")));
        assert_eq!(parse_money("100zł"), Some(("100".to_string(), "PLN")));
        assert_eq!(parse_money("3£"), Some(("3".to_string(), "GBP")));
        assert_eq!(parse_money("7₽"), Some(("7".to_string(), "RUB")));
    }

    #[test]
    fn test_parse_money_yen_resolves_to_first_match() {
        assert_eq!(parse_money("1000¥"), Some(("1000".to_string(), "CNY")));
    }

    #[test]
    fn test_parse_money_without_symbol() {
        assert_eq!(parse_money("10"), None);
        assert_eq!(parse_money("USD"), None);
    }

    #[test]
    fn test_parse_exchange_long_form() {
        let parsed = parse_exchange(&["10", "eur", "TO", "usd"]).unwrap();
        assert_eq!(parsed, (dec("10"), "EUR".to_string(), "USD".to_string()));
    }

    #[test]
    fn test_parse_exchange_symbol_form() {
        let parsed = parse_exchange(&["10.5$", "to", "EUR"]).unwrap();
        assert_eq!(parsed, (dec("10.5"), "USD".to_string(), "EUR".to_string()));
    }

    #[test]
    fn test_parse_exchange_rejects_bad_shapes() {
        let usage = Err(CommandError::Usage(EXCHANGE_USAGE));
        assert_eq!(parse_exchange(&[]), usage);
        assert_eq!(parse_exchange(&["10", "EUR", "USD"]), usage);
        assert_eq!(parse_exchange(&["10", "EUR", "in", "USD"]), usage);
        assert_eq!(parse_exchange(&["10", "to", "USD"]), usage);
        assert_eq!(parse_exchange(&["ten", "EUR", "to", "USD"]), usage);
        assert_eq!(parse_exchange(&["$", "to", "USD"]), usage);
    }

    #[test]
    fn test_parse_history_valid() {
        let parsed = parse_history(&["usd/eur", "for", "7", "DAYS"]).unwrap();
        assert_eq!(parsed, ("USD".to_string(), "EUR".to_string(), 7));
    }

    #[test]
    fn test_parse_history_invalid() {
        let usage = Err(CommandError::Usage(HISTORY_USAGE));
        assert_eq!(parse_history(&["USD/EUR", "for", "7"]), usage);
        assert_eq!(parse_history(&["USD-EUR", "for", "7", "days"]), usage);
        assert_eq!(parse_history(&["USD/EUR/GBP", "for", "7", "days"]), usage);
        assert_eq!(parse_history(&["USD/", "for", "7", "days"]), usage);
        assert_eq!(parse_history(&["USD/EUR", "in", "7", "days"]), usage);
        assert_eq!(parse_history(&["USD/EUR", "for", "-7", "days"]), usage);
        assert_eq!(parse_history(&["USD/EUR", "for", "seven", "days"]), usage);
        assert_eq!(parse_history(&["USD/EUR", "for", "7", "weeks"]), usage);
    }

    #[test]
    fn test_command_parse_list() {
        assert_eq!(Command::parse("/list"), Ok(Command::List(None)));
        assert_eq!(
            Command::parse("/list@ratebot gbp"),
            Ok(Command::List(Some("GBP".to_string())))
        );
    }

    #[test]
    fn test_command_parse_exchange() {
        assert_eq!(
            Command::parse("/exchange 10 EUR to USD"),
            Ok(Command::Exchange {
                amount: dec("10"),
                from: "EUR".to_string(),
                to: "USD".to_string(),
            })
        );
    }

    #[test]
    fn test_command_parse_history() {
        assert_eq!(
            Command::parse("/history  USD/EUR for 30 days"),
            Ok(Command::History {
                from: "USD".to_string(),
                to: "EUR".to_string(),
                days: 30,
            })
        );
    }

    #[test]
    fn test_command_parse_start_and_unknown() {
        assert_eq!(Command::parse("/start"), Ok(Command::Start));
        assert_eq!(
            Command::parse("/rates"),
            Err(CommandError::Unknown("rates".to_string()))
        );
        assert_eq!(Command::parse("hello"), Err(CommandError::NotACommand));
        assert_eq!(Command::parse("   "), Err(CommandError::NotACommand));
    }

    #[test]
    fn test_usage_error_displays_usage() {
        let err = Command::parse("/history USD").unwrap_err();
        assert!(err.to_string().contains("/history USD/EUR for 7 days"));
    }
}
