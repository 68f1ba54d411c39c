//! Telegram front end
//!
//! Dispatches incoming messages to the command handlers. A single
//! `RateFetcher` is shared by every handler through the dispatcher's
//! dependency map.

use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::chart::render_history;
use crate::command::{
    Command, CommandError, EXCHANGE_USAGE, HISTORY_USAGE, LIST_USAGE, START_TEXT,
};
use crate::data::{ExchangeRatesClient, FetchError, RateFetcher, Rates};

/// The fetcher shared by all handlers
pub type SharedFetcher = Arc<RateFetcher<ExchangeRatesClient>>;

/// Runs the long-polling dispatcher until Ctrl-C
pub async fn run(bot: Bot, fetcher: SharedFetcher) {
    info!("starting Telegram dispatcher");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![fetcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// Parses one message and sends the reply
async fn handle_message(bot: Bot, msg: Message, fetcher: SharedFetcher) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let reply = match Command::parse(text) {
        Ok(command) => {
            info!(chat = %msg.chat.id, ?command, "handling command");
            reply_to(&fetcher, command).await
        }
        Err(CommandError::NotACommand) => return Ok(()),
        Err(CommandError::Unknown(name)) => {
            warn!(chat = %msg.chat.id, command = %name, "unknown command");
            START_TEXT.to_string()
        }
        Err(CommandError::Usage(usage)) => usage.to_string(),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Builds the reply text for a parsed command
///
/// Fetch failures are logged and answered with the command's usage text.
pub async fn reply_to(fetcher: &RateFetcher<ExchangeRatesClient>, command: Command) -> String {
    match command {
        Command::Start => START_TEXT.to_string(),
        Command::List(base) => {
            let base = base.unwrap_or_else(|| fetcher.default_base().to_string());
            match fetcher.latest(Some(&base)).await {
                Ok(rates) => {
                    let source_url = fetcher.source().latest_url(&base);
                    format_rates(&base, &rates, &source_url, fetcher.default_base())
                }
                Err(e) => usage_after_error(e, LIST_USAGE),
            }
        }
        Command::Exchange { amount, from, to } => {
            match fetcher.exchange(amount, &from, &to).await {
                Ok(conversion) => conversion.to_string(),
                Err(e) => usage_after_error(e, EXCHANGE_USAGE),
            }
        }
        Command::History { from, to, days } => {
            let today = Utc::now().date_naive();
            match fetcher.history(&from, &to, days, today).await {
                Ok(points) => {
                    let label = format!("{} to {} rates", from, to);
                    render_history(&points, &label).unwrap_or_else(|| HISTORY_USAGE.to_string())
                }
                Err(e) => usage_after_error(e, HISTORY_USAGE),
            }
        }
    }
}

fn usage_after_error(error: FetchError, usage: &'static str) -> String {
    warn!(error = %error, "command failed");
    usage.to_string()
}

/// Formats the `/list` reply
pub fn format_rates(base: &str, rates: &Rates, source_url: &str, default_base: &str) -> String {
    let mut out = format!("List of all available rates for {}:\n", base);
    for (currency, rate) in rates {
        out.push_str(&format!("{}: {}\n", currency, rate));
    }
    out.push_str(&format!("\nSource:\n{}", source_url));
    if base == default_base {
        out.push_str(&format!(
            "\n\nDefault currency is {}, to use custom one:\n\
             /list <valid currency code> (like /list EUR)",
            default_base
        ));
    }
    out
}
