//! ratebot library
//!
//! Exposes the rate cache, the rate fetching layer, command parsing and the
//! Telegram front end for use by the binary and integration tests.

pub mod bot;
pub mod cache;
pub mod chart;
pub mod cli;
pub mod command;
pub mod data;
