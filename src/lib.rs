//! spendbook
//!
//! A Telegram bot that records free-text expense messages into a Google
//! Sheets budget ledger and answers balance queries against it.

pub mod bot;
pub mod cloud_adapters;
pub mod config;
pub mod core;
pub mod telegram;
