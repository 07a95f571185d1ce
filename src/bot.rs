//! Long-poll loop connecting Telegram chat to the ledger book.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::cloud_adapters::SheetsService;
use crate::core::LedgerBook;
use crate::telegram::{BotClient, Message, TelegramError};

/// Fixed reply when an update or lookup fails.
pub const REPLY_ERROR: &str = "Произошла ошибка";
/// Confirmation used when the daily balance cell cannot be read back.
pub const REPLY_UPDATED: &str = "Баланс обновлен";
/// Prefix of the confirmation quoting the day's remaining balance.
pub const REPLY_BALANCE_PREFIX: &str = "Остаток на день ";

const POLL_TIMEOUT_SECS: u64 = 60;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// A composed reply: its text, and the message it quotes, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub reply_to: Option<i64>,
}

/// Computes the reply for one inbound message. Commands are answered with
/// the requested balance; anything else is recorded as an expense entry and
/// confirmed with the day's remaining balance.
pub fn reply_for<S: SheetsService>(book: &LedgerBook<S>, message: &Message) -> Reply {
    if let Some(command) = message.command() {
        let text = match book.query_balance(command) {
            Ok(balance) => balance,
            Err(e) => {
                error!(command, error = %e, "Balance query failed");
                REPLY_ERROR.to_string()
            }
        };
        return Reply {
            text,
            reply_to: None,
        };
    }

    let text = message.text.as_deref().unwrap_or("");
    match book.apply_entry(text) {
        Ok(_) => {
            let text = match book.query_balance("db") {
                Ok(balance) => format!("{REPLY_BALANCE_PREFIX}{balance}"),
                Err(_) => REPLY_UPDATED.to_string(),
            };
            Reply {
                text,
                reply_to: Some(message.message_id),
            }
        }
        Err(e) => {
            error!(error = %e, "Entry update failed");
            Reply {
                text: REPLY_ERROR.to_string(),
                reply_to: None,
            }
        }
    }
}

/// The running bot: a Telegram client plus the ledger book it serves.
pub struct ExpenseBot<S: SheetsService> {
    client: BotClient,
    book: LedgerBook<S>,
}

impl<S: SheetsService> ExpenseBot<S> {
    pub fn new(client: BotClient, book: LedgerBook<S>) -> Self {
        Self { client, book }
    }

    /// Polls for updates and answers them, one message at a time, in
    /// arrival order. Only a failing `getMe` aborts; polling errors are
    /// logged and retried.
    pub fn run(&self) -> Result<(), TelegramError> {
        let me = self.client.get_me()?;
        let username = me.username.as_deref().unwrap_or("");
        info!(username, id = me.id, "Authorized");

        let mut offset = 0i64;
        loop {
            let updates = match self.client.get_updates(offset, POLL_TIMEOUT_SECS) {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "Polling failed");
                    std::thread::sleep(POLL_RETRY_DELAY);
                    continue;
                }
            };
            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(message) = update.message else {
                    continue;
                };
                let reply = reply_for(&self.book, &message);
                info!(chat = message.chat.id, reply = %reply.text, "Replying");
                let sent = self
                    .client
                    .send_message(message.chat.id, &reply.text, reply.reply_to);
                if let Err(e) = sent {
                    warn!(error = %e, chat = message.chat.id, "Sending reply failed");
                }
            }
        }
    }
}
