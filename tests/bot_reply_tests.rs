use std::sync::{Arc, Mutex};

use chrono::Local;
use spendbook::bot::{REPLY_BALANCE_PREFIX, REPLY_ERROR, REPLY_UPDATED, reply_for};
use spendbook::cloud_adapters::{Cell, MemorySheetAdapter, SheetsService, SpreadsheetError};
use spendbook::core::{LedgerBook, UNKNOWN_COMMAND, resolve};
use spendbook::telegram::{Chat, Message};

#[derive(Clone, Default)]
struct SharedAdapter(Arc<Mutex<MemorySheetAdapter>>);

impl SharedAdapter {
    fn seed(&self, range: &str, rows: Vec<Vec<Cell>>) {
        self.0.lock().unwrap().write_range(range, rows).unwrap();
    }
}

impl SheetsService for SharedAdapter {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Cell>>, SpreadsheetError> {
        self.0.lock().unwrap().read_range(range)
    }

    fn write_range(
        &mut self,
        range: &str,
        rows: Vec<Vec<Cell>>,
    ) -> Result<u32, SpreadsheetError> {
        self.0.lock().unwrap().write_range(range, rows)
    }
}

fn message(text: &str) -> Message {
    Message {
        message_id: 5,
        chat: Chat { id: 7 },
        text: Some(text.to_string()),
    }
}

#[test]
fn expense_message_is_confirmed_with_daily_balance() {
    let adapter = SharedAdapter::default();
    let today = resolve(Local::now().date_naive());
    adapter.seed(&today.daily_balance_range(), vec![vec!["500".into()]]);
    let book = LedgerBook::new(adapter);

    let reply = reply_for(&book, &message("coffee 3"));

    assert_eq!(reply.text, format!("{REPLY_BALANCE_PREFIX}500"));
    assert_eq!(reply.reply_to, Some(5));
}

#[test]
fn expense_message_falls_back_to_plain_confirmation() {
    // Daily balance cell not populated: the update still succeeds.
    let book = LedgerBook::new(SharedAdapter::default());

    let reply = reply_for(&book, &message("coffee 3"));

    assert_eq!(reply.text, REPLY_UPDATED);
    assert_eq!(reply.reply_to, Some(5));
}

#[test]
fn balance_command_answers_without_quoting() {
    let adapter = SharedAdapter::default();
    let today = resolve(Local::now().date_naive());
    adapter.seed(&today.monthly_balance_range(), vec![vec!["20 000".into()]]);
    let book = LedgerBook::new(adapter);

    let reply = reply_for(&book, &message("/mb"));

    assert_eq!(reply.text, "20 000");
    assert_eq!(reply.reply_to, None);
}

#[test]
fn unknown_command_is_answered_verbatim() {
    let book = LedgerBook::new(SharedAdapter::default());

    let reply = reply_for(&book, &message("/help"));

    assert_eq!(reply.text, UNKNOWN_COMMAND);
    assert_eq!(reply.reply_to, None);
}

#[test]
fn failures_produce_the_fixed_error_reply() {
    struct FailingService;

    impl SheetsService for FailingService {
        fn read_range(&self, _range: &str) -> Result<Vec<Vec<Cell>>, SpreadsheetError> {
            Err(SpreadsheetError::ReadFailed("offline".into()))
        }

        fn write_range(
            &mut self,
            _range: &str,
            _rows: Vec<Vec<Cell>>,
        ) -> Result<u32, SpreadsheetError> {
            Err(SpreadsheetError::WriteFailed("offline".into()))
        }
    }

    let book = LedgerBook::new(FailingService);

    assert_eq!(reply_for(&book, &message("coffee 3")).text, REPLY_ERROR);
    assert_eq!(reply_for(&book, &message("/db")).text, REPLY_ERROR);
}
