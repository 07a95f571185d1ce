//! Read-merge-write protocol against the spreadsheet ledger.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::cloud_adapters::{Cell, SheetsService, SpreadsheetError};

use super::calendar::{self, SheetAddress};
use super::merge::{DayCell, merge};
use super::parse::parse_entry;

/// Reply text for commands the book does not know.
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Errors surfaced by the book to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The remote read failed; nothing was changed.
    RemoteRead(SpreadsheetError),
    /// The remote write failed after a successful read and merge.
    RemoteWrite(SpreadsheetError),
    /// A successfully read cell did not have the expected shape.
    MalformedCell(String),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::RemoteRead(e) => write!(f, "ledger read failed: {e}"),
            LedgerError::RemoteWrite(e) => write!(f, "ledger write failed: {e}"),
            LedgerError::MalformedCell(e) => write!(f, "malformed ledger cell: {e}"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::RemoteRead(e) | LedgerError::RemoteWrite(e) => Some(e),
            LedgerError::MalformedCell(_) => None,
        }
    }
}

/// The read-only balance lookups the book supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceKind {
    Daily,
    Monthly,
    MonthlyAccumulation,
}

impl BalanceKind {
    /// Maps a chat command to a balance lookup.
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "db" => Some(BalanceKind::Daily),
            "mb" => Some(BalanceKind::Monthly),
            "ma" => Some(BalanceKind::MonthlyAccumulation),
            _ => None,
        }
    }

    fn range(self, address: SheetAddress) -> String {
        match self {
            BalanceKind::Daily => address.daily_balance_range(),
            BalanceKind::Monthly => address.monthly_balance_range(),
            BalanceKind::MonthlyAccumulation => address.accumulation_range(),
        }
    }
}

/// Records expenses into the spreadsheet and answers balance queries.
///
/// The remote service offers no transaction primitive, so the
/// read-merge-write sequence for a day is serialized behind a mutex keyed by
/// the resolved range. Two writers for the same day queue up instead of
/// overwriting each other's merge.
pub struct LedgerBook<S: SheetsService> {
    service: Mutex<S>,
    day_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: SheetsService> LedgerBook<S> {
    pub fn new(service: S) -> Self {
        Self {
            service: Mutex::new(service),
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Records a free-text expense message under today's date and returns
    /// the number of cells the service reports as updated.
    pub fn apply_entry(&self, text: &str) -> Result<u32, LedgerError> {
        self.apply_entry_on(Local::now().date_naive(), text)
    }

    /// As [`apply_entry`](Self::apply_entry), for an explicit date.
    pub fn apply_entry_on(&self, date: NaiveDate, text: &str) -> Result<u32, LedgerError> {
        let range = calendar::resolve(date).entry_range();
        let slot = self.lock_for(&range);
        let _guard = slot.lock().expect("day mutex poisoned");

        let rows = self
            .service
            .lock()
            .expect("service mutex poisoned")
            .read_range(&range)
            .map_err(LedgerError::RemoteRead)?;
        let current = day_cell_from_rows(rows)?;
        let entry = parse_entry(text);
        let merged = merge(&entry, current.as_ref());
        debug!(range, key = %merged.key, value = merged.value, "Updating entry");
        self.service
            .lock()
            .expect("service mutex poisoned")
            .write_range(
                &range,
                vec![vec![Cell::Text(merged.key), Cell::Number(merged.value)]],
            )
            .map_err(LedgerError::RemoteWrite)
    }

    /// Answers a balance command (`db`, `mb`, `ma`) with the raw text of the
    /// matching cell. Unknown commands yield [`UNKNOWN_COMMAND`] without
    /// touching the service.
    pub fn query_balance(&self, command: &str) -> Result<String, LedgerError> {
        self.query_balance_on(Local::now().date_naive(), command)
    }

    /// As [`query_balance`](Self::query_balance), for an explicit date.
    pub fn query_balance_on(&self, date: NaiveDate, command: &str) -> Result<String, LedgerError> {
        let Some(kind) = BalanceKind::from_command(command) else {
            return Ok(UNKNOWN_COMMAND.to_string());
        };
        let range = kind.range(calendar::resolve(date));
        let rows = self
            .service
            .lock()
            .expect("service mutex poisoned")
            .read_range(&range)
            .map_err(LedgerError::RemoteRead)?;
        rows.first()
            .and_then(|row| row.first())
            .and_then(Cell::to_text)
            .ok_or_else(|| LedgerError::MalformedCell(format!("no balance value at {range}")))
    }

    fn lock_for(&self, range: &str) -> Arc<Mutex<()>> {
        let mut locks = self.day_locks.lock().expect("lock table mutex poisoned");
        locks.entry(range.to_string()).or_default().clone()
    }
}

fn day_cell_from_rows(rows: Vec<Vec<Cell>>) -> Result<Option<DayCell>, LedgerError> {
    let Some(row) = rows.into_iter().next() else {
        return Ok(None);
    };
    if row.len() < 2 {
        return Err(LedgerError::MalformedCell(format!(
            "entry row has {} cells, expected 2",
            row.len()
        )));
    }
    let key = row[0]
        .to_text()
        .ok_or_else(|| LedgerError::MalformedCell("entry key cell is empty".into()))?;
    let value = row[1]
        .to_text()
        .ok_or_else(|| LedgerError::MalformedCell("entry value cell is empty".into()))?;
    Ok(Some(DayCell::new(key, value)))
}
