//! Adapters for the spreadsheet service that stores the ledger.

pub mod auth;
pub mod google_sheets;

use std::collections::HashMap;

pub use google_sheets::GoogleSheetsAdapter;

/// A single spreadsheet cell as returned by the remote service. Upstream
/// formula evaluation means a cell may arrive as text or as a number; the
/// distinction is kept explicit so callers never guess at runtime types.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Normalized textual form of the cell, `None` when it is empty.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Errors surfaced by a spreadsheet service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetError {
    /// Fetching a range failed: the service was unreachable or rejected the
    /// range.
    ReadFailed(String),
    /// Writing a range failed at the transport or permission level.
    WriteFailed(String),
}

impl std::fmt::Display for SpreadsheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadsheetError::ReadFailed(e) => write!(f, "read failed: {e}"),
            SpreadsheetError::WriteFailed(e) => write!(f, "write failed: {e}"),
        }
    }
}

impl std::error::Error for SpreadsheetError {}

/// Abstraction over the spreadsheet service holding the ledger. Ranges use
/// the service's own `"{sheet}!{col}{row}"` notation.
pub trait SheetsService {
    /// Reads the cells at `range`; an unpopulated range yields no rows.
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Cell>>, SpreadsheetError>;
    /// Overwrites the cells at `range` and returns how many cells the
    /// service reports as updated.
    fn write_range(
        &mut self,
        range: &str,
        rows: Vec<Vec<Cell>>,
    ) -> Result<u32, SpreadsheetError>;
}

/// In-memory service keyed by range string. Used by tests and as a dry-run
/// backend.
#[derive(Default)]
pub struct MemorySheetAdapter {
    ranges: HashMap<String, Vec<Vec<Cell>>>,
}

impl MemorySheetAdapter {
    /// Creates a new empty adapter.
    pub fn new() -> Self {
        Self {
            ranges: HashMap::new(),
        }
    }
}

impl SheetsService for MemorySheetAdapter {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Cell>>, SpreadsheetError> {
        Ok(self.ranges.get(range).cloned().unwrap_or_default())
    }

    fn write_range(
        &mut self,
        range: &str,
        rows: Vec<Vec<Cell>>,
    ) -> Result<u32, SpreadsheetError> {
        let cells = rows.iter().map(|row| row.len() as u32).sum();
        self.ranges.insert(range.to_string(), rows);
        Ok(cells)
    }
}
