//! Maps calendar dates onto the fixed layout of the budget spreadsheet.
//!
//! The spreadsheet has one tab per month, named in Russian, with one row per
//! day below a single header row. Changing the constants here is enough to
//! support a ledger with a different layout.

use chrono::{Datelike, NaiveDate};

/// Month tab names exactly as they appear in the spreadsheet.
pub const MONTH_SHEETS: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Rows taken up by the header at the top of every month tab.
pub const HEADER_ROWS: u32 = 1;
/// Column holding the free-text description of a day's spending.
pub const ENTRY_KEY_COLUMN: char = 'H';
/// Column holding the numeric total of a day's spending.
pub const ENTRY_VALUE_COLUMN: char = 'I';
/// Column with the per-day and per-month balance formulas.
pub const BALANCE_COLUMN: char = 'K';
/// Row of the monthly balance cell.
pub const MONTHLY_BALANCE_ROW: u32 = 33;
/// Column of the monthly accumulation cell.
pub const ACCUMULATION_COLUMN: char = 'D';
/// Row of the monthly accumulation cell.
pub const ACCUMULATION_ROW: u32 = 21;

/// A date resolved against the spreadsheet layout: month tab plus day of
/// month. All range strings are derived from this pair on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetAddress {
    /// Name of the month tab.
    pub sheet: &'static str,
    /// Calendar day of month, 1-based.
    pub day: u32,
}

/// Resolves a calendar date to its place in the spreadsheet.
pub fn resolve(date: NaiveDate) -> SheetAddress {
    SheetAddress {
        sheet: MONTH_SHEETS[date.month0() as usize],
        day: date.day(),
    }
}

impl SheetAddress {
    fn day_row(&self) -> u32 {
        self.day + HEADER_ROWS
    }

    /// Two-cell range holding the day's description and total.
    pub fn entry_range(&self) -> String {
        let row = self.day_row();
        format!(
            "{}!{}{}:{}{}",
            self.sheet, ENTRY_KEY_COLUMN, row, ENTRY_VALUE_COLUMN, row
        )
    }

    /// Cell with the remaining balance for the day.
    pub fn daily_balance_range(&self) -> String {
        format!("{}!{}{}", self.sheet, BALANCE_COLUMN, self.day_row())
    }

    /// Cell with the remaining balance for the month.
    pub fn monthly_balance_range(&self) -> String {
        format!("{}!{}{}", self.sheet, BALANCE_COLUMN, MONTHLY_BALANCE_ROW)
    }

    /// Cell with the amount accumulated over the month.
    pub fn accumulation_range(&self) -> String {
        format!("{}!{}{}", self.sheet, ACCUMULATION_COLUMN, ACCUMULATION_ROW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolves_month_tab_and_day() {
        let addr = resolve(date(2024, 8, 14));
        assert_eq!(addr.sheet, "Август");
        assert_eq!(addr.day, 14);
    }

    #[test]
    fn entry_range_offsets_past_header() {
        let addr = resolve(date(2024, 8, 14));
        assert_eq!(addr.entry_range(), "Август!H15:I15");
    }

    #[test]
    fn balance_ranges_use_fixed_cells() {
        let addr = resolve(date(2024, 8, 14));
        assert_eq!(addr.daily_balance_range(), "Август!K15");
        assert_eq!(addr.monthly_balance_range(), "Август!K33");
        assert_eq!(addr.accumulation_range(), "Август!D21");
    }

    #[test]
    fn covers_year_boundaries() {
        assert_eq!(resolve(date(2024, 1, 1)).sheet, "Январь");
        assert_eq!(resolve(date(2024, 12, 31)).sheet, "Декабрь");
        assert_eq!(resolve(date(2024, 12, 31)).entry_range(), "Декабрь!H32:I32");
    }
}
