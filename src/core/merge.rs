//! Combines a freshly parsed entry with whatever the day's cells already
//! hold. Earlier hand-edited ledgers used `" + "` between descriptions and
//! sometimes a `SUM(...)` formula for the total; both forms are absorbed
//! here so an update never loses what was entered before.

use super::parse::ParsedEntry;

/// Existing contents of the day's entry cells, both kept as the raw text the
/// spreadsheet returned. Absence of a prior entry is `Option::None` at the
/// call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub key: String,
    pub value: String,
}

impl DayCell {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What gets written back: the combined description and the new total.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntry {
    pub key: String,
    pub value: f64,
}

/// Merges a parsed entry into the current cell contents. Pure and total:
/// malformed stored values contribute zero instead of failing the update.
pub fn merge(entry: &ParsedEntry, current: Option<&DayCell>) -> MergedEntry {
    match current {
        None => MergedEntry {
            key: entry.description.to_lowercase(),
            value: entry.amount,
        },
        Some(cell) => MergedEntry {
            key: merged_key(&entry.description, &cell.key),
            value: stored_total(&cell.value) + entry.amount,
        },
    }
}

fn merged_key(description: &str, current: &str) -> String {
    // " + " is the separator older hand-entered rows used.
    let current = current.replace(" + ", ", ");
    if description.is_empty() {
        current.to_lowercase()
    } else {
        format!("{current}, {description}").to_lowercase()
    }
}

fn stored_total(value: &str) -> f64 {
    if let Some(rest) = value.strip_prefix("SUM") {
        // A SUM(...) formula left in the cell by manual editing. Pieces that
        // do not parse are skipped rather than failing the whole merge.
        let interior = rest.trim_start_matches('(').trim_end_matches(')');
        return interior
            .split(", ")
            .filter_map(|piece| piece.parse::<f64>().ok())
            .sum();
    }
    value.replace(',', "").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse::parse_entry;

    #[test]
    fn first_entry_of_the_day() {
        let merged = merge(&parse_entry("lunch 12"), None);
        assert_eq!(merged.key, "lunch");
        assert_eq!(merged.value, 12.0);
    }

    #[test]
    fn appends_to_existing_entry() {
        let cell = DayCell::new("tea", "10");
        let merged = merge(&parse_entry("coffee 3"), Some(&cell));
        assert_eq!(merged.key, "tea, coffee");
        assert_eq!(merged.value, 13.0);
    }

    #[test]
    fn migrates_legacy_plus_separator() {
        let cell = DayCell::new("tea + snacks", "10");
        let merged = merge(&parse_entry("coffee 3"), Some(&cell));
        assert_eq!(merged.key, "tea, snacks, coffee");
        assert_eq!(merged.value, 13.0);
    }

    #[test]
    fn unwraps_sum_formula() {
        let cell = DayCell::new("bus", "SUM(2, 3)");
        let merged = merge(&parse_entry("taxi 5"), Some(&cell));
        assert_eq!(merged.key, "bus, taxi");
        assert_eq!(merged.value, 10.0);
    }

    #[test]
    fn skips_unparseable_formula_pieces() {
        let cell = DayCell::new("bus", "SUM(2, x, 3)");
        let merged = merge(&parse_entry("taxi 5"), Some(&cell));
        assert_eq!(merged.value, 10.0);
    }

    #[test]
    fn tolerates_thousands_separators() {
        let cell = DayCell::new("x", "1,000");
        let merged = merge(&parse_entry("rent 1"), Some(&cell));
        assert_eq!(merged.value, 1001.0);
    }

    #[test]
    fn empty_description_keeps_existing_key() {
        let cell = DayCell::new("tea + snacks", "5");
        let merged = merge(&parse_entry("7"), Some(&cell));
        assert_eq!(merged.key, "tea, snacks");
        assert_eq!(merged.value, 12.0);
    }

    #[test]
    fn lowercases_the_result() {
        let cell = DayCell::new("Tea", "1");
        let merged = merge(&parse_entry("Coffee 2"), Some(&cell));
        assert_eq!(merged.key, "tea, coffee");
    }

    #[test]
    fn malformed_stored_value_counts_as_zero() {
        let cell = DayCell::new("x", "oops");
        let merged = merge(&parse_entry("tea 2"), Some(&cell));
        assert_eq!(merged.value, 2.0);
    }
}
