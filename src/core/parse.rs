//! Splits a free-text chat message into a description and an amount.

/// One inbound message reduced to a description and the summed amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    /// Non-numeric tokens of the message, comma-joined in original order.
    pub description: String,
    /// Sum of every numeric token; zero when the message has none.
    pub amount: f64,
}

/// Parses a raw message. Every whitespace-separated token that reads as a
/// decimal number is added to the amount, everything else becomes part of the
/// description. Never fails.
pub fn parse_entry(input: &str) -> ParsedEntry {
    let mut amount = 0.0;
    let mut description: Vec<&str> = Vec::new();
    for word in input.split_whitespace() {
        match word.parse::<f64>() {
            Ok(value) => amount += value,
            Err(_) => description.push(word),
        }
    }
    ParsedEntry {
        description: description.join(", "),
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_multiple_amounts() {
        let entry = parse_entry("coffee 3 tip 1");
        assert_eq!(entry.description, "coffee, tip");
        assert_eq!(entry.amount, 4.0);
    }

    #[test]
    fn message_without_amount_defaults_to_zero() {
        let entry = parse_entry("lunch");
        assert_eq!(entry.description, "lunch");
        assert_eq!(entry.amount, 0.0);
    }

    #[test]
    fn accepts_signs_and_fractions() {
        let entry = parse_entry("refund -2.5 fee +0.5");
        assert_eq!(entry.description, "refund, fee");
        assert_eq!(entry.amount, -2.0);
    }

    #[test]
    fn empty_message_parses_to_empty_entry() {
        let entry = parse_entry("");
        assert_eq!(entry.description, "");
        assert_eq!(entry.amount, 0.0);
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let entry = parse_entry("  bus   12\tmetro 8 ");
        assert_eq!(entry.description, "bus, metro");
        assert_eq!(entry.amount, 20.0);
    }
}
