//! Heuristic line-item extraction from invoice-like text.
//!
//! Invoices carry no fixed column layout across vendors, so items are
//! recovered positionally: the numeric tokens closest to the end of a line
//! are taken as value / rate / qty, and a two-line lookahead window recovers
//! line-wrapped tables. The final filter drops candidates that never
//! resolved a numeric value.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use crate::models::LineItem;

use super::patterns::{ITEM_CODE, NOISE_PREFIXES};

lazy_static! {
    // Standalone numbers only; digits embedded in alphanumeric tokens
    // (item codes like "A001") stay invisible here.
    static ref NUMERIC_TOKEN: Regex = Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").unwrap();
}

/// Segment free text into candidate invoice line items.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut items = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if is_noise_line(line) {
            continue;
        }
        if !is_candidate(line) {
            continue;
        }

        let code = extract_code(line);

        // Numbers on the line itself, widening to the next two lines when
        // the line has none of its own.
        let mut numbers = numeric_tokens(line);
        if numbers.is_empty() {
            let window = lines[idx..lines.len().min(idx + 3)].join(" ");
            numbers = numeric_tokens(&window);
            if !numbers.is_empty() {
                trace!("line {} resolved numbers from lookahead window", idx + 1);
            }
        }

        let n = numbers.len();
        let value = numbers.last().copied();
        let rate = if n >= 2 { Some(numbers[n - 2]) } else { None };
        let qty = if n >= 3 { Some(numbers[n - 3]) } else { None };

        items.push(LineItem {
            line_no: 0, // assigned after filtering
            description: description_of(line, code.as_deref()),
            code,
            qty,
            rate,
            value,
        });
    }

    // Pure-text noise lines never resolve a number and are dropped here.
    let mut items: Vec<LineItem> = items.into_iter().filter(LineItem::has_numeric).collect();
    for (i, item) in items.iter_mut().enumerate() {
        item.line_no = (i + 1) as u32;
    }
    items
}

fn is_noise_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    NOISE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// A line-item candidate needs at least one letter and one digit.
fn is_candidate(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_alphabetic()) && line.chars().any(|c| c.is_ascii_digit())
}

/// Leading alphanumeric token, kept as an item code when it carries a digit.
fn extract_code(line: &str) -> Option<String> {
    let token = ITEM_CODE.captures(line)?.get(1)?.as_str();
    if token.chars().any(|c| c.is_ascii_digit()) {
        Some(token.to_string())
    } else {
        None
    }
}

fn numeric_tokens(text: &str) -> Vec<Decimal> {
    NUMERIC_TOKEN
        .find_iter(text)
        .filter_map(|m| Decimal::from_str(&m.as_str().replace(',', "")).ok())
        .collect()
}

fn description_of(line: &str, code: Option<&str>) -> String {
    let without_code = match code {
        Some(c) => line.strip_prefix(c).unwrap_or(line),
        None => line,
    };
    let without_numbers = NUMERIC_TOKEN.replace_all(without_code, "");
    let collapsed = without_numbers.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        line.to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positional_assignment() {
        let items = extract_line_items("A001 Brake Pad Set 2 15000 30000");

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.code.as_deref(), Some("A001"));
        assert_eq!(item.description, "Brake Pad Set");
        assert_eq!(item.qty, Some(Decimal::from(2)));
        assert_eq!(item.rate, Some(Decimal::from(15000)));
        assert_eq!(item.value, Some(Decimal::from(30000)));
        assert_eq!(item.line_no, 1);
    }

    #[test]
    fn test_letters_only_line_never_a_candidate() {
        let items = extract_line_items("Thank you for your business");
        assert!(items.is_empty());
    }

    #[test]
    fn test_unresolvable_candidate_dropped() {
        // Digit is embedded in a token, and the lookahead window holds no
        // standalone numbers either.
        let items = extract_line_items("Washer x4 assembly\nno further data\nnothing here");
        assert!(items.is_empty());
    }

    #[test]
    fn test_lookahead_recovers_wrapped_line() {
        let text = "Filter kit FK9\n4 1200 4800\nrandom footer";
        let items = extract_line_items(text);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty, Some(Decimal::from(4)));
        assert_eq!(items[0].rate, Some(Decimal::from(1200)));
        assert_eq!(items[0].value, Some(Decimal::from(4800)));
    }

    #[test]
    fn test_noise_prefixes_skipped() {
        let text = "Invoice No: 12345\nTel: 0712 345 678\nPage 1 of 2\nA77 Coolant 1 9000 9000";
        let items = extract_line_items(text);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code.as_deref(), Some("A77"));
    }

    #[test]
    fn test_single_number_is_value_only() {
        let items = extract_line_items("Wiper blades 4500");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, Some(Decimal::from(4500)));
        assert_eq!(items[0].rate, None);
        assert_eq!(items[0].qty, None);
    }

    #[test]
    fn test_line_numbers_sequential() {
        let text = "A1 Oil filter 1 3000 3000\nB2 Air filter 1 5000 5000";
        let items = extract_line_items(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_no, 1);
        assert_eq!(items[1].line_no, 2);
    }
}
