//! Structured field parsing over raw document text.
//!
//! Runs the fixed category battery (phones, emails, plates, makes, amounts,
//! keywords) and provides the normalization helpers shared by the rest of
//! the extraction pipeline. Everything here is pure text-in, data-out.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::StructuredData;

use super::items::extract_line_items;
use super::patterns::*;

/// Parse raw text into category-bucketed structured data.
///
/// Empty or whitespace-only text yields an empty record.
pub fn parse_structured(text: &str) -> StructuredData {
    if text.trim().is_empty() {
        return StructuredData::default();
    }

    let phone_numbers: Vec<String> = PHONE
        .find_iter(text)
        .map(|m| clean_phone(m.as_str()))
        .filter(|p| !p.is_empty())
        .collect();

    let emails = dedup_preserving_order(
        EMAIL.find_iter(text).map(|m| m.as_str().to_string()),
    );

    let vehicle_plates: Vec<String> = PLATE
        .find_iter(text)
        .map(|m| normalize_plate(m.as_str()))
        .filter(|p| !p.is_empty())
        .collect();

    let vehicle_makes = dedup_preserving_order(
        VEHICLE_MAKE.find_iter(text).map(|m| m.as_str().to_string()),
    );

    let amounts: Vec<String> = CURRENCY_AMOUNT
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|a| a.chars().any(|c| c.is_ascii_digit()))
        .collect();

    StructuredData {
        phone_numbers,
        emails,
        vehicle_plates,
        vehicle_makes,
        amounts,
        keywords: extract_keywords(text),
        items: extract_line_items(text),
    }
}

/// Normalize a phone number: strip everything but digits and a leading `+`.
pub fn clean_phone(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            out.push(c);
        }
    }
    out
}

/// Normalize a vehicle plate: uppercase and strip non-alphanumerics.
///
/// The result is stable under repeated normalization.
pub fn normalize_plate(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Format a normalized plate for display, separating the letter prefix,
/// digit run, and trailing letters with single spaces. Plates that do not
/// fit the prefix/digits/suffix shape are returned stripped but unspaced.
pub fn format_plate(raw: &str) -> String {
    let stripped = normalize_plate(raw);
    match PLATE_CANONICAL.captures(&stripped) {
        Some(caps) => {
            let suffix = &caps[3];
            if suffix.is_empty() {
                format!("{} {}", &caps[1], &caps[2])
            } else {
                format!("{} {} {}", &caps[1], &caps[2], suffix)
            }
        }
        None => stripped,
    }
}

/// Parse a monetary amount from free text.
///
/// Strips letters, currency symbols, and whitespace; a parenthesized value
/// becomes negative. Returns the first decimal number found, or `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let negative = {
        let open = raw.find('(');
        let close = raw.rfind(')');
        matches!((open, close), (Some(o), Some(c)) if o < c)
    };

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let cleaned = cleaned.trim_start_matches('-');

    // First decimal run in the cleaned string
    let token = DECIMAL_TOKEN.find(cleaned)?;
    let mut value = Decimal::from_str(&token.as_str().replace(',', "")).ok()?;
    if negative {
        value.set_sign_negative(true);
    }
    Some(value)
}

/// Case-insensitive keyword scan against the fixed service vocabulary.
///
/// Returns the subset present, in vocabulary order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SERVICE_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// The first line of text containing any of the discovered keywords becomes
/// the candidate service description.
pub fn service_description_line(text: &str) -> Option<String> {
    let keywords = extract_keywords(text);
    if keywords.is_empty() {
        return None;
    }

    text.lines()
        .map(str::trim)
        .find(|line| {
            let lower = line.to_lowercase();
            keywords.iter().any(|kw| lower.contains(kw.as_str()))
        })
        .map(str::to_string)
}

/// Guess the customer name: a labeled customer line anywhere in the text
/// wins, else the first line of plausible length among the opening lines
/// whose leading characters contain no digit.
pub fn guess_customer_name(text: &str) -> Option<String> {
    if let Some(caps) = CUSTOMER_LINE.captures(text) {
        let name = caps[1].trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    text.lines()
        .take(5)
        .map(str::trim)
        .find(|line| {
            line.len() > 4
                && line.len() < 100
                && !line.chars().take(10).any(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
}

/// Extract a labeled quantity value (e.g. "Qty: 4").
pub fn extract_quantity(text: &str) -> Option<String> {
    QUANTITY_LABELED
        .captures(text)
        .map(|caps| caps[1].to_string())
}

fn dedup_preserving_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_phone() {
        assert_eq!(clean_phone("+255 754-123 456"), "+255754123456");
        assert_eq!(clean_phone("0712 345 678"), "0712345678");
        assert_eq!(clean_phone("tel: 0712"), "0712");
    }

    #[test]
    fn test_normalize_plate_idempotent() {
        assert_eq!(normalize_plate("t 123 abc"), "T123ABC");
        assert_eq!(normalize_plate("T123ABC"), "T123ABC");
        assert_eq!(
            normalize_plate(&normalize_plate("t-123-abc")),
            normalize_plate("t-123-abc")
        );
    }

    #[test]
    fn test_format_plate() {
        assert_eq!(format_plate("t123abc"), "T 123 ABC");
        assert_eq!(format_plate("ABC123"), "ABC 123");
        assert_eq!(format_plate("123ABC"), "123ABC");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("TSH 12,345.50"),
            Some(Decimal::from_str("12345.50").unwrap())
        );
        assert_eq!(parse_amount("(500)"), Some(Decimal::from(-500)));
        assert_eq!(parse_amount("no digits"), None);
        assert_eq!(parse_amount("$ 1,000"), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_extract_keywords_ordered() {
        let text = "Full brake inspection and oil change";
        assert_eq!(
            extract_keywords(text),
            vec!["oil", "brake", "inspection", "change"]
        );
    }

    #[test]
    fn test_service_description_line() {
        let text = "ACME Motors\nInvoice 42\nOil change and filter\nTotal: 5000";
        assert_eq!(
            service_description_line(text),
            Some("Oil change and filter".to_string())
        );
        assert_eq!(service_description_line("plain words only"), None);
    }

    #[test]
    fn test_parse_structured_empty_text() {
        assert!(parse_structured("").is_empty());
        assert!(parse_structured("   \n\t  ").is_empty());
    }

    #[test]
    fn test_parse_structured_categories() {
        let text = "Customer: John Doe\n\
                    Phone: 0712 345 678\n\
                    Email: john@example.com, john@example.com\n\
                    Vehicle: Toyota T 123 ABC\n\
                    Oil change service\n\
                    Total: TSH 25,000";

        let data = parse_structured(text);

        assert!(data.phone_numbers.contains(&"0712345678".to_string()));
        // Duplicate email collapses to one entry
        assert_eq!(data.emails, vec!["john@example.com"]);
        assert!(data.vehicle_plates.contains(&"T123ABC".to_string()));
        assert_eq!(data.vehicle_makes, vec!["Toyota"]);
        assert!(!data.amounts.is_empty());
        assert!(data.keywords.contains(&"oil".to_string()));
    }

    #[test]
    fn test_guess_customer_name() {
        let text = "ACME Garage Ltd\n123 Side Street\nBill: 5000";
        assert_eq!(guess_customer_name(text), Some("ACME Garage Ltd".to_string()));
        assert_eq!(guess_customer_name("42\n77"), None);
    }

    #[test]
    fn test_guess_customer_name_prefers_labeled_line() {
        let text = "Speedy Garage Workshop\nBill To: Jane Roe\nTotal: 5000";
        assert_eq!(guess_customer_name(text), Some("Jane Roe".to_string()));
    }

    #[test]
    fn test_extract_quantity() {
        assert_eq!(extract_quantity("Qty: 4"), Some("4".to_string()));
        assert_eq!(extract_quantity("quantity = 12"), Some("12".to_string()));
        assert_eq!(extract_quantity("no amounts here"), None);
    }
}
