//! Common regex patterns for service-invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Fixed vocabulary of service-domain terms for keyword extraction.
pub const SERVICE_KEYWORDS: [&str; 20] = [
    "service",
    "maintenance",
    "repair",
    "tire",
    "tyre",
    "oil",
    "brake",
    "battery",
    "alignment",
    "inspection",
    "diagnostic",
    "installation",
    "replacement",
    "change",
    "wash",
    "balance",
    "rotation",
    "check",
    "engine",
    "transmission",
];

/// Header/noise prefixes skipped by the line-item extractor.
pub const NOISE_PREFIXES: [&str; 10] = [
    "proforma", "invoice", "customer", "address", "tel", "fax", "email", "tax", "vat", "page",
];

lazy_static! {
    // Contact details
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+\d{1,3}[-.\s]?)?\d{3,4}[-.\s]?\d{3,4}[-.\s]?\d{3,4}"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    // Vehicle identification
    pub static ref PLATE: Regex = Regex::new(
        r"[A-Z]{1,3}[-\s]?\d{2,4}[-\s]?[A-Z]{2,3}|\d{2,4}[-\s]?[A-Z]{2,4}"
    ).unwrap();

    pub static ref VEHICLE_MAKE: Regex = Regex::new(
        r"\b(Toyota|Honda|Ford|BMW|Mercedes|Audi|Hyundai|KIA|Nissan|Chevrolet|Volkswagen|Mazda|Lexus|Jeep|Suzuki)\b"
    ).unwrap();

    // A canonical stripped plate: letter prefix, digit run, optional suffix
    pub static ref PLATE_CANONICAL: Regex = Regex::new(
        r"^([A-Z]+)(\d+)([A-Z]*)$"
    ).unwrap();

    // Money
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"(?:TSH|TZS|USD|\$|SAR|AED|KWD|QAR|OMR|BHD)?\s*\d[\d,]*\.?\d*"
    ).unwrap();

    pub static ref DECIMAL_TOKEN: Regex = Regex::new(
        r"\d[\d,]*(?:\.\d+)?"
    ).unwrap();

    // Invoice headers
    pub static ref DATE: Regex = Regex::new(
        r"\b(\d{1,2}[./-]\d{1,2}[./-]\d{2,4}|\d{4}[./-]\d{1,2}[./-]\d{1,2})\b"
    ).unwrap();

    pub static ref CUSTOMER_LINE: Regex = Regex::new(
        r"(?im)^\s*(?:customer|client|bill\s*to|m/s)[\s:.-]*(.+)$"
    ).unwrap();

    // Labeled totals
    pub static ref VAT_AMOUNT: Regex = Regex::new(
        r"(?i)vat(?:\s*(?:amount|\d+\s*%))?\s*[:\-]?\s*([\d,]+(?:\.\d+)?)"
    ).unwrap();

    pub static ref NET_VALUE: Regex = Regex::new(
        r"(?i)net(?:\s*(?:value|amount|total))?\s*[:\-]?\s*([\d,]+(?:\.\d+)?)"
    ).unwrap();

    pub static ref GROSS_VALUE: Regex = Regex::new(
        r"(?i)gross(?:\s*(?:value|amount|total))?\s*[:\-]?\s*([\d,]+(?:\.\d+)?)"
    ).unwrap();

    // Enrichment fields
    pub static ref CODE_NO: Regex = Regex::new(
        r"(?i)Code\s*No\s*[:\-]?\s*([A-Z0-9-]+)"
    ).unwrap();

    // Space (not \s) in the classes so a reference never bleeds across lines
    pub static ref REFERENCE: Regex = Regex::new(
        r"(?i)Reference\s*[:\-]?\s*([A-Z0-9 -]{3,30})"
    ).unwrap();

    pub static ref REFERENCE_FOR: Regex = Regex::new(
        r"FOR\s+([A-Z0-9 ]+)"
    ).unwrap();

    // Quantities with an explicit label
    pub static ref QUANTITY_LABELED: Regex = Regex::new(
        r"(?i)(?:qty|quantity|q\.?t\.?y\.?|count)[\s:=]+(\d+)"
    ).unwrap();

    // Line-item code token at the start of a candidate line
    pub static ref ITEM_CODE: Regex = Regex::new(
        r"^([A-Za-z0-9][A-Za-z0-9/-]*)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE.is_match("0712 345 678"));
        assert!(PHONE.is_match("+255 754 123 456"));
        assert!(PHONE.is_match("0712-345-678"));
    }

    #[test]
    fn test_plate_pattern() {
        assert!(PLATE.is_match("T 123 ABC"));
        assert!(PLATE.is_match("AB-1234-CD"));
        assert!(PLATE.is_match("123 ABC"));
    }

    #[test]
    fn test_reference_for_pattern() {
        let caps = REFERENCE_FOR.captures("PAYMENT FOR T123 ABC").unwrap();
        assert_eq!(caps[1].trim(), "T123 ABC");
    }

    #[test]
    fn test_code_no_pattern() {
        let caps = CODE_NO.captures("Code No: CUS-00142").unwrap();
        assert_eq!(&caps[1], "CUS-00142");

        let caps = CODE_NO.captures("CODE NO CUS-00142").unwrap();
        assert_eq!(&caps[1], "CUS-00142");
    }

    #[test]
    fn test_labeled_totals() {
        let text = "Net Value: 100,000.00\nVAT 18%: 18,000.00\nGross Value: 118,000.00";
        assert_eq!(&NET_VALUE.captures(text).unwrap()[1], "100,000.00");
        assert_eq!(&VAT_AMOUNT.captures(text).unwrap()[1], "18,000.00");
        assert_eq!(&GROSS_VALUE.captures(text).unwrap()[1], "118,000.00");
    }
}
