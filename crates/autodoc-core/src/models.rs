//! Data models for extracted document fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parsed row of an invoice-like table.
///
/// Items are only retained when at least one of `value` or `qty` resolved to
/// a number; pure-text noise lines are discarded by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based sequence within the document.
    pub line_no: u32,

    /// Alphanumeric item code, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Free-text description.
    pub description: String,

    /// Quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,

    /// Unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,

    /// Line total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
}

impl LineItem {
    /// Whether the item carries at least one resolvable numeric field.
    pub fn has_numeric(&self) -> bool {
        self.value.is_some() || self.qty.is_some()
    }
}

/// Category-bucketed raw matches from the structured field parser.
///
/// This is the shape the text-acquisition collaborator reports alongside raw
/// text, and the input to the confidence scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredData {
    /// Normalized phone numbers, in document order.
    #[serde(default)]
    pub phone_numbers: Vec<String>,

    /// Email addresses, deduplicated preserving first occurrence.
    #[serde(default)]
    pub emails: Vec<String>,

    /// Normalized vehicle plates, in document order.
    #[serde(default)]
    pub vehicle_plates: Vec<String>,

    /// Vehicle makes, deduplicated preserving first occurrence.
    #[serde(default)]
    pub vehicle_makes: Vec<String>,

    /// Raw currency-amount strings, in document order.
    #[serde(default)]
    pub amounts: Vec<String>,

    /// Service-domain keywords present in the text, in vocabulary order.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Line items found by the table extractor.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl StructuredData {
    /// Whether no category produced any match.
    pub fn is_empty(&self) -> bool {
        self.phone_numbers.is_empty()
            && self.emails.is_empty()
            && self.vehicle_plates.is_empty()
            && self.vehicle_makes.is_empty()
            && self.amounts.is_empty()
            && self.keywords.is_empty()
            && self.items.is_empty()
    }
}

/// A matched service template with its duration estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMatch {
    /// Template name, e.g. "Oil Change".
    pub name: String,
    /// Estimated duration in minutes.
    pub estimated_minutes: u32,
}

/// The orchestrator's output record.
///
/// Every field is optional; a field that could not be resolved is `None` and
/// is omitted from serialized output. Absence, not null, signals "not found".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Monetary total, normalized to a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Document date as it appeared in the text; never parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Name of the best-matching service template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_service: Option<String>,

    /// Duration estimate from the matched template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_no: Option<String>,

    /// Labeled net amount as a raw numeric string, commas stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_value: Option<String>,

    /// Labeled VAT amount as a raw numeric string, commas stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<String>,

    /// Labeled gross amount as a raw numeric string, commas stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_value: Option<String>,

    /// Normalized line items with 1-based `line_no`.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub items: Vec<LineItem>,

    /// Category-level matches merged from the collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredData>,

    /// Truncated copy of the source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// 0-100 heuristic score over category-level presence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_overall: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_omitted_from_json() {
        let fields = InvoiceFields {
            plate_number: Some("T123ABC".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&fields).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.get("plate_number").unwrap(), "T123ABC");
        assert!(!obj.contains_key("customer_name"));
        assert!(!obj.contains_key("amount"));
        assert!(!obj.contains_key("items"));
    }

    #[test]
    fn test_line_item_numeric_gate() {
        let noise = LineItem {
            line_no: 1,
            description: "Thank you for your business".to_string(),
            ..Default::default()
        };
        assert!(!noise.has_numeric());

        let item = LineItem {
            line_no: 1,
            qty: Some(Decimal::from(2)),
            ..Default::default()
        };
        assert!(item.has_numeric());
    }

    #[test]
    fn test_structured_data_empty() {
        assert!(StructuredData::default().is_empty());

        let data = StructuredData {
            emails: vec!["a@b.co".to_string()],
            ..Default::default()
        };
        assert!(!data.is_empty());
    }
}
