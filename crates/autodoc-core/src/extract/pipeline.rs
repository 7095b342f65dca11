//! Extraction orchestrator.
//!
//! Sequences acquisition, rule-driven extraction, structured-data merging,
//! enrichment heuristics, line-item normalization, and confidence scoring
//! into one synchronous call per document. The caller gets either a
//! populated (possibly sparse) field record or a single error, never both.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConfigStore;
use crate::error::{AcquisitionError, Result};
use crate::models::{InvoiceFields, LineItem, StructuredData};
use crate::source::{DocumentText, TextSource};

use super::confidence::calculate_confidence;
use super::items::extract_line_items;
use super::patterns::{CODE_NO, DATE, GROSS_VALUE, NET_VALUE, REFERENCE, REFERENCE_FOR, VAT_AMOUNT};
use super::rules::RuleEngine;
use super::structured::{
    extract_quantity, guess_customer_name, normalize_plate, parse_amount,
    service_description_line,
};
use super::templates::TemplateCatalog;

/// Raw-text cap when the collaborator supplied structured data.
const RAW_TEXT_LIMIT: usize = 10_000;
/// Raw-text cap for bare-text acquisitions.
const RAW_TEXT_LIMIT_BARE: usize = 5_000;

/// One reusable extraction pipeline.
///
/// The rule engine and template catalog load their configuration on the
/// first document and reuse it for every document after that; construct the
/// pipeline once per worker and feed it documents sequentially.
pub struct ExtractionPipeline<S: TextSource> {
    source: S,
    rules: RuleEngine,
    templates: TemplateCatalog,
}

impl<S: TextSource> ExtractionPipeline<S> {
    /// Create a pipeline with built-in rules and templates only.
    pub fn new(source: S) -> Self {
        Self {
            source,
            rules: RuleEngine::with_defaults(),
            templates: TemplateCatalog::with_defaults(),
        }
    }

    /// Create a pipeline loading rules and templates from a store.
    pub fn with_store(source: S, store: Arc<dyn ConfigStore + Send + Sync>) -> Self {
        Self {
            source,
            rules: RuleEngine::new(Arc::clone(&store)),
            templates: TemplateCatalog::new(store),
        }
    }

    /// Extract every available field from one document.
    ///
    /// Acquisition failures (unsupported type, OCR disabled, unreadable or
    /// empty file) are terminal and carry no partial fields.
    pub fn process(&self, path: &Path) -> Result<InvoiceFields> {
        info!("processing document {}", path.display());
        let doc = self.source.extract_from_file(path)?;
        self.process_document(doc)
    }

    /// Run the text-side pipeline over an already-acquired document.
    pub fn process_document(&self, doc: DocumentText) -> Result<InvoiceFields> {
        if doc.raw_text.trim().is_empty() {
            return Err(AcquisitionError::EmptyText.into());
        }

        let raw_text = &doc.raw_text;
        let mut fields = self.rules.extract_all(raw_text, &self.templates);

        if let Some(structured) = &doc.structured {
            merge_structured(&mut fields, structured, raw_text);
        }
        enrich(&mut fields, raw_text, doc.structured.as_ref());
        resolve_items(&mut fields, doc.structured.as_ref(), raw_text);

        // Late service match, for documents whose description only came
        // from the merge or the line items.
        if fields.matched_service.is_none() {
            let candidate = fields
                .service_description
                .clone()
                .or_else(|| fields.item_name.clone())
                .or_else(|| fields.items.first().map(|i| i.description.clone()));
            if let Some(desc) = candidate {
                if let Some(m) = self.templates.match_service(&desc) {
                    debug!("late service match: {}", m.name);
                    fields.matched_service = Some(m.name);
                    fields.estimated_minutes = Some(m.estimated_minutes);
                }
            }
        }

        let limit = match &doc.structured {
            Some(structured) => {
                fields.confidence_overall = Some(calculate_confidence(structured));
                RAW_TEXT_LIMIT
            }
            None => RAW_TEXT_LIMIT_BARE,
        };
        fields.raw_text = Some(truncate_chars(raw_text, limit));
        fields.structured = doc.structured;

        debug!(
            "extraction finished, confidence={:?}, items={}",
            fields.confidence_overall,
            fields.items.len()
        );
        Ok(fields)
    }
}

/// Fill gaps in the rule-driven fields from the collaborator's structured
/// data. Rule-driven values always win; collaborator values only land where
/// a field is still missing.
fn merge_structured(fields: &mut InvoiceFields, structured: &StructuredData, raw_text: &str) {
    if fields.customer_phone.is_none() {
        fields.customer_phone = structured.phone_numbers.first().cloned();
    }
    if fields.customer_email.is_none() {
        fields.customer_email = structured.emails.first().cloned();
    }
    if fields.customer_name.is_none() {
        fields.customer_name = guess_customer_name(raw_text);
    }
    if fields.quantity.is_none() {
        fields.quantity = extract_quantity(raw_text);
    }
    if fields.service_description.is_none() {
        fields.service_description = service_description_line(raw_text);
        if fields.item_name.is_none() {
            fields.item_name = fields.service_description.clone();
        }
    }
    if fields.amount.is_none() {
        fields.amount = structured
            .amounts
            .iter()
            .find_map(|a| parse_amount(a))
            .map(|a| a.to_string());
    }
}

/// Late heuristics for fields the rule engine and merge left unresolved.
fn enrich(fields: &mut InvoiceFields, raw_text: &str, structured: Option<&StructuredData>) {
    if fields.code_no.is_none() {
        fields.code_no = CODE_NO
            .captures(raw_text)
            .map(|caps| caps[1].trim().to_string());
    }
    if fields.reference.is_none() {
        fields.reference = REFERENCE
            .captures(raw_text)
            .map(|caps| caps[1].trim().to_string());
    }
    if fields.date.is_none() {
        fields.date = DATE.captures(raw_text).map(|caps| caps[1].to_string());
    }

    // References like "FOR T123 ABC" carry the plate of the serviced
    // vehicle. The rule-driven reference may be a single token, so the
    // full reference line from the raw text is consulted as well.
    if fields.plate_number.is_none() {
        let spaced_reference = REFERENCE
            .captures(raw_text)
            .map(|caps| caps[1].trim().to_string());
        for candidate in fields.reference.iter().chain(spaced_reference.iter()) {
            if let Some(caps) = REFERENCE_FOR.captures(candidate) {
                let plate = normalize_plate(&caps[1]);
                if !plate.is_empty() {
                    fields.plate_number = Some(plate);
                    break;
                }
            }
        }
    }
    if fields.plate_number.is_none() {
        fields.plate_number = structured.and_then(|s| s.vehicle_plates.first().cloned());
    }

    if fields.vat_amount.is_none() {
        fields.vat_amount = VAT_AMOUNT
            .captures(raw_text)
            .map(|caps| caps[1].replace(',', ""));
    }
    if fields.net_value.is_none() {
        fields.net_value = NET_VALUE
            .captures(raw_text)
            .map(|caps| caps[1].replace(',', ""));
    }
    if fields.gross_value.is_none() {
        fields.gross_value = GROSS_VALUE
            .captures(raw_text)
            .map(|caps| caps[1].replace(',', ""));
    }
}

/// Choose a line-item list: merged fields first, then the collaborator's,
/// then a direct pass over the raw text as the last resort. Items are
/// renumbered 1-based regardless of origin.
fn resolve_items(fields: &mut InvoiceFields, structured: Option<&StructuredData>, raw_text: &str) {
    if fields.items.is_empty() {
        if let Some(items) = structured.map(|s| &s.items).filter(|i| !i.is_empty()) {
            fields.items = items.clone();
        } else {
            fields.items = extract_line_items(raw_text);
        }
    }

    fields.items.retain(LineItem::has_numeric);
    for (i, item) in fields.items.iter_mut().enumerate() {
        item.line_no = (i + 1) as u32;
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
