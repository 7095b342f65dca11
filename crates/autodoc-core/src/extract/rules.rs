//! Priority-ordered, rule-driven field extraction.
//!
//! Rules are administrator-configured regexes grouped per [`FieldKind`] and
//! tried in ascending priority; the first rule whose configured capture
//! group yields a non-empty value wins. Rules load once per engine instance;
//! an unreachable store falls back to the built-in table wholesale, and a
//! reachable store that covers only some field kinds is supplemented per
//! kind from the same table.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use regex::RegexBuilder;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{ConfigStore, ExtractionPattern, FieldKind, StaticConfigStore};
use crate::models::InvoiceFields;

use super::structured::clean_phone;
use super::templates::TemplateCatalog;

/// A configuration row compiled and ready to match.
struct CompiledRule {
    name: String,
    regex: regex::Regex,
    group: usize,
    priority: i32,
}

/// Rule-driven extractor resolving single named fields from text.
///
/// Patterns load lazily on first use and are cached for the engine's
/// lifetime, including after a failed load (the built-in fallback is cached
/// instead, with no retry). Like [`TemplateCatalog`], an engine instance is
/// meant to be reused across documents from one thread at a time.
pub struct RuleEngine {
    store: Arc<dyn ConfigStore + Send + Sync>,
    cache: OnceCell<HashMap<FieldKind, Vec<CompiledRule>>>,
    builtin_cache: OnceCell<HashMap<FieldKind, Vec<CompiledRule>>>,
}

impl RuleEngine {
    /// Create an engine backed by the given configuration store.
    pub fn new(store: Arc<dyn ConfigStore + Send + Sync>) -> Self {
        Self {
            store,
            cache: OnceCell::new(),
            builtin_cache: OnceCell::new(),
        }
    }

    /// Create an engine that only uses the built-in rule table.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(StaticConfigStore::new(
            builtin_patterns(),
            Vec::new(),
        )))
    }

    fn rules(&self) -> &HashMap<FieldKind, Vec<CompiledRule>> {
        self.cache.get_or_init(|| {
            let rows = match self.store.load_patterns() {
                Ok(rows) if !rows.is_empty() => rows,
                Ok(_) => {
                    warn!("pattern store is empty, using built-in patterns");
                    builtin_patterns()
                }
                Err(e) => {
                    warn!("failed to load extraction patterns: {e}, using built-ins");
                    builtin_patterns()
                }
            };

            let grouped = compile_rules(rows);
            debug!(
                "loaded {} extraction rules across {} field kinds",
                grouped.values().map(Vec::len).sum::<usize>(),
                grouped.len()
            );
            grouped
        })
    }

    fn builtin_rules(&self) -> &HashMap<FieldKind, Vec<CompiledRule>> {
        self.builtin_cache
            .get_or_init(|| compile_rules(builtin_patterns()))
    }

    /// Rules for one kind: the store's when it has any, else the built-ins.
    fn rules_for(&self, kind: FieldKind) -> &[CompiledRule] {
        match self.rules().get(&kind) {
            Some(rules) if !rules.is_empty() => rules,
            _ => self
                .builtin_rules()
                .get(&kind)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// Resolve one field from text, first non-empty match wins. Field kinds
    /// the configured store does not cover use the built-in rule table.
    pub fn extract_field(&self, text: &str, kind: FieldKind) -> Option<String> {
        for rule in self.rules_for(kind) {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            match caps.get(rule.group) {
                Some(m) => {
                    let value = m.as_str().trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
                None => {
                    warn!(
                        "pattern '{}' matched but has no capture group {}",
                        rule.name, rule.group
                    );
                }
            }
        }

        None
    }

    /// Resolve and parse the monetary amount field.
    pub fn extract_amount(&self, text: &str) -> Option<Decimal> {
        let raw = self.extract_field(text, FieldKind::Amount)?;
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        match Decimal::from_str(&cleaned) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("could not parse amount '{raw}': {e}");
                None
            }
        }
    }

    /// Resolve every known field kind, matching the service template catalog
    /// against the discovered description.
    pub fn extract_all(&self, text: &str, catalog: &TemplateCatalog) -> InvoiceFields {
        let service_description = self.extract_field(text, FieldKind::ServiceDescription);
        let item_name = self
            .extract_field(text, FieldKind::ItemName)
            .or_else(|| service_description.clone());

        let mut fields = InvoiceFields {
            plate_number: self.extract_field(text, FieldKind::PlateNumber),
            customer_name: self.extract_field(text, FieldKind::CustomerName),
            customer_phone: self
                .extract_field(text, FieldKind::CustomerPhone)
                .map(|p| clean_phone(&p))
                .filter(|p| !p.is_empty()),
            customer_email: self.extract_field(text, FieldKind::CustomerEmail),
            quantity: self.extract_field(text, FieldKind::Quantity),
            amount: self.extract_amount(text).map(|a| a.to_string()),
            date: self.extract_field(text, FieldKind::Date),
            reference: self.extract_field(text, FieldKind::Reference),
            service_description,
            item_name,
            ..Default::default()
        };

        if let Some(desc) = &fields.service_description {
            if let Some(m) = catalog.match_service(desc) {
                fields.matched_service = Some(m.name);
                fields.estimated_minutes = Some(m.estimated_minutes);
            }
        }

        fields
    }
}

fn compile_rules(rows: Vec<ExtractionPattern>) -> HashMap<FieldKind, Vec<CompiledRule>> {
    let mut grouped: HashMap<FieldKind, Vec<CompiledRule>> = HashMap::new();
    for row in rows {
        if !row.is_active {
            continue;
        }
        let regex = match RegexBuilder::new(&row.regex_pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                warn!("skipping pattern '{}': {e}", row.name);
                continue;
            }
        };
        grouped.entry(row.field_type).or_default().push(CompiledRule {
            name: row.name,
            regex,
            group: row.extract_group,
            priority: row.priority,
        });
    }

    // Stable sort: same-priority rules keep configuration order
    for rules in grouped.values_mut() {
        rules.sort_by_key(|r| r.priority);
    }
    grouped
}

/// Built-in fallback rule table.
pub fn builtin_patterns() -> Vec<ExtractionPattern> {
    let rows: [(&str, FieldKind, &str, usize, i32); 11] = [
        (
            "Plate in reference field",
            FieldKind::PlateNumber,
            r"(?:REFERENCE|REF|Plate|License)[\s:]*([A-Z]{3}\s?[A-Z]?\s?\d+\s?[A-Z]{2,3})",
            1,
            10,
        ),
        (
            "Standard plate format",
            FieldKind::PlateNumber,
            r"\b([A-Z]{2,3}\s?[A-Z]?\s?(?:\d+\s)?[A-Z]{2,3})\b",
            1,
            20,
        ),
        (
            "Amount with currency label",
            FieldKind::Amount,
            r"(?:Total|Amount|Due)[\s:]*([A-Z]{0,4})[\s]*([\d,]+\.?\d{0,2})",
            2,
            10,
        ),
        ("Numeric amount", FieldKind::Amount, r"([\d,]+\.?\d{0,2})", 1, 100),
        (
            "Tanzania phone format",
            FieldKind::CustomerPhone,
            r"(?:Phone|Tel|Mobile|Contact)[\s:]*(\+?255\s?\d{3}\s?\d{3}\s?\d{3}|0[67]\d{2}\s?\d{3}\s?\d{3})",
            1,
            10,
        ),
        (
            "General phone format",
            FieldKind::CustomerPhone,
            r"(\+?\d{1,3}\s?\d{2,4}\s?\d{3,4})",
            1,
            20,
        ),
        (
            "Name after customer label",
            FieldKind::CustomerName,
            r"(?:CUSTOMER|Name)[\s:]*([A-Za-z\s]+?)(?:\n|$|Phone|Tel|Address)",
            1,
            10,
        ),
        (
            "Email pattern",
            FieldKind::CustomerEmail,
            r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})",
            1,
            10,
        ),
        (
            "Service/description field",
            FieldKind::ServiceDescription,
            r"(?:SERVICE|Description|Item)[\s:]*([A-Za-z0-9\s,.-]+?)(?:\n|Qty|Quantity|$)",
            1,
            10,
        ),
        ("Quantity field", FieldKind::Quantity, r"(?:QTY|Quantity)[\s:]*(\d+)", 1, 10),
        (
            "Invoice/Reference number",
            FieldKind::Reference,
            r"(?:REF|Reference|Invoice|INV)[\s#:]*([A-Z0-9-]+)",
            1,
            10,
        ),
    ];

    rows.iter()
        .map(|(name, kind, regex, group, priority)| ExtractionPattern {
            name: name.to_string(),
            field_type: *kind,
            regex_pattern: regex.to_string(),
            extract_group: *group,
            priority: *priority,
            is_active: true,
        })
        .collect()
}
