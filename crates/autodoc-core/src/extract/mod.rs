//! Document field extraction.
//!
//! Independent stages composed by [`ExtractionPipeline`]: the structured
//! category parser and line-item extractor work on bare text, the rule
//! engine and template catalog add configuration-driven field resolution,
//! and the confidence scorer rates category coverage.

pub mod confidence;
pub mod items;
pub mod patterns;
pub mod rules;
pub mod structured;
pub mod templates;

mod pipeline;

pub use confidence::calculate_confidence;
pub use items::extract_line_items;
pub use pipeline::ExtractionPipeline;
pub use rules::{builtin_patterns, RuleEngine};
pub use structured::{
    clean_phone, extract_keywords, format_plate, normalize_plate, parse_amount, parse_structured,
};
pub use templates::{builtin_templates, TemplateCatalog};
