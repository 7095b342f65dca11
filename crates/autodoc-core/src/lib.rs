//! Core library for auto-service document extraction.
//!
//! This crate provides:
//! - Structured field parsing (phones, emails, plates, makes, amounts)
//! - Heuristic line-item extraction from invoice-like text
//! - Priority-ordered, configurable regex field rules with built-in defaults
//! - Service-template matching for duration estimation
//! - A synchronous extraction pipeline tying the stages together
//!
//! OCR, persistence, and background dispatch are deliberately left to the
//! host application; the pipeline only needs a [`TextSource`] collaborator.

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod source;

pub use config::{ConfigStore, ExtractionPattern, FieldKind, JsonConfigStore, ServiceTemplate};
pub use error::{AcquisitionError, AutodocError, ConfigError, Result};
pub use extract::{
    builtin_patterns, builtin_templates, calculate_confidence, parse_structured,
    ExtractionPipeline, RuleEngine, TemplateCatalog,
};
pub use models::{InvoiceFields, LineItem, ServiceMatch, StructuredData};
pub use source::{DocumentText, FileTextSource, TextSource};
