//! Pattern and template configuration storage.
//!
//! Extraction rules and service templates are administrator-maintained data,
//! loaded through a [`ConfigStore`] so the rule engine and template catalog
//! stay independent of where that data lives. A load failure is recovered by
//! the consumers' built-in fallback tables and never surfaces to callers.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A named category of information to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    PlateNumber,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    ServiceDescription,
    ItemName,
    Quantity,
    Amount,
    Date,
    Reference,
}

impl FieldKind {
    /// Every known field kind, in the order `extract_all` resolves them.
    pub const ALL: [FieldKind; 10] = [
        FieldKind::PlateNumber,
        FieldKind::CustomerName,
        FieldKind::CustomerPhone,
        FieldKind::CustomerEmail,
        FieldKind::ServiceDescription,
        FieldKind::ItemName,
        FieldKind::Quantity,
        FieldKind::Amount,
        FieldKind::Date,
        FieldKind::Reference,
    ];

    /// The snake_case name used in configuration rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::PlateNumber => "plate_number",
            FieldKind::CustomerName => "customer_name",
            FieldKind::CustomerPhone => "customer_phone",
            FieldKind::CustomerEmail => "customer_email",
            FieldKind::ServiceDescription => "service_description",
            FieldKind::ItemName => "item_name",
            FieldKind::Quantity => "quantity",
            FieldKind::Amount => "amount",
            FieldKind::Date => "date",
            FieldKind::Reference => "reference",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prioritized regex rule for resolving a single field kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionPattern {
    /// Human label, unique per intent.
    pub name: String,

    /// Which field this rule resolves.
    pub field_type: FieldKind,

    /// Regular expression; may contain multiple capture groups.
    pub regex_pattern: String,

    /// 1-based index of the capture group to return.
    #[serde(default = "default_group")]
    pub extract_group: usize,

    /// Lower value tried first within the same field kind.
    #[serde(default)]
    pub priority: i32,

    /// Inactive patterns are never evaluated.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A keyword-tagged catalog entry used to infer service duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTemplate {
    /// Unique service label, e.g. "Oil Change".
    pub name: String,

    /// Comma-separated lower-cased tokens matched as substrings.
    pub keywords: String,

    /// Positive duration estimate in minutes.
    pub estimated_minutes: u32,

    /// Inactive templates are never considered.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_group() -> usize {
    1
}

fn default_true() -> bool {
    true
}

/// Read access to administrator-maintained extraction configuration.
pub trait ConfigStore {
    /// Active extraction patterns. Caller re-sorts by priority; the store
    /// only guarantees a stable row order.
    fn load_patterns(&self) -> std::result::Result<Vec<ExtractionPattern>, ConfigError>;

    /// Active service templates in catalog order.
    fn load_templates(&self) -> std::result::Result<Vec<ServiceTemplate>, ConfigError>;
}

/// On-disk configuration document for [`JsonConfigStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigDocument {
    patterns: Vec<ExtractionPattern>,
    templates: Vec<ServiceTemplate>,
}

/// Configuration store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Create a store reading from the given JSON file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> std::result::Result<ConfigDocument, ConfigError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Write a configuration document, e.g. to seed an initial file.
    pub fn write(
        path: &Path,
        patterns: &[ExtractionPattern],
        templates: &[ServiceTemplate],
    ) -> std::result::Result<(), ConfigError> {
        let doc = ConfigDocument {
            patterns: patterns.to_vec(),
            templates: templates.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))
    }
}

impl ConfigStore for JsonConfigStore {
    fn load_patterns(&self) -> std::result::Result<Vec<ExtractionPattern>, ConfigError> {
        Ok(self.read()?.patterns)
    }

    fn load_templates(&self) -> std::result::Result<Vec<ServiceTemplate>, ConfigError> {
        Ok(self.read()?.templates)
    }
}

/// In-memory configuration store for embedded defaults and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigStore {
    patterns: Vec<ExtractionPattern>,
    templates: Vec<ServiceTemplate>,
}

impl StaticConfigStore {
    pub fn new(patterns: Vec<ExtractionPattern>, templates: Vec<ServiceTemplate>) -> Self {
        Self { patterns, templates }
    }
}

impl ConfigStore for StaticConfigStore {
    fn load_patterns(&self) -> std::result::Result<Vec<ExtractionPattern>, ConfigError> {
        if self.patterns.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(self.patterns.clone())
    }

    fn load_templates(&self) -> std::result::Result<Vec<ServiceTemplate>, ConfigError> {
        if self.templates.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(self.templates.clone())
    }
}

/// A store that always fails, forcing consumers onto built-in defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl ConfigStore for UnavailableStore {
    fn load_patterns(&self) -> std::result::Result<Vec<ExtractionPattern>, ConfigError> {
        Err(ConfigError::Empty)
    }

    fn load_templates(&self) -> std::result::Result<Vec<ServiceTemplate>, ConfigError> {
        Err(ConfigError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_serde_names() {
        let json = serde_json::to_string(&FieldKind::PlateNumber).unwrap();
        assert_eq!(json, "\"plate_number\"");

        let kind: FieldKind = serde_json::from_str("\"customer_phone\"").unwrap();
        assert_eq!(kind, FieldKind::CustomerPhone);
    }

    #[test]
    fn test_as_str_matches_serde_name_for_every_kind() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extraction.json");

        let patterns = vec![ExtractionPattern {
            name: "Plate in reference field".to_string(),
            field_type: FieldKind::PlateNumber,
            regex_pattern: r"REF[\s:]*([A-Z0-9]+)".to_string(),
            extract_group: 1,
            priority: 10,
            is_active: true,
        }];
        let templates = vec![ServiceTemplate {
            name: "Oil Change".to_string(),
            keywords: "oil, oil change".to_string(),
            estimated_minutes: 30,
            is_active: true,
        }];

        JsonConfigStore::write(&path, &patterns, &templates).unwrap();

        let store = JsonConfigStore::new(&path);
        let loaded = store.load_patterns().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].field_type, FieldKind::PlateNumber);

        let loaded = store.load_templates().unwrap();
        assert_eq!(loaded[0].estimated_minutes, 30);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let store = JsonConfigStore::new("/nonexistent/extraction.json");
        assert!(store.load_patterns().is_err());
    }

    #[test]
    fn test_pattern_defaults() {
        let json = r#"{"name": "n", "field_type": "amount", "regex_pattern": "x"}"#;
        let p: ExtractionPattern = serde_json::from_str(json).unwrap();
        assert_eq!(p.extract_group, 1);
        assert_eq!(p.priority, 0);
        assert!(p.is_active);
    }
}
