//! Service-template matching for duration estimation.
//!
//! A free-text service description is matched against a catalog of
//! keyword-tagged templates; the template with the strictly greatest number
//! of keyword hits wins, ties keeping the first-loaded template.

use std::cell::OnceCell;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{ConfigStore, ServiceTemplate, StaticConfigStore};
use crate::models::ServiceMatch;

/// A template prepared for matching: keywords split and lower-cased.
#[derive(Debug, Clone)]
struct LoadedTemplate {
    name: String,
    keywords: Vec<String>,
    estimated_minutes: u32,
}

/// Lazily-loaded service template catalog.
///
/// Templates are loaded from the configuration store on first use and cached
/// for the catalog's lifetime; an unreachable or empty store falls back to
/// the built-in catalog. The cache makes this type single-threaded by
/// design; wrap it in external synchronization for shared use.
pub struct TemplateCatalog {
    store: Arc<dyn ConfigStore + Send + Sync>,
    cache: OnceCell<Vec<LoadedTemplate>>,
}

impl TemplateCatalog {
    /// Create a catalog backed by the given configuration store.
    pub fn new(store: Arc<dyn ConfigStore + Send + Sync>) -> Self {
        Self {
            store,
            cache: OnceCell::new(),
        }
    }

    /// Create a catalog that only uses the built-in templates.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(StaticConfigStore::new(Vec::new(), builtin_templates())))
    }

    fn templates(&self) -> &[LoadedTemplate] {
        self.cache.get_or_init(|| {
            let rows = match self.store.load_templates() {
                Ok(rows) if !rows.is_empty() => rows,
                Ok(_) => {
                    warn!("template store is empty, using built-in templates");
                    builtin_templates()
                }
                Err(e) => {
                    warn!("failed to load service templates: {e}, using built-ins");
                    builtin_templates()
                }
            };

            let loaded: Vec<LoadedTemplate> = rows
                .into_iter()
                .filter(|t| t.is_active)
                .map(|t| LoadedTemplate {
                    keywords: split_keywords(&t.keywords),
                    name: t.name,
                    estimated_minutes: t.estimated_minutes,
                })
                .collect();

            debug!("loaded {} service templates", loaded.len());
            loaded
        })
    }

    /// Match a service description against the catalog.
    ///
    /// Returns the best template by keyword-hit count, or `None` when the
    /// description is empty or no template scores a single hit.
    pub fn match_service(&self, description: &str) -> Option<ServiceMatch> {
        if description.trim().is_empty() {
            return None;
        }

        let lower = description.to_lowercase();

        let mut best: Option<&LoadedTemplate> = None;
        let mut best_count = 0usize;

        for template in self.templates() {
            let count = template
                .keywords
                .iter()
                .filter(|kw| lower.contains(kw.as_str()))
                .count();
            if count > best_count {
                best = Some(template);
                best_count = count;
            }
        }

        best.map(|t| ServiceMatch {
            name: t.name.clone(),
            estimated_minutes: t.estimated_minutes,
        })
    }
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Built-in service templates for common auto-service work.
pub fn builtin_templates() -> Vec<ServiceTemplate> {
    let rows = [
        ("Oil Change", "oil change, oil service, oil replacement, oil top up, oil", 30),
        ("Tire Rotation", "tire rotation, tyre rotation, wheel alignment, tire balance", 45),
        ("Brake Service", "brake, brake pads, brake fluid, brake service, brake check", 60),
        ("Air Filter Replacement", "air filter, air filter replacement, cabin filter", 20),
        ("Battery Service", "battery, battery replacement, battery service, battery check", 30),
        ("Tire Installation", "tire installation, tyre installation, tire mount, tyre mount, install tires", 60),
        ("Tire Balancing", "balancing, balance, wheel balance, tire balance", 30),
        ("General Maintenance", "maintenance, service, check, inspection, diagnostic", 45),
    ];

    rows.iter()
        .map(|(name, keywords, minutes)| ServiceTemplate {
            name: name.to_string(),
            keywords: keywords.to_string(),
            estimated_minutes: *minutes,
            is_active: true,
        })
        .collect()
}
