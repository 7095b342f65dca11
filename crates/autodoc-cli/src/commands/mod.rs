//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;
use std::sync::Arc;

use autodoc_core::{ConfigStore, ExtractionPipeline, FileTextSource, JsonConfigStore};

/// Build a pipeline, wiring in a JSON config store when a path was given.
pub fn build_pipeline(config_path: Option<&str>) -> ExtractionPipeline<FileTextSource> {
    match config_path {
        Some(path) => {
            let store: Arc<dyn ConfigStore + Send + Sync> =
                Arc::new(JsonConfigStore::new(Path::new(path)));
            ExtractionPipeline::with_store(FileTextSource::new(), store)
        }
        None => ExtractionPipeline::new(FileTextSource::new()),
    }
}
