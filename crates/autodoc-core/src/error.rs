//! Error types for the autodoc-core library.

use thiserror::Error;

/// Main error type for the autodoc library.
#[derive(Error, Debug)]
pub enum AutodocError {
    /// Text acquisition error.
    #[error("acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the raw-text acquisition collaborator.
///
/// These are terminal for a document attempt: the caller gets the error
/// string and no extracted fields.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// File extension is not handled by this source.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Image input with no OCR available.
    #[error("OCR is disabled - provide a PDF or text document instead of an image")]
    OcrDisabled,

    /// The source produced no text at all.
    #[error("could not extract text from document")]
    EmptyText,

    /// The underlying file could not be read or parsed.
    #[error("failed to read document: {0}")]
    Read(String),
}

/// Errors from the pattern/template configuration store.
///
/// These never cross the extractor boundary; the rule engine and template
/// catalog recover by falling back to their built-in tables.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file missing or unreadable.
    #[error("failed to read configuration: {0}")]
    Read(String),

    /// Configuration file present but malformed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// Store reachable but holds no rows for the request.
    #[error("configuration store is empty")]
    Empty,
}

/// Result type for the autodoc library.
pub type Result<T> = std::result::Result<T, AutodocError>;
