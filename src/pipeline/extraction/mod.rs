pub mod loader;
pub mod sanitize;
pub mod types;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed for {path}: {reason}")]
    Pdf { path: PathBuf, reason: String },

    #[error("HTTP fetch failed for {url}: {reason}")]
    Http { url: String, reason: String },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Document root not found: {0}")]
    RootNotFound(PathBuf),
}
