use serde::{Deserialize, Serialize};

/// Where a document came from. Drives the chunking strategy at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pdf,
    Web,
    Text,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Pdf => "pdf",
            SourceKind::Web => "web",
            SourceKind::Text => "text",
        }
    }
}

/// A fully extracted source document, ready for cleaning and chunking.
///
/// Immutable once built; one per ingested file or web page.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// File path or URL.
    pub source: String,
    pub kind: SourceKind,
    /// Full extracted text, before cleaning.
    pub text: String,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, kind: SourceKind, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            text: text.into(),
        }
    }
}
