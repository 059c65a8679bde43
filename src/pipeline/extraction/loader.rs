//! Source loaders: PDF and plain-text files from the document root, plus the
//! canonical web sources. Per-source failures are logged and skipped so one
//! unreadable document never aborts a batch.

use std::fs;
use std::path::Path;

use scraper::{Html, Selector};

use super::types::{RawDocument, SourceKind};
use super::ExtractionError;

/// Display titles for known source URLs and file stems.
const SOURCE_NAME_MAP: &[(&str, &str)] = &[
    ("codedutravail", "Code du Travail"),
    ("codepenal", "Code Pénal"),
    ("constitution", "Constitution du Sénégal"),
    ("codefamille", "Code de la Famille"),
    ("codecivil", "Code Civil"),
    ("collectivites", "Code des Collectivités Locales"),
    ("aviation", "Code de l'Aviation Civile"),
];

/// Map a source path or URL to a citizen-readable title.
pub fn display_source_name(source: &str) -> String {
    if source.is_empty() {
        return "Document juridique".to_string();
    }

    let lower = source.to_lowercase();
    if lower.contains("conseilconstitutionnel") {
        return "Constitution du Sénégal".to_string();
    }

    let stem = Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string());

    let normalized: String = stem
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect();

    for (key, title) in SOURCE_NAME_MAP {
        if normalized.contains(key) {
            return title.to_string();
        }
    }

    // Fallback: prettify the stem
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Load a single file, dispatching on extension.
pub fn load_file(path: &Path) -> Result<RawDocument, ExtractionError> {
    let source = path.to_string_lossy().to_string();
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => {
            let text = pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            Ok(RawDocument::new(source, SourceKind::Pdf, text))
        }
        Some("txt") | Some("md") => {
            let text = fs::read_to_string(path)?;
            Ok(RawDocument::new(source, SourceKind::Text, text))
        }
        _ => Err(ExtractionError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load every supported document under `root`, recursively.
///
/// Unsupported and unreadable files are skipped with a warning; only a
/// missing root is an error.
pub fn load_directory(root: &Path) -> Result<Vec<RawDocument>, ExtractionError> {
    if !root.exists() {
        return Err(ExtractionError::RootNotFound(root.to_path_buf()));
    }

    let mut documents = Vec::new();
    collect_files(root, &mut documents)?;
    documents.sort_by(|a, b| a.source.cmp(&b.source));

    tracing::info!(count = documents.len(), root = %root.display(), "documents loaded");
    Ok(documents)
}

fn collect_files(dir: &Path, out: &mut Vec<RawDocument>) -> Result<(), ExtractionError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
            continue;
        }
        match load_file(&path) {
            Ok(doc) => out.push(doc),
            Err(ExtractionError::UnsupportedFormat(_)) => {
                tracing::debug!(path = %path.display(), "unsupported format skipped");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document skipped");
            }
        }
    }
    Ok(())
}

/// Fetch a web source and reduce it to plain text.
pub fn fetch_web(
    url: &str,
    client: &reqwest::blocking::Client,
) -> Result<RawDocument, ExtractionError> {
    let body = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(|e| ExtractionError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    Ok(RawDocument::new(url, SourceKind::Web, html_to_text(&body)))
}

/// Fetch a list of web sources; failures are logged and skipped.
pub fn load_web_sources(urls: &[&str]) -> Vec<RawDocument> {
    let client = match reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "HTTP client construction failed; web sources skipped");
            return Vec::new();
        }
    };

    let mut documents = Vec::new();
    for url in urls {
        match fetch_web(url, &client) {
            Ok(doc) if !doc.text.trim().is_empty() => documents.push(doc),
            Ok(_) => tracing::warn!(url, "web source yielded no text"),
            Err(e) => tracing::warn!(url, error = %e, "web source skipped"),
        }
    }
    documents
}

/// Extract readable text from an HTML page: headings, paragraphs and list
/// items, in document order.
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("h1, h2, h3, h4, h5, h6, p, li").expect("static selector is valid");

    let mut parts = Vec::new();
    for element in document.select(&selector) {
        let text = element
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join("\n\n")
}
