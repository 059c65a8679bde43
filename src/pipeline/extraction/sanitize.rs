//! Cleaning of raw extracted text: OCR noise, pagination artifacts and
//! control characters are removed before any downstream processing.

use std::sync::LazyLock;

use regex::Regex;

/// Pagination and scanner noise found in the legal PDF corpus.
static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "--- PAGE 12 ---" page-break markers
        Regex::new(r"(?i)---\s*PAGE\s*\d+\s*---").unwrap(),
        // "page 3 / 118" footers
        Regex::new(r"(?i)page\s*\d+\s*/\s*\d+").unwrap(),
        // Publisher watermark lines
        Regex::new(r"(?im)^\s*JURISCONSULT\s*$").unwrap(),
        // Isolated page-number lines
        Regex::new(r"(?m)^\s*\d+\s*$").unwrap(),
    ]
});

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Known OCR duplication artifacts, fixed by literal replacement.
const OCR_REPLACEMENTS: &[(&str, &str)] = &[
    ("CODE DU TRAVAIL CODE DU TRAVAIL", "CODE DU TRAVAIL"),
    ("CODE PENAL CODE PENAL", "CODE PENAL"),
    ("CONSTITUTION CONSTITUTION", "CONSTITUTION"),
];

/// Clean raw document text for chunking.
///
/// An empty or all-noise input yields an empty string; the caller treats that
/// as "no content to chunk", not as an error.
pub fn clean_legal_text(raw: &str) -> String {
    // Control characters (form feeds included) go first; newline/tab survive.
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();

    for pattern in NOISE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    for (from, to) in OCR_REPLACEMENTS {
        cleaned = cleaned.replace(from, to);
    }

    cleaned = MULTI_SPACE.replace_all(&cleaned, " ").into_owned();

    // Trim every line; lines holding only punctuation/separators become blank.
    cleaned = cleaned
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.chars().all(|c| !c.is_alphanumeric()) {
                ""
            } else {
                trimmed
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    cleaned = MULTI_NEWLINE.replace_all(&cleaned, "\n\n").into_owned();

    cleaned.trim().to_string()
}
