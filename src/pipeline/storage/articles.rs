//! Article boundary detection.
//!
//! Known limitation, kept on purpose: a citation such as "Art. 5" at the
//! start of a line is indistinguishable from a real heading and becomes a
//! boundary. Tests pin this behavior instead of papering over it.

use std::sync::LazyLock;

use regex::Regex;

/// "Article <label>" / "Art. <label>" at line start; label is an optional
/// letter prefix, a number, and an optional bis/ter/quater suffix.
static ARTICLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:article|art\.?)\s+([a-z]?\.?\s?\d+[a-z]*(?:\s?(?:bis|ter|quater))?)")
        .expect("static pattern is valid")
});

/// One article of a structured legal text.
///
/// Spans are contiguous: `end` of article *i* equals `start` of article
/// *i+1*, and the last span runs to the end of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSpan {
    /// Normalized label ("L.2", "5", "172 bis").
    pub label: String,
    /// Raw text of the article, heading line included.
    pub content: String,
    /// Byte offsets into the cleaned document.
    pub start: usize,
    pub end: usize,
}

/// Extract every article of `text`, in increasing start-offset order.
///
/// Returns an empty list when the document has no article markers; the
/// caller then falls back to paragraph segmentation.
pub fn extract_articles(text: &str) -> Vec<ArticleSpan> {
    let matches: Vec<_> = ARTICLE_PATTERN.captures_iter(text).collect();

    let mut articles = Vec::with_capacity(matches.len());
    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).expect("group 0 always present");
        let label = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .unwrap_or_default()
            .to_string();

        let start = whole.start();
        let end = match matches.get(i + 1) {
            Some(next) => next.get(0).expect("group 0 always present").start(),
            None => text.len(),
        };

        articles.push(ArticleSpan {
            label,
            content: text[start..end].trim().to_string(),
            start,
            end,
        });
    }

    articles
}
