//! Context assembly: the text block handed to the LLM and the source
//! records handed back to the caller, built from the same selected passages
//! so the two can never drift apart.

use super::classify::{detect_domain, extract_keywords};
use super::types::{RetrievedCandidate, SourceRecord};
use crate::config;
use crate::text_util::{char_len, head_chars, split_sentences, truncate_chars};

/// Context string plus its one-to-one source projection.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    /// Passage block for the generation prompt.
    pub text: String,
    /// One record per passage that entered `text`.
    pub sources: Vec<SourceRecord>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Build the LLM context and the source records from selected candidates.
///
/// Each passage is headed by its source title, article label and breadcrumb,
/// and delimited by `---` so the model can tell passages apart.
pub fn assemble_context(question: &str, selected: &[RetrievedCandidate]) -> AssembledContext {
    let mut parts = Vec::new();
    let mut sources = Vec::new();

    for (idx, candidate) in selected.iter().take(config::RERANK_TOP_N).enumerate() {
        let chunk = &candidate.chunk;

        let mut header = format!("[{}]", chunk.source_name);
        if let Some(article) = &chunk.article {
            header.push_str(&format!(" {article}"));
        }
        if !chunk.breadcrumb.is_empty() {
            header.push_str(&format!(" ({})", chunk.breadcrumb));
        }

        let passage = truncate_chars(&chunk.content, config::CONTEXT_PASSAGE_CHARS);
        parts.push(format!("{header}\n{passage}"));

        sources.push(SourceRecord {
            id: format!("source_{idx}"),
            title: chunk.source_name.clone(),
            content: relevant_excerpt(&chunk.content, question, config::SOURCE_EXCERPT_CHARS),
            article: chunk.article.clone(),
            breadcrumb: chunk.breadcrumb.clone(),
            page: chunk.page,
            url: chunk
                .source
                .starts_with("http")
                .then(|| chunk.source.clone()),
            domain: detect_domain(&format!("{} {}", chunk.source_name, chunk.content)),
        });
    }

    AssembledContext {
        text: parts.join("\n\n---\n\n"),
        sources,
    }
}

/// Length-capped excerpt of a passage, keeping the most question-relevant
/// sentence window rather than a blind prefix.
///
/// Sentences are scored by question-keyword hits; if any sentence scores,
/// the excerpt starts 100 chars before the first scoring sentence.
/// Otherwise the excerpt is a prefix cut near a sentence boundary.
pub fn relevant_excerpt(text: &str, question: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }

    let keywords = extract_keywords(question);

    let mut first_hit: Option<usize> = None;
    for (offset, sentence) in split_sentences(text) {
        let sentence_lower = sentence.to_lowercase();
        let hits = keywords
            .iter()
            .filter(|kw| sentence_lower.contains(*kw))
            .count();
        if hits > 0 {
            first_hit = Some(offset);
            break;
        }
    }

    match first_hit {
        Some(offset) => {
            let prefix_chars = char_len(&text[..offset]);
            let start_char = prefix_chars.saturating_sub(100);
            let window: String = text.chars().skip(start_char).collect();
            let mut excerpt = truncate_chars(&window, max_chars);
            if start_char > 0 {
                excerpt = format!("...{excerpt}");
            }
            excerpt
        }
        None => prefix_near_sentence_boundary(text, max_chars),
    }
}

/// Prefix of about `max_chars`, backed up to the last sentence end in the
/// final fifth of the window when one exists.
fn prefix_near_sentence_boundary(text: &str, max_chars: usize) -> String {
    let prefix = head_chars(text, max_chars);
    let search_start = max_chars * 4 / 5;
    let tail = &prefix[head_chars(prefix, search_start).len()..];

    match tail.rfind(". ") {
        Some(pos) => {
            let cut = head_chars(prefix, search_start).len() + pos + 1;
            format!("{}...", prefix[..cut].trim_end())
        }
        None => format!("{}...", prefix.trim_end()),
    }
}
