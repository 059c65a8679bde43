//! Hierarchy-aware semantic chunker for Senegalese legal texts.
//!
//! Documents with articles are cut at article boundaries, each chunk carrying
//! a breadcrumb header; oversized articles are sub-split with overlap and
//! part numbering. Documents without articles fall back to paragraph
//! accumulation, and web pages get a plain recursive split. Naive fixed-width
//! splitting silently drops legal text across boundaries — this module exists
//! to avoid exactly that.

use uuid::Uuid;

use crate::config;
use crate::pipeline::extraction::sanitize::clean_legal_text;
use crate::text_util::char_len;

use super::articles::extract_articles;
use super::hierarchy::{HierarchyPatterns, HierarchyTracker};
use super::splitter::RecursiveSplitter;
use super::types::{Chunk, ChunkKind, ChunkPart, DocumentMeta};

pub struct LegalChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    web_chunk_size: usize,
    long_article_threshold: usize,
    patterns: HierarchyPatterns,
}

impl LegalChunker {
    pub fn new() -> Self {
        Self {
            chunk_size: config::CHUNK_SIZE,
            chunk_overlap: config::CHUNK_OVERLAP,
            web_chunk_size: config::WEB_CHUNK_SIZE,
            long_article_threshold: config::LONG_ARTICLE_THRESHOLD,
            patterns: HierarchyPatterns::senegal_legal(),
        }
    }

    pub fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::new()
        }
    }

    /// Chunk a legal document. Covers the whole cleaned text: preamble,
    /// every article in order, or paragraph accumulation when no articles
    /// exist. An empty or all-noise document yields zero chunks.
    pub fn chunk_document(&self, raw_text: &str, meta: &DocumentMeta) -> Vec<Chunk> {
        let cleaned = clean_legal_text(raw_text);
        if cleaned.is_empty() {
            tracing::warn!(source = %meta.source, "document empty after cleaning");
            return Vec::new();
        }

        let mut tracker = HierarchyTracker::new(&self.patterns);
        let articles = extract_articles(&cleaned);
        let mut chunks = Vec::new();

        if articles.is_empty() {
            tracing::debug!(source = %meta.source, "no articles detected, paragraph fallback");
            self.chunk_paragraphs(&cleaned, &mut tracker, meta, &mut chunks);
            return chunks;
        }

        tracing::debug!(source = %meta.source, count = articles.len(), "articles detected");

        // Preamble: text before the first article.
        let first_start = articles[0].start;
        if first_start > 0 {
            let preamble = cleaned[..first_start].trim();
            if char_len(preamble) > config::MIN_PREAMBLE_CHARS {
                tracker.observe(preamble);
                self.push_preamble(preamble, &tracker.breadcrumb(), meta, &mut chunks);
            }
        }

        for article in &articles {
            let window = preceding_window(&cleaned, article.start, config::HIERARCHY_WINDOW);
            tracker.observe(window);
            self.chunk_article(
                &article.label,
                &article.content,
                &tracker.breadcrumb(),
                meta,
                &mut chunks,
            );
        }

        chunks
    }

    /// Chunk a web page: plain recursive split, no hierarchy tracking.
    pub fn chunk_web_document(&self, raw_text: &str, meta: &DocumentMeta) -> Vec<Chunk> {
        let cleaned = clean_legal_text(raw_text);
        if cleaned.is_empty() {
            tracing::warn!(source = %meta.source, "web page empty after cleaning");
            return Vec::new();
        }

        let splitter = RecursiveSplitter::new(self.web_chunk_size, self.chunk_overlap);
        splitter
            .split(&cleaned)
            .into_iter()
            .map(|piece| self.make_chunk(piece, ChunkKind::WebContent, "", None, None, meta))
            .collect()
    }

    /// Sub-chunking rule for a single article.
    ///
    /// Short articles whose formatted form fits the budget become one
    /// `ArticleComplete` chunk. Everything else is split with overlap, each
    /// piece repeating the article/hierarchy header and carrying its
    /// `(part, total)` position.
    fn chunk_article(
        &self,
        label: &str,
        content: &str,
        breadcrumb: &str,
        meta: &DocumentMeta,
        out: &mut Vec<Chunk>,
    ) {
        let article_label = format!("Article {label}");
        let header = if breadcrumb.is_empty() {
            format!("{article_label}\n\n")
        } else {
            format!("[{breadcrumb}]\n{article_label}\n\n")
        };

        let fits = char_len(content) < self.long_article_threshold
            && char_len(&header) + char_len(content) <= self.chunk_size;

        if fits {
            out.push(self.make_chunk(
                format!("{header}{content}"),
                ChunkKind::ArticleComplete,
                breadcrumb,
                Some(article_label),
                None,
                meta,
            ));
            return;
        }

        let continuation = if breadcrumb.is_empty() {
            format!("{article_label} (suite)\n\n")
        } else {
            format!("[{breadcrumb}] {article_label} (suite)\n\n")
        };

        let budget = self
            .chunk_size
            .saturating_sub(char_len(&continuation))
            .max(self.chunk_overlap + 1);
        let splitter = RecursiveSplitter::new(budget, self.chunk_overlap);
        let pieces = splitter.split(content);
        let total = pieces.len();

        for (i, piece) in pieces.into_iter().enumerate() {
            let text = if i == 0 {
                format!("{header}{piece}")
            } else {
                format!("{continuation}{piece}")
            };
            out.push(self.make_chunk(
                text,
                ChunkKind::ArticlePartial,
                breadcrumb,
                Some(article_label.clone()),
                Some(ChunkPart {
                    number: i + 1,
                    total,
                }),
                meta,
            ));
        }
    }

    /// Paragraph fallback: accumulate blank-line-delimited paragraphs until
    /// the budget would overflow, updating the breadcrumb as each paragraph
    /// is consumed.
    fn chunk_paragraphs(
        &self,
        cleaned: &str,
        tracker: &mut HierarchyTracker<'_>,
        meta: &DocumentMeta,
        out: &mut Vec<Chunk>,
    ) {
        let mut current = String::new();

        for para in cleaned.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            tracker.observe(para);

            // A single oversized paragraph is split on its own.
            if char_len(para) > self.chunk_size {
                self.flush_paragraph(&mut current, tracker, meta, out);
                let splitter = RecursiveSplitter::new(self.chunk_size, self.chunk_overlap);
                for piece in splitter.split(para) {
                    out.push(self.make_chunk(
                        piece,
                        ChunkKind::Paragraph,
                        &tracker.breadcrumb(),
                        None,
                        None,
                        meta,
                    ));
                }
                continue;
            }

            if !current.is_empty() && char_len(&current) + char_len(para) + 2 > self.chunk_size {
                self.flush_paragraph(&mut current, tracker, meta, out);
            }
            current.push_str(para);
            current.push_str("\n\n");
        }

        self.flush_paragraph(&mut current, tracker, meta, out);
    }

    fn flush_paragraph(
        &self,
        current: &mut String,
        tracker: &HierarchyTracker<'_>,
        meta: &DocumentMeta,
        out: &mut Vec<Chunk>,
    ) {
        let text = current.trim();
        if !text.is_empty() {
            out.push(self.make_chunk(
                text.to_string(),
                ChunkKind::Paragraph,
                &tracker.breadcrumb(),
                None,
                None,
                meta,
            ));
        }
        current.clear();
    }

    fn push_preamble(
        &self,
        preamble: &str,
        breadcrumb: &str,
        meta: &DocumentMeta,
        out: &mut Vec<Chunk>,
    ) {
        if char_len(preamble) <= self.chunk_size {
            out.push(self.make_chunk(
                preamble.to_string(),
                ChunkKind::Preamble,
                breadcrumb,
                None,
                None,
                meta,
            ));
            return;
        }

        let splitter = RecursiveSplitter::new(self.chunk_size, self.chunk_overlap);
        for piece in splitter.split(preamble) {
            out.push(self.make_chunk(piece, ChunkKind::Preamble, breadcrumb, None, None, meta));
        }
    }

    fn make_chunk(
        &self,
        content: String,
        kind: ChunkKind,
        breadcrumb: &str,
        article: Option<String>,
        part: Option<ChunkPart>,
        meta: &DocumentMeta,
    ) -> Chunk {
        Chunk {
            id: Uuid::new_v4(),
            content,
            source: meta.source.clone(),
            source_name: meta.source_name.clone(),
            source_kind: meta.kind,
            kind,
            breadcrumb: breadcrumb.to_string(),
            article,
            part,
            page: None,
        }
    }
}

impl Default for LegalChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Char-boundary-safe window of up to `len` bytes before `pos`.
fn preceding_window(text: &str, pos: usize, len: usize) -> &str {
    let mut start = pos.saturating_sub(len);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    &text[start..pos]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::SourceKind;

    fn pdf_meta() -> DocumentMeta {
        DocumentMeta {
            source: "/data/code_du_travail.pdf".into(),
            source_name: "Code du Travail".into(),
            kind: SourceKind::Pdf,
        }
    }

    #[test]
    fn two_articles_yield_two_complete_chunks() {
        let text = "Article 5\nLe salaire minimum est de 60000 XOF.\nArticle 6\nLe congé est de 2 jours par mois.";
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(text, &pdf_meta());

        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert_eq!(chunk.kind, ChunkKind::ArticleComplete);
            assert!(char_len(&chunk.content) < 1500);
            assert!(chunk.breadcrumb.is_empty());
        }
        assert_eq!(chunks[0].article.as_deref(), Some("Article 5"));
        assert_eq!(chunks[1].article.as_deref(), Some("Article 6"));
        assert!(chunks[0].content.contains("60000 XOF"));
        assert!(chunks[1].content.contains("2 jours"));
    }

    #[test]
    fn breadcrumb_follows_hierarchy_markers() {
        let text = "LIVRE I\n\nTITRE II\n\nArticle 1\nPremier contenu de l'article qui pose le principe général du droit.\n\nCHAPITRE 3\n\nArticle 2\nSecond contenu de l'article, plus spécifique.";
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(text, &pdf_meta());

        let art1 = chunks
            .iter()
            .find(|c| c.article.as_deref() == Some("Article 1"))
            .unwrap();
        let art2 = chunks
            .iter()
            .find(|c| c.article.as_deref() == Some("Article 2"))
            .unwrap();

        assert_eq!(art1.breadcrumb, "Livre I > Titre II");
        assert_eq!(art2.breadcrumb, "Livre I > Titre II > Chapitre 3");
        assert!(art2.content.starts_with("[Livre I > Titre II > Chapitre 3]"));
    }

    #[test]
    fn preamble_before_first_article_becomes_a_chunk() {
        let preamble = "LIVRE I\nDispositions générales applicables aux relations de travail entre employeurs et salariés au Sénégal.";
        let text = format!("{preamble}\n\nArticle 1\nLe présent code régit les relations de travail.");
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(&text, &pdf_meta());

        assert_eq!(chunks[0].kind, ChunkKind::Preamble);
        assert!(chunks[0].content.contains("Dispositions générales"));
        assert_eq!(chunks[0].breadcrumb, "Livre I");
        assert!(chunks.iter().any(|c| c.kind == ChunkKind::ArticleComplete));
    }

    #[test]
    fn tiny_preamble_is_skipped() {
        let text = "PREAMBULE\n\nArticle 1\nLe présent code régit les relations de travail.";
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(text, &pdf_meta());
        assert!(chunks.iter().all(|c| c.kind != ChunkKind::Preamble));
    }

    #[test]
    fn long_article_is_subsplit_with_part_numbers() {
        let body = "Le contrat de travail à durée déterminée doit comporter la définition précise de son motif. ".repeat(30);
        let text = format!("Article 7\n{body}");
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(&text, &pdf_meta());

        assert!(chunks.len() >= 2, "expected a sub-split, got {}", chunks.len());
        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.kind, ChunkKind::ArticlePartial);
            assert_eq!(chunk.article.as_deref(), Some("Article 7"));
            let part = chunk.part.expect("partial chunks carry part numbering");
            assert_eq!(part.number, i + 1);
            assert_eq!(part.total, total);
            assert!(char_len(&chunk.content) <= 1500 + 60);
        }
        // Every continuation repeats the article header.
        assert!(chunks[1].content.starts_with("Article 7 (suite)"));
    }

    #[test]
    fn part_numbers_cover_range_exactly_once() {
        let body = "Phrase récurrente sur les obligations contractuelles des parties. ".repeat(60);
        let text = format!("Article 12\n{body}");
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(&text, &pdf_meta());

        let mut numbers: Vec<usize> = chunks.iter().map(|c| c.part.unwrap().number).collect();
        numbers.sort_unstable();
        let total = chunks[0].part.unwrap().total;
        assert_eq!(numbers, (1..=total).collect::<Vec<_>>());
    }

    #[test]
    fn no_articles_falls_back_to_paragraphs() {
        let text = "Exposé des motifs de la réforme du travail.\n\nLa présente loi modernise le cadre des relations professionnelles.\n\nElle renforce la protection des salariés.";
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(text, &pdf_meta());

        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.kind == ChunkKind::Paragraph));
        assert!(chunks.iter().all(|c| c.article.is_none()));
    }

    #[test]
    fn paragraph_fallback_respects_chunk_size() {
        let para = "Une disposition transitoire encadrant la mise en conformité des conventions collectives existantes. ";
        let text = (0..30)
            .map(|_| para.trim())
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunker = LegalChunker::with_sizes(300, 50);
        let chunks = chunker.chunk_document(&text, &pdf_meta());

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(char_len(&chunk.content) <= 300);
        }
    }

    #[test]
    fn empty_and_noise_only_documents_yield_no_chunks() {
        let chunker = LegalChunker::new();
        assert!(chunker.chunk_document("", &pdf_meta()).is_empty());
        assert!(chunker
            .chunk_document("--- PAGE 1 ---\n12\npage 1 / 3", &pdf_meta())
            .is_empty());
    }

    #[test]
    fn no_article_content_is_dropped() {
        let text = "Article 1\nLe droit au travail est garanti à chaque citoyen.\nArticle 2\nLa durée légale du travail est de quarante heures.\nArticle 3\nLe repos hebdomadaire est obligatoire.";
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(text, &pdf_meta());

        assert_eq!(chunks.len(), 3);
        for needle in [
            "garanti à chaque citoyen",
            "quarante heures",
            "repos hebdomadaire",
        ] {
            assert!(
                chunks.iter().any(|c| c.content.contains(needle)),
                "lost content: {needle}"
            );
        }
    }

    #[test]
    fn every_article_is_represented_whatever_its_length() {
        let long_body =
            "La convention collective détermine les conditions d'emploi et de rémunération. "
                .repeat(40);
        let text = format!(
            "Article 1\nDisposition courte sur le champ d'application.\nArticle 2\n{long_body}\nArticle 3\nAutre disposition courte sur les sanctions.\nArticle 4\nDisposition finale d'entrée en vigueur."
        );
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(&text, &pdf_meta());

        for label in ["Article 1", "Article 2", "Article 3", "Article 4"] {
            assert!(
                chunks.iter().any(|c| c.article.as_deref() == Some(label)),
                "article not represented: {label}"
            );
        }
        // The long article spans several parts; the short ones exactly one.
        let parts_of_2 = chunks
            .iter()
            .filter(|c| c.article.as_deref() == Some("Article 2"))
            .count();
        assert!(parts_of_2 >= 2);
    }

    #[test]
    fn web_document_uses_web_chunking() {
        let text = "La Constitution garantit les libertés fondamentales. ".repeat(40);
        let meta = DocumentMeta {
            source: "https://conseilconstitutionnel.sn/la-constitution/".into(),
            source_name: "Constitution du Sénégal".into(),
            kind: SourceKind::Web,
        };
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_web_document(&text, &meta);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert_eq!(chunk.kind, ChunkKind::WebContent);
            assert!(char_len(&chunk.content) <= 1000);
            assert!(chunk.breadcrumb.is_empty());
        }
    }

    #[test]
    fn chunks_carry_source_metadata() {
        let text = "Article 1\nLe présent code régit les relations individuelles de travail.";
        let chunker = LegalChunker::new();
        let chunks = chunker.chunk_document(text, &pdf_meta());

        assert_eq!(chunks[0].source_name, "Code du Travail");
        assert_eq!(chunks[0].source_kind, SourceKind::Pdf);
        assert_eq!(chunks[0].source, "/data/code_du_travail.pdf");
    }
}
