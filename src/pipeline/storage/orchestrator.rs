//! Full ingestion pipeline: load → clean/chunk → validate → embed → persist.
//!
//! Re-running an ingestion replaces the persisted collection wholesale; a
//! malformed document is skipped and the batch continues, but an unreachable
//! embedding backend or store aborts the run so no half-written index is
//! left behind unflagged.

use std::path::Path;

use serde::Serialize;

use crate::config;
use crate::pipeline::extraction::loader;
use crate::pipeline::extraction::types::{RawDocument, SourceKind};
use crate::text_util::char_len;

use super::chunker::LegalChunker;
use super::types::{Chunk, DocumentMeta, EmbeddingModel, VectorStore};
use super::StorageError;

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub chunks_written: usize,
}

pub struct IngestionPipeline<'a, E: EmbeddingModel, V: VectorStore> {
    embedder: &'a E,
    store: &'a V,
    chunker: LegalChunker,
    batch_size: usize,
}

impl<'a, E: EmbeddingModel, V: VectorStore> IngestionPipeline<'a, E, V> {
    pub fn new(embedder: &'a E, store: &'a V) -> Self {
        Self {
            embedder,
            store,
            chunker: LegalChunker::new(),
            batch_size: config::STORE_BATCH_SIZE,
        }
    }

    /// Ingest every supported document under `document_root`. Fully replaces
    /// the persisted collection.
    pub fn ingest(&self, document_root: &Path) -> Result<IngestReport, StorageError> {
        tracing::info!(root = %document_root.display(), "ingestion started");
        let documents = loader::load_directory(document_root)?;
        self.ingest_documents(&documents)
    }

    /// Like [`ingest`](Self::ingest), with web sources fetched on top of the
    /// file corpus (pass `config::WEB_SOURCES` for the canonical list).
    pub fn ingest_with_web(
        &self,
        document_root: &Path,
        urls: &[&str],
    ) -> Result<IngestReport, StorageError> {
        tracing::info!(root = %document_root.display(), urls = urls.len(), "ingestion started");
        let mut documents = loader::load_directory(document_root)?;
        documents.extend(loader::load_web_sources(urls));
        self.ingest_documents(&documents)
    }

    /// Ingest an already-loaded document set. Fully replaces the persisted
    /// collection; per-document failures are skipped.
    pub fn ingest_documents(&self, documents: &[RawDocument]) -> Result<IngestReport, StorageError> {
        let mut report = IngestReport::default();
        let mut all_chunks: Vec<Chunk> = Vec::new();

        for document in documents {
            let meta = DocumentMeta {
                source: document.source.clone(),
                source_name: loader::display_source_name(&document.source),
                kind: document.kind,
            };

            let chunks = match document.kind {
                SourceKind::Web => self.chunker.chunk_web_document(&document.text, &meta),
                SourceKind::Pdf | SourceKind::Text => {
                    self.chunker.chunk_document(&document.text, &meta)
                }
            };

            let valid: Vec<Chunk> = chunks
                .into_iter()
                .filter(|c| char_len(c.content.trim()) > config::MIN_CHUNK_CHARS)
                .collect();

            if valid.is_empty() {
                tracing::warn!(source = %document.source, "document yielded no valid chunks, skipped");
                report.documents_skipped += 1;
                continue;
            }

            tracing::info!(source = %document.source, chunks = valid.len(), "document chunked");
            report.documents_processed += 1;
            all_chunks.extend(valid);
        }

        if all_chunks.is_empty() {
            tracing::error!("no valid chunks across the whole batch; store left untouched");
            return Ok(report);
        }

        // Full replace: the previous collection is superseded, never patched.
        self.store.clear()?;

        for batch in all_chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts)?;
            report.chunks_written += self.store.store_chunks(batch, &embeddings)?;
        }

        self.verify(report.chunks_written)?;

        tracing::info!(
            documents = report.documents_processed,
            skipped = report.documents_skipped,
            chunks = report.chunks_written,
            "ingestion finished"
        );
        Ok(report)
    }

    /// Post-ingest check: the persisted count must match what was written,
    /// and a probe query must come back non-empty.
    fn verify(&self, expected: usize) -> Result<(), StorageError> {
        let count = self.store.count()?;
        if count != expected {
            return Err(StorageError::Verification(format!(
                "persisted {count} chunks, expected {expected}"
            )));
        }

        match self
            .embedder
            .embed("Article L.2 Code du Travail")
            .and_then(|embedding| self.store.search(&embedding, 3))
        {
            Ok(results) if results.is_empty() => {
                return Err(StorageError::Verification(
                    "probe query returned no results".into(),
                ))
            }
            Ok(results) => {
                tracing::info!(results = results.len(), "probe query succeeded");
            }
            Err(e) => {
                // The index is written; a failed probe is logged, not fatal.
                tracing::warn!(error = %e, "probe query failed");
            }
        }

        Ok(())
    }
}
