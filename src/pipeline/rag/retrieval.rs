//! Retriever adapter over the vector-store capability.
//!
//! Retrieval failures are absorbed here: an unreachable store or a failed
//! query embedding yields an empty candidate list, and the pipeline degrades
//! to its "no information found" path instead of surfacing an error.

use super::types::{RetrievedCandidate, VectorSearch};
use crate::pipeline::storage::types::EmbeddingModel;

/// Fetch up to `top_k` candidates for `question`, ranked by similarity.
pub fn semantic_search<E: EmbeddingModel, V: VectorSearch>(
    question: &str,
    embedder: &E,
    store: &V,
    top_k: usize,
) -> Vec<RetrievedCandidate> {
    let embedding = match embedder.embed(question) {
        Ok(embedding) => embedding,
        Err(e) => {
            tracing::warn!(error = %e, "query embedding failed, zero candidates");
            return Vec::new();
        }
    };

    match store.search(&embedding, top_k) {
        Ok(results) => results
            .into_iter()
            .map(|(chunk, score)| RetrievedCandidate { chunk, score })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "similarity search failed, zero candidates");
            Vec::new()
        }
    }
}
