pub mod classify;
pub mod coherence;
pub mod context;
pub mod groq;
pub mod orchestrator;
pub mod prompt;
pub mod rerank;
pub mod retrieval;
pub mod suggest;
pub mod types;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("LLM connection failed: {0}")]
    LlmConnection(String),

    #[error("LLM response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Vector search failed: {0}")]
    VectorSearch(String),

    #[error("Reranking failed: {0}")]
    Rerank(String),
}
