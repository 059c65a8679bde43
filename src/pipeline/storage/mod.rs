pub mod articles;
pub mod chunker;
pub mod embedder;
pub mod hierarchy;
pub mod orchestrator;
pub mod splitter;
pub mod types;
pub mod vectordb;

use thiserror::Error;

use crate::pipeline::extraction::ExtractionError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Vector store error: {0}")]
    VectorDb(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Index verification failed: {0}")]
    Verification(String),
}
