use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StorageError;
use crate::pipeline::extraction::types::SourceKind;

/// What a chunk represents within its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Text before the first article of a structured law.
    Preamble,
    /// A whole article that fits in one chunk.
    ArticleComplete,
    /// One part of a sub-split long article.
    ArticlePartial,
    /// Paragraph-accumulated chunk of a document without articles.
    Paragraph,
    /// Plain split of a web page.
    WebContent,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Preamble => "preamble",
            ChunkKind::ArticleComplete => "article_complete",
            ChunkKind::ArticlePartial => "article_partial",
            ChunkKind::Paragraph => "paragraph",
            ChunkKind::WebContent => "web_content",
        }
    }
}

/// Position of a chunk within a sub-split article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPart {
    /// 1-based part number.
    pub number: usize,
    pub total: usize,
}

/// The unit of retrieval. Created once at ingestion, immutable thereafter.
///
/// `content` is the final formatted text, breadcrumb/article header included,
/// so the embedded chunk stays meaningful on its own at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub content: String,
    /// File path or URL of the source document.
    pub source: String,
    /// Citizen-readable source title ("Code du Travail", ...).
    pub source_name: String,
    pub source_kind: SourceKind,
    pub kind: ChunkKind,
    /// Hierarchy path at this position ("Livre I > Titre II"), may be empty.
    pub breadcrumb: String,
    /// Article label ("Article L.2"), absent for non-article chunks.
    pub article: Option<String>,
    /// Set for `ArticlePartial` chunks only.
    pub part: Option<ChunkPart>,
    /// Page number when the loader knows it.
    pub page: Option<u32>,
}

/// Source-document identity threaded through the chunker.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub source: String,
    pub source_name: String,
    pub kind: SourceKind,
}

/// Embedding model abstraction — the model itself is an external capability.
pub trait EmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, StorageError>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StorageError>;
    fn dimension(&self) -> usize;
}

/// Allow `Box<dyn EmbeddingModel>` wherever `&impl EmbeddingModel` is expected.
impl EmbeddingModel for Box<dyn EmbeddingModel> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, StorageError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StorageError> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Vector store abstraction. Ingestion replaces the store wholesale; query
/// traffic only reads.
pub trait VectorStore {
    /// Persist chunks with their embeddings. Counts must match.
    fn store_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>])
        -> Result<usize, StorageError>;

    /// Drop every persisted chunk (start of a full re-ingestion).
    fn clear(&self) -> Result<(), StorageError>;

    /// Number of persisted chunks.
    fn count(&self) -> Result<usize, StorageError>;

    /// Nearest neighbours of `query_embedding` by cosine similarity.
    fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f32)>, StorageError>;
}
