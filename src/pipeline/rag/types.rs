use serde::{Deserialize, Serialize};

use super::RagError;
use crate::pipeline::storage::types::{Chunk, VectorStore};

/// Whether a question belongs to the legal assistant at all.
///
/// Serialized forms are part of the serving contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryCategory {
    #[serde(rename = "JURIDIQUE")]
    Legal,
    #[serde(rename = "AUTRE")]
    OffTopic,
}

/// Coarse legal domain used to bias relevance scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalDomain {
    #[serde(rename = "travail")]
    Labor,
    #[serde(rename = "penal")]
    Penal,
    #[serde(rename = "finance")]
    Finance,
    #[serde(rename = "constitutionnel")]
    Constitutional,
    #[serde(rename = "administratif")]
    Administrative,
    #[serde(rename = "aviation")]
    Aviation,
    #[serde(rename = "general")]
    General,
}

impl LegalDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalDomain::Labor => "travail",
            LegalDomain::Penal => "penal",
            LegalDomain::Finance => "finance",
            LegalDomain::Constitutional => "constitutionnel",
            LegalDomain::Administrative => "administratif",
            LegalDomain::Aviation => "aviation",
            LegalDomain::General => "general",
        }
    }
}

/// A chunk returned by similarity search, not yet reranked. Lives only
/// within one query's processing.
#[derive(Debug, Clone)]
pub struct RetrievedCandidate {
    pub chunk: Chunk,
    pub score: f32,
}

/// Externally-visible projection of a chunk that backed an answer.
///
/// Round-trips through JSON in the serving layer; field names are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    pub title: String,
    /// Length-capped excerpt of the chunk text.
    pub content: String,
    pub article: Option<String>,
    pub breadcrumb: String,
    pub page: Option<u32>,
    pub url: Option<String>,
    pub domain: LegalDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the conversation history supplied by the serving layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Everything the pipeline accumulates for one question. Created per
/// request, threaded through the stages, discarded after the response.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub question: String,
    pub category: QueryCategory,
    pub candidates: Vec<RetrievedCandidate>,
    pub answer: String,
    pub sources: Vec<SourceRecord>,
    pub messages: Vec<ChatMessage>,
    pub suggested_questions: Vec<String>,
}

impl ConversationState {
    pub fn new(question: &str, history: &[ChatMessage]) -> Self {
        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(question));
        Self {
            question: question.to_string(),
            category: QueryCategory::Legal,
            candidates: Vec::new(),
            answer: String::new(),
            sources: Vec::new(),
            messages,
            suggested_questions: Vec::new(),
        }
    }

    /// Final projection handed back to the serving layer.
    pub fn into_response(self) -> QueryResponse {
        QueryResponse {
            answer: self.answer,
            category: self.category,
            sources: self.sources,
            suggested_questions: self.suggested_questions,
        }
    }
}

/// What `process_query` returns upward.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub category: QueryCategory,
    pub sources: Vec<SourceRecord>,
    pub suggested_questions: Vec<String>,
}

/// Query-side view of the vector store.
pub trait VectorSearch {
    fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f32)>, RagError>;
}

/// Every ingestion-side store is usable for querying as-is.
impl<S: VectorStore> VectorSearch for S {
    fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f32)>, RagError> {
        VectorStore::search(self, query_embedding, top_k)
            .map_err(|e| RagError::VectorSearch(e.to_string()))
    }
}
