//! Query-time pipeline: classify → retrieve → rerank → assemble → generate →
//! coherence → suggest, strictly in that order, one synchronous execution
//! per request.
//!
//! Failure policy: quality-enhancing stages (reranking, suggestions) degrade
//! silently; retrieval failures become the no-information path; only a dead
//! generation backend produces the fixed apologetic answer. `process_query`
//! never returns an error to the caller.

use super::classify::classify_question;
use super::coherence::enforce_coherence;
use super::context::assemble_context;
use super::prompt::{
    build_answer_prompt, generation_failure_answer, no_context_answer, off_topic_answer,
    ANSWER_SYSTEM_PROMPT,
};
use super::rerank::Reranker;
use super::retrieval::semantic_search;
use super::suggest::suggest_questions;
use super::types::{ChatMessage, ConversationState, QueryCategory, QueryResponse, VectorSearch};
use super::RagError;
use crate::config;
use crate::pipeline::storage::types::EmbeddingModel;

/// Single-turn text generation within the pipeline.
pub trait LlmGenerate {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RagError>;
}

/// The full query pipeline over injected collaborators.
pub struct LegalRagPipeline<'a, G, E, V, R>
where
    G: LlmGenerate,
    E: EmbeddingModel,
    V: VectorSearch,
    R: Reranker,
{
    router: &'a G,
    generator: &'a G,
    embedder: &'a E,
    store: &'a V,
    reranker: &'a R,
    retrieval_k: usize,
}

impl<'a, G, E, V, R> LegalRagPipeline<'a, G, E, V, R>
where
    G: LlmGenerate,
    E: EmbeddingModel,
    V: VectorSearch,
    R: Reranker,
{
    pub fn new(
        router: &'a G,
        generator: &'a G,
        embedder: &'a E,
        store: &'a V,
        reranker: &'a R,
    ) -> Self {
        Self {
            router,
            generator,
            embedder,
            store,
            reranker,
            retrieval_k: config::RETRIEVAL_K,
        }
    }

    /// Answer a citizen question from the indexed legal corpus.
    pub fn process_query(&self, question: &str, history: &[ChatMessage]) -> QueryResponse {
        let mut state = ConversationState::new(question, history);

        state.category = classify_question(question, self.router);
        if state.category == QueryCategory::OffTopic {
            tracing::info!("off-topic question refused");
            state.answer = off_topic_answer();
            state.messages.push(ChatMessage::assistant(state.answer.clone()));
            return state.into_response();
        }

        state.candidates = semantic_search(question, self.embedder, self.store, self.retrieval_k);
        let selected = self
            .reranker
            .rerank(question, std::mem::take(&mut state.candidates));

        if selected.is_empty() {
            tracing::info!("no candidates survived retrieval, no-information answer");
            state.answer = no_context_answer();
            state.messages.push(ChatMessage::assistant(state.answer.clone()));
            return state.into_response();
        }

        let assembled = assemble_context(question, &selected);
        let prompt = build_answer_prompt(question, &assembled.text, history);

        let draft = match self.generator.generate(ANSWER_SYSTEM_PROMPT, &prompt) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("generation returned empty text");
                state.answer = generation_failure_answer();
                state.messages.push(ChatMessage::assistant(state.answer.clone()));
                return state.into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "generation failed");
                state.answer = generation_failure_answer();
                state.messages.push(ChatMessage::assistant(state.answer.clone()));
                return state.into_response();
            }
        };

        let coherent = enforce_coherence(
            question,
            draft,
            assembled.sources,
            &assembled.text,
            self.generator,
        );

        state.answer = coherent.answer;
        state.sources = coherent.sources;
        state.suggested_questions = suggest_questions(question, &state.sources, &state.answer);
        state.messages.push(ChatMessage::assistant(state.answer.clone()));

        state.into_response()
    }
}
