//! Candidate reranking: one interface, two interchangeable strategies.
//!
//! The learned cross-encoder gives the best ordering but is slow and memory
//! hungry; the keyword/domain heuristic keeps constrained deployments usable.
//! Reranking is a quality enhancement, never a hard dependency — every
//! failure path degrades to the similarity order coming out of retrieval.

use super::classify::{detect_domain, extract_keywords};
use super::types::{LegalDomain, RetrievedCandidate};
use super::RagError;
use crate::config;
use crate::text_util::{char_len, split_sentences};

/// Reorder and filter candidates down to the most relevant subset.
pub trait Reranker {
    fn rerank(&self, query: &str, candidates: Vec<RetrievedCandidate>) -> Vec<RetrievedCandidate>;
}

/// Learned relevance signal: scores (query, passage) pairs.
pub trait CrossEncoder {
    fn scores(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, RagError>;
}

/// Reranker backed by a cross-encoder model, scoring in fixed-size batches
/// to bound memory. Any scoring failure falls back to the first `top_n`
/// candidates unscored.
pub struct CrossEncoderReranker<C: CrossEncoder> {
    encoder: C,
    top_n: usize,
    batch_size: usize,
}

impl<C: CrossEncoder> CrossEncoderReranker<C> {
    pub fn new(encoder: C) -> Self {
        Self {
            encoder,
            top_n: config::RERANK_TOP_N,
            batch_size: config::RERANK_BATCH_SIZE,
        }
    }

    pub fn with_top_n(encoder: C, top_n: usize) -> Self {
        Self {
            encoder,
            top_n,
            batch_size: config::RERANK_BATCH_SIZE,
        }
    }

    fn score_all(&self, query: &str, candidates: &[RetrievedCandidate]) -> Result<Vec<f32>, RagError> {
        let mut scores = Vec::with_capacity(candidates.len());
        for batch in candidates.chunks(self.batch_size) {
            let passages: Vec<&str> = batch.iter().map(|c| c.chunk.content.as_str()).collect();
            let batch_scores = self.encoder.scores(query, &passages)?;
            if batch_scores.len() != passages.len() {
                return Err(RagError::Rerank(format!(
                    "encoder returned {} scores for {} passages",
                    batch_scores.len(),
                    passages.len()
                )));
            }
            scores.extend(batch_scores);
        }
        Ok(scores)
    }
}

impl<C: CrossEncoder> Reranker for CrossEncoderReranker<C> {
    fn rerank(&self, query: &str, candidates: Vec<RetrievedCandidate>) -> Vec<RetrievedCandidate> {
        if candidates.len() <= self.top_n {
            return candidates;
        }

        match self.score_all(query, &candidates) {
            Ok(scores) => {
                let mut scored: Vec<RetrievedCandidate> = candidates
                    .into_iter()
                    .zip(scores)
                    .map(|(mut candidate, score)| {
                        candidate.score = score;
                        candidate
                    })
                    .collect();
                scored.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scored.truncate(self.top_n);
                scored
            }
            Err(e) => {
                tracing::warn!(error = %e, "cross-encoder failed, keeping similarity order");
                let mut fallback = candidates;
                fallback.truncate(self.top_n);
                fallback
            }
        }
    }
}

/// Lightweight heuristic reranker: keyword overlap weighted by word length,
/// plus a legal-domain match bonus. Used when no cross-encoder is deployed.
pub struct KeywordDomainReranker {
    top_n: usize,
    min_results: usize,
    score_threshold: f32,
}

/// Bonus for a candidate whose source domain matches the query's.
const DOMAIN_MATCH_BONUS: f32 = 5.0;
/// Penalty for two distinct non-general domains.
const DOMAIN_MISMATCH_PENALTY: f32 = -2.0;

impl KeywordDomainReranker {
    pub fn new() -> Self {
        Self {
            top_n: config::RERANK_TOP_N,
            min_results: config::MIN_RERANK_RESULTS,
            score_threshold: 1.0,
        }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::new()
        }
    }
}

impl Default for KeywordDomainReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl Reranker for KeywordDomainReranker {
    fn rerank(&self, query: &str, candidates: Vec<RetrievedCandidate>) -> Vec<RetrievedCandidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let query_domain = detect_domain(query);

        let mut scored: Vec<(f32, RetrievedCandidate)> = candidates
            .iter()
            .map(|candidate| {
                let text = format!("{} {}", candidate.chunk.source_name, candidate.chunk.content);
                let score = score_candidate(query, query_domain, &text, None);
                (score, candidate.clone())
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut selected: Vec<RetrievedCandidate> = scored
            .iter()
            .filter(|(score, _)| *score >= self.score_threshold)
            .take(self.top_n)
            .map(|(score, candidate)| RetrievedCandidate {
                chunk: candidate.chunk.clone(),
                score: *score,
            })
            .collect();

        // Below the minimum: backfill with the next-highest regardless of
        // threshold.
        if selected.len() < self.min_results {
            for (score, candidate) in &scored {
                if selected.len() >= self.min_results {
                    break;
                }
                if selected
                    .iter()
                    .any(|s| s.chunk.id == candidate.chunk.id)
                {
                    continue;
                }
                selected.push(RetrievedCandidate {
                    chunk: candidate.chunk.clone(),
                    score: *score,
                });
            }
        }

        selected
    }
}

/// Heuristic relevance of a candidate text to a query.
///
/// `draft_answer` is only supplied by post-hoc source selection, where
/// literal sentence overlap with an already-drafted answer is a strong
/// signal that the passage actually backed it.
pub fn score_candidate(
    query: &str,
    query_domain: LegalDomain,
    candidate_text: &str,
    draft_answer: Option<&str>,
) -> f32 {
    let lower = candidate_text.to_lowercase();
    let mut score = 0.0f32;

    for keyword in extract_keywords(query) {
        if lower.contains(&keyword) {
            score += char_len(&keyword) as f32;
        }
    }

    let candidate_domain = detect_domain(candidate_text);
    if query_domain != LegalDomain::General && candidate_domain == query_domain {
        score += DOMAIN_MATCH_BONUS;
    } else if query_domain != LegalDomain::General
        && candidate_domain != LegalDomain::General
        && candidate_domain != query_domain
    {
        score += DOMAIN_MISMATCH_PENALTY;
    }

    if let Some(answer) = draft_answer {
        score += answer_overlap_bonus(candidate_text, answer);
    }

    score
}

/// Literal sentence-level overlap between a passage and a drafted answer.
pub fn answer_overlap_bonus(candidate_text: &str, answer: &str) -> f32 {
    let answer_lower = answer.to_lowercase();
    let mut bonus = 0.0f32;

    for (_, sentence) in split_sentences(candidate_text) {
        let sentence = sentence.trim().to_lowercase();
        if char_len(&sentence) > 20 && answer_lower.contains(&sentence) {
            bonus += 2.0;
        }
    }
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::SourceKind;
    use crate::pipeline::storage::types::{Chunk, ChunkKind};
    use uuid::Uuid;

    fn candidate(source_name: &str, content: &str, score: f32) -> RetrievedCandidate {
        RetrievedCandidate {
            chunk: Chunk {
                id: Uuid::new_v4(),
                content: content.to_string(),
                source: format!("/data/{source_name}.pdf"),
                source_name: source_name.to_string(),
                source_kind: SourceKind::Pdf,
                kind: ChunkKind::ArticleComplete,
                breadcrumb: String::new(),
                article: None,
                part: None,
                page: None,
            },
            score,
        }
    }

    /// Cross-encoder stub with fixed scores or a failure.
    struct StubEncoder {
        outcome: Result<Vec<f32>, ()>,
    }

    impl CrossEncoder for StubEncoder {
        fn scores(&self, _query: &str, passages: &[&str]) -> Result<Vec<f32>, RagError> {
            match &self.outcome {
                Ok(scores) => Ok(scores[..passages.len()].to_vec()),
                Err(()) => Err(RagError::Rerank("out of memory".into())),
            }
        }
    }

    fn pool(n: usize) -> Vec<RetrievedCandidate> {
        (0..n)
            .map(|i| candidate("Code du Travail", &format!("contenu numéro {i}"), 0.5))
            .collect()
    }

    #[test]
    fn cross_encoder_orders_by_learned_score() {
        let encoder = StubEncoder {
            outcome: Ok(vec![0.1, 0.9, 0.5, 0.3, 0.8, 0.2]),
        };
        let reranker = CrossEncoderReranker::new(encoder);
        let results = reranker.rerank("question", pool(6));

        assert_eq!(results.len(), 3);
        assert!(results[0].chunk.content.contains("numéro 1"));
        assert!(results[1].chunk.content.contains("numéro 4"));
        assert!(results[2].chunk.content.contains("numéro 2"));
    }

    #[test]
    fn cross_encoder_failure_keeps_first_n_unmodified() {
        let encoder = StubEncoder { outcome: Err(()) };
        let reranker = CrossEncoderReranker::new(encoder);
        let candidates = pool(6);
        let expected: Vec<_> = candidates.iter().take(3).map(|c| c.chunk.id).collect();

        let results = reranker.rerank("question", candidates);
        let got: Vec<_> = results.iter().map(|c| c.chunk.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn list_smaller_than_top_n_is_returned_whole() {
        let encoder = StubEncoder {
            outcome: Ok(vec![0.9, 0.1]),
        };
        let reranker = CrossEncoderReranker::new(encoder);
        let candidates = pool(2);
        let expected: Vec<_> = candidates.iter().map(|c| c.chunk.id).collect();

        let results = reranker.rerank("question", candidates);
        let got: Vec<_> = results.iter().map(|c| c.chunk.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn heuristic_ranks_keyword_matches_first() {
        let candidates = vec![
            candidate("Code du Travail", "Article 6\nLe congé est de 2 jours par mois.", 0.5),
            candidate(
                "Code du Travail",
                "Article 5\nLe salaire minimum est de 60000 XOF.",
                0.5,
            ),
            candidate("Code Pénal", "Article 300\nLe vol est puni d'emprisonnement.", 0.5),
            candidate("Code Pénal", "Article 301\nLes amendes sont doublées.", 0.5),
        ];

        let reranker = KeywordDomainReranker::new();
        let results = reranker.rerank("salaire minimum", candidates);

        assert!(results.len() <= 3);
        assert!(results[0].chunk.content.contains("60000"));
    }

    #[test]
    fn heuristic_prefers_matching_domain() {
        let labor = "Le salarié bénéficie de congés payés et d'un préavis.";
        let penal = "Les peines d'emprisonnement et amendes applicables au vol.";
        let candidates = vec![
            candidate("Code Pénal", penal, 0.5),
            candidate("Code du Travail", labor, 0.5),
            candidate("Code Pénal", "Les infractions sont des délits ou crimes.", 0.5),
            candidate("Code Pénal", "La récidive aggrave la peine encourue.", 0.5),
        ];

        let reranker = KeywordDomainReranker::new();
        let results = reranker.rerank("Quels sont mes droits de congé au travail ?", candidates);
        assert!(results[0].chunk.content.contains("congés payés"));
    }

    #[test]
    fn heuristic_backfills_below_threshold() {
        // Nothing matches the query keywords: threshold filters everything,
        // backfill still returns the minimum result count.
        let candidates = vec![
            candidate("Code Pénal", "Contenu un sans rapport.", 0.5),
            candidate("Code Pénal", "Contenu deux sans rapport.", 0.4),
            candidate("Code Pénal", "Contenu trois sans rapport.", 0.3),
            candidate("Code Pénal", "Contenu quatre sans rapport.", 0.2),
        ];

        let reranker = KeywordDomainReranker::new();
        let results = reranker.rerank("xyzabc introuvable", candidates);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn heuristic_keeps_small_lists_whole() {
        // Equal scores: the stable sort preserves the similarity order.
        let candidates = vec![
            candidate("Code du Travail", "Un seul candidat disponible.", 0.5),
            candidate("Code du Travail", "Un second candidat disponible.", 0.4),
        ];
        let expected: Vec<_> = candidates.iter().map(|c| c.chunk.id).collect();

        let reranker = KeywordDomainReranker::new();
        let results = reranker.rerank("xyzintrouvable", candidates);
        let got: Vec<_> = results.iter().map(|c| c.chunk.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn heuristic_reorders_a_two_candidate_pool() {
        // Both chunks retrieved; the keyword scorer must put the salary
        // article first even below the top-n bound.
        let candidates = vec![
            candidate("Code du Travail", "Article 6\nLe congé est de 2 jours par mois.", 0.5),
            candidate(
                "Code du Travail",
                "Article 5\nLe salaire minimum est de 60000 XOF.",
                0.4,
            ),
        ];

        let reranker = KeywordDomainReranker::new();
        let results = reranker.rerank("salaire minimum", candidates);
        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.content.contains("60000"));
    }

    #[test]
    fn score_candidate_weights_by_keyword_length() {
        let score_both = score_candidate(
            "salaire minimum",
            LegalDomain::General,
            "le salaire minimum est fixé",
            None,
        );
        let score_one = score_candidate(
            "salaire minimum",
            LegalDomain::General,
            "le salaire est fixé",
            None,
        );
        assert!(score_both > score_one);
        assert_eq!(score_both, 14.0); // "salaire" (7) + "minimum" (7)
    }

    #[test]
    fn answer_overlap_rewards_quoted_sentences() {
        let passage = "Le salaire minimum interprofessionnel est fixé par décret. Les heures supplémentaires sont majorées.";
        let answer = "Selon le code, le salaire minimum interprofessionnel est fixé par décret.";
        assert!(answer_overlap_bonus(passage, answer) > 0.0);
        assert_eq!(answer_overlap_bonus(passage, "Réponse sans citation."), 0.0);
    }

    #[test]
    fn empty_candidate_list_stays_empty() {
        let reranker = KeywordDomainReranker::new();
        assert!(reranker.rerank("question", Vec::new()).is_empty());

        let encoder = StubEncoder { outcome: Ok(vec![]) };
        let cross = CrossEncoderReranker::new(encoder);
        assert!(cross.rerank("question", Vec::new()).is_empty());
    }
}
