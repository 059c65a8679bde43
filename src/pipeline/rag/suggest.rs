//! Suggested follow-up questions.
//!
//! A fixed catalog of citizen questions is scored against the answered
//! question — same-domain bonus plus shared-word overlap — and the top three
//! are returned. No LLM call; deterministic by construction.

use super::classify::detect_domain;
use super::coherence::is_no_info_answer;
use super::types::{LegalDomain, SourceRecord};

/// Number of follow-up questions surfaced to the caller.
const SUGGESTION_COUNT: usize = 3;
/// Shared words shorter than this carry no signal.
const MIN_SHARED_WORD_CHARS: usize = 5;
/// Score bonus when catalog question and answered question share a domain.
const DOMAIN_BONUS: usize = 5;

/// Catalog of citizen questions, grouped by theme.
pub const CITIZEN_QUESTIONS: &[&str] = &[
    // Travail
    "Combien de jours de congé ai-je droit par an ?",
    "Mon employeur peut-il me licencier sans préavis ?",
    "Que faire si mon employeur ne me paie pas ?",
    "Comment démissionner de mon travail ?",
    "Quels sont mes droits si je suis licencié ?",
    "Est-ce que j'ai droit à un contrat écrit ?",
    "Quelle est la durée légale du travail au Sénégal ?",
    "Ai-je droit à une pause pendant ma journée ?",
    "Quels sont mes droits en cas d'accident de travail ?",
    "Ai-je droit à un congé de maternité ?",
    "Quel est le salaire minimum au Sénégal ?",
    "Combien de temps dure la période d'essai ?",
    // Retraite
    "À quel âge puis-je partir à la retraite ?",
    "Comment calculer ma pension de retraite ?",
    "Combien d'années faut-il cotiser pour la retraite ?",
    // Droits fondamentaux
    "Le travail forcé est-il interdit au Sénégal ?",
    "Ai-je le droit de m'exprimer librement au travail ?",
    "Peut-on me discriminer à l'embauche ?",
    // Syndicats
    "Ai-je le droit de créer un syndicat ?",
    "Puis-je faire grève au Sénégal ?",
    // Justice
    "Quelles sont les sanctions pour harcèlement au travail ?",
    "Comment porter plainte contre mon employeur ?",
    "Comment saisir l'inspection du travail ?",
];

/// Pick up to three follow-up questions related to an answered question.
///
/// Empty when the answer carries no information or no sources — suggesting
/// follow-ups under a failed answer reads as sarcasm.
pub fn suggest_questions(question: &str, sources: &[SourceRecord], answer: &str) -> Vec<String> {
    if sources.is_empty() || answer.trim().is_empty() || is_no_info_answer(answer) {
        return Vec::new();
    }

    let question_lower = question.to_lowercase();
    let question_domain = detect_domain(question);
    let question_words: Vec<String> = question_lower
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_SHARED_WORD_CHARS)
        .map(|w| w.to_string())
        .collect();

    let mut scored: Vec<(usize, &&str)> = CITIZEN_QUESTIONS
        .iter()
        .filter(|candidate| candidate.to_lowercase() != question_lower)
        .map(|candidate| {
            let candidate_lower = candidate.to_lowercase();
            let mut score = 0;

            if question_domain != LegalDomain::General
                && detect_domain(candidate) == question_domain
            {
                score += DOMAIN_BONUS;
            }

            score += question_words
                .iter()
                .filter(|w| candidate_lower.contains(*w))
                .count();

            (score, candidate)
        })
        .collect();

    // Stable sort keeps catalog order among equal scores — deterministic.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(SUGGESTION_COUNT)
        .map(|(_, q)| q.to_string())
        .collect()
}
