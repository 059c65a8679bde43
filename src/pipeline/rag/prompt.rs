//! Prompt templates and canned fallback answers.

use super::types::{ChatMessage, ChatRole};
use crate::config;
use crate::text_util::truncate_chars;

/// System prompt for the router model. Constrained to a two-word verdict.
pub const ROUTER_SYSTEM_PROMPT: &str =
    "Réponds 'JURIDIQUE' ou 'AUTRE'. En cas de doute: 'JURIDIQUE'.";

/// System prompt for answer generation: the model answers strictly from the
/// supplied context and cites articles.
pub const ANSWER_SYSTEM_PROMPT: &str = "Tu es YoonAssist, assistant juridique sénégalais. Réponds UNIQUEMENT avec le CONTEXTE fourni.

RÈGLES:
- Réponse COMPLÈTE mais CONCISE (2-4 phrases + liste si nécessaire)
- Commence directement par l'information demandée
- Détails utiles: montants, délais, conditions
- Cite les articles: [Article X du Code Y]
- Si info absente: \"Je ne dispose pas de cette information dans les textes fournis.\"";

/// System prompt for the coherence regeneration pass: the first draft denied
/// having information although passages were retrieved, so this pass is
/// forbidden from the no-information phrasing.
pub const REGENERATION_SYSTEM_PROMPT: &str = "Tu es YoonAssist, assistant juridique sénégalais. Le CONTEXTE fourni contient des extraits pertinents. Réponds à la question en citant ces extraits. Il est INTERDIT de répondre que l'information n'est pas disponible.";

/// Build the generation prompt: recent history, context block, question.
pub fn build_answer_prompt(question: &str, context: &str, history: &[ChatMessage]) -> String {
    let mut prompt = String::new();

    let recent: Vec<&ChatMessage> = history
        .iter()
        .rev()
        .take(config::HISTORY_TURNS)
        .rev()
        .collect();
    if !recent.is_empty() {
        prompt.push_str("HISTORIQUE:\n");
        for message in recent {
            match message.role {
                ChatRole::User => {
                    prompt.push_str(&format!("U: {}\n", truncate_chars(&message.content, 100)));
                }
                ChatRole::Assistant => {
                    prompt.push_str(&format!("A: {}\n", truncate_chars(&message.content, 150)));
                }
            }
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("CONTEXTE:\n{context}\n\n"));
    prompt.push_str(&format!("QUESTION: {question}\n\n"));
    prompt.push_str("RÉPONSE:");

    prompt
}

/// Polite refusal for questions outside Senegalese law.
pub fn off_topic_answer() -> String {
    "Je suis un assistant spécialisé dans le droit sénégalais. Je ne peux répondre qu'aux questions juridiques concernant le Sénégal (Code du Travail, Code Pénal, Constitution, etc.).".to_string()
}

/// Answer when retrieval found nothing usable.
pub fn no_context_answer() -> String {
    "Je ne dispose pas de cette information dans les textes de loi fournis. Veuillez reformuler votre question ou consulter un professionnel du droit.".to_string()
}

/// Fixed apologetic answer when the generation backend is unreachable.
pub fn generation_failure_answer() -> String {
    "Une erreur s'est produite lors du traitement de votre question. Veuillez réessayer dans quelques instants.".to_string()
}
