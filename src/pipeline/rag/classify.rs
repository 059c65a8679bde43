//! Question classification and legal-domain detection, keyword-first.
//!
//! The keyword fast path answers most questions without an LLM round-trip;
//! only ambiguous questions go to the router model, and any router failure
//! defaults to treating the question as legal.

use super::orchestrator::LlmGenerate;
use super::prompt::ROUTER_SYSTEM_PROMPT;
use super::types::{LegalDomain, QueryCategory};

/// Words that mark a question as legal without needing the router.
const LEGAL_KEYWORDS: &[&str] = &[
    "travail",
    "employeur",
    "salarié",
    "salarie",
    "contrat",
    "licenciement",
    "congé",
    "conge",
    "salaire",
    "retraite",
    "syndicat",
    "grève",
    "greve",
    "pénal",
    "penal",
    "peine",
    "infraction",
    "tribunal",
    "constitution",
    "président",
    "president",
    "parlement",
    "droit",
    "loi",
    "décret",
    "decret",
    "code",
    "article",
    "sénégal",
    "senegal",
    "juridique",
    "juridiction",
    "obligation",
    "sanction",
];

/// Domain keyword tables, in detection priority order.
const DOMAIN_KEYWORDS: &[(LegalDomain, &[&str])] = &[
    (
        LegalDomain::Labor,
        &[
            "travail",
            "employeur",
            "salarié",
            "salarie",
            "congé",
            "conge",
            "salaire",
            "licenciement",
            "embauche",
            "préavis",
            "preavis",
            "syndicat",
            "grève",
            "greve",
            "retraite",
            "pension",
            "cotisation",
        ],
    ),
    (
        LegalDomain::Penal,
        &[
            "pénal",
            "penal",
            "peine",
            "infraction",
            "crime",
            "délit",
            "delit",
            "vol",
            "prison",
            "amende",
            "harcèlement",
            "harcelement",
            "plainte",
        ],
    ),
    (
        LegalDomain::Finance,
        &["impôt", "impot", "taxe", "fiscal", "budget", "douane", "finances"],
    ),
    (
        LegalDomain::Constitutional,
        &[
            "constitution",
            "président",
            "president",
            "parlement",
            "élection",
            "election",
            "assemblée",
            "assemblee",
            "référendum",
            "referendum",
        ],
    ),
    (
        LegalDomain::Administrative,
        &[
            "administration",
            "fonctionnaire",
            "collectivité",
            "collectivite",
            "commune",
            "préfet",
            "prefet",
            "décret",
            "decret",
        ],
    ),
    (
        LegalDomain::Aviation,
        &[
            "aviation",
            "aérien",
            "aerien",
            "aéronef",
            "aeronef",
            "aéroport",
            "aeroport",
            "pilote",
        ],
    ),
];

/// Classify a citizen question as legal or off-topic.
pub fn classify_question<G: LlmGenerate>(question: &str, router: &G) -> QueryCategory {
    let lower = question.to_lowercase();

    if LEGAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return QueryCategory::Legal;
    }

    // Ambiguous: ask the router model; doubt resolves to Legal.
    match router.generate(ROUTER_SYSTEM_PROMPT, question) {
        Ok(response) if response.to_uppercase().contains("AUTRE") => QueryCategory::OffTopic,
        Ok(_) => QueryCategory::Legal,
        Err(e) => {
            tracing::warn!(error = %e, "router classification failed, defaulting to legal");
            QueryCategory::Legal
        }
    }
}

/// Detect the dominant legal domain of a text by keyword hits.
pub fn detect_domain(text: &str) -> LegalDomain {
    let lower = text.to_lowercase();

    let mut best = LegalDomain::General;
    let mut best_hits = 0usize;
    for (domain, keywords) in DOMAIN_KEYWORDS {
        let hits = keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if hits > best_hits {
            best = *domain;
            best_hits = hits;
        }
    }
    best
}

/// Lowercased query words longer than 3 chars, punctuation trimmed.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.chars().count() > 3)
        .map(|word| word.to_lowercase())
        .collect()
}
