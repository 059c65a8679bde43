use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "YoonAssist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the persisted retrieval collection.
pub const COLLECTION_NAME: &str = "juridiction_senegal";

// ── Chunking ────────────────────────────────────────────────────────────────

/// Target chunk size for legal documents (characters).
pub const CHUNK_SIZE: usize = 1500;
/// Overlap between consecutive sub-chunks of a long article.
pub const CHUNK_OVERLAP: usize = 200;
/// Target chunk size for web pages (characters).
pub const WEB_CHUNK_SIZE: usize = 1000;
/// An article whose raw content reaches this length is always sub-split.
pub const LONG_ARTICLE_THRESHOLD: usize = 2000;
/// Chunks at or below this length (trimmed) are dropped before persistence.
pub const MIN_CHUNK_CHARS: usize = 20;
/// Preamble text shorter than this is not worth a chunk of its own.
pub const MIN_PREAMBLE_CHARS: usize = 50;
/// How far back to look for hierarchy markers before an article heading.
pub const HIERARCHY_WINDOW: usize = 500;

// ── Retrieval & reranking ───────────────────────────────────────────────────

/// Candidate pool size handed to the reranker.
pub const RETRIEVAL_K: usize = 6;
/// Passages kept after reranking.
pub const RERANK_TOP_N: usize = 3;
/// The heuristic reranker backfills below-threshold candidates up to this count.
pub const MIN_RERANK_RESULTS: usize = 2;
/// Cross-encoder scoring batch size.
pub const RERANK_BATCH_SIZE: usize = 16;

// ── Context assembly ────────────────────────────────────────────────────────

/// Character cap on a source record's content excerpt.
pub const SOURCE_EXCERPT_CHARS: usize = 500;
/// Character cap per passage inside the LLM context block.
pub const CONTEXT_PASSAGE_CHARS: usize = 400;
/// Conversation turns included in the generation prompt.
pub const HISTORY_TURNS: usize = 4;

// ── Ingestion ───────────────────────────────────────────────────────────────

/// Chunks embedded and persisted per store batch.
pub const STORE_BATCH_SIZE: usize = 500;

/// Canonical web sources ingested alongside the PDF corpus.
pub const WEB_SOURCES: &[&str] = &[
    "https://conseilconstitutionnel.sn/la-constitution/",
    "https://primature.sn/publications/lois-et-reglements/code-des-collectivites-locales",
    "https://primature.sn/publications/lois-et-reglements/code-de-laviation-civile",
    "https://primature.sn/publications/lois-et-reglements/mises-jour-de-la-constitution",
];

// ── Paths & logging ─────────────────────────────────────────────────────────

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "yoonassist=info"
}

/// Application data directory: `~/YoonAssist/`.
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Location of the persisted chunk index.
pub fn index_path() -> PathBuf {
    app_data_dir()
        .join("index")
        .join(format!("{COLLECTION_NAME}.sqlite3"))
}
