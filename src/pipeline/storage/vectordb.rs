//! Chunk index persistence and similarity search.
//!
//! `SqliteVectorStore` keeps one row per chunk (metadata as JSON, embedding
//! as a little-endian f32 BLOB) and answers nearest-neighbour queries by
//! brute-force cosine over the collection — small corpora, read-only at
//! query time, rebuilt wholesale by ingestion. `InMemoryVectorStore` backs
//! the test suites.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::types::{Chunk, VectorStore};
use super::StorageError;

/// Cosine similarity of two equal-length vectors; 0.0 on mismatch.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// SQLite-backed chunk index.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) the index at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory index.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS chunks (
                id         TEXT PRIMARY KEY,
                metadata   TEXT NOT NULL,
                embedding  BLOB NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl VectorStore for SqliteVectorStore {
    fn store_chunks(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<usize, StorageError> {
        if chunks.len() != embeddings.len() {
            return Err(StorageError::VectorDb(
                "Chunk count does not match embedding count".into(),
            ));
        }

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO chunks (id, metadata, embedding, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            let now = chrono::Utc::now().to_rfc3339();
            for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
                stmt.execute(params![
                    chunk.id.to_string(),
                    serde_json::to_string(chunk)?,
                    embedding_to_blob(embedding),
                    now,
                ])?;
            }
        }
        tx.commit()?;

        Ok(chunks.len())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM chunks", [])?;
        Ok(())
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f32)>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT metadata, embedding FROM chunks")?;
        let rows = stmt.query_map([], |row| {
            let metadata: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((metadata, blob))
        })?;

        let mut scored = Vec::new();
        for row in rows {
            let (metadata, blob) = row?;
            let chunk: Chunk = serde_json::from_str(&metadata)?;
            let score = cosine_similarity(query_embedding, &blob_to_embedding(&blob));
            scored.push((chunk, score));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// In-memory chunk index for tests.
pub struct InMemoryVectorStore {
    entries: Mutex<Vec<(Chunk, Vec<f32>)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn store_chunks(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<usize, StorageError> {
        if chunks.len() != embeddings.len() {
            return Err(StorageError::VectorDb(
                "Chunk count does not match embedding count".into(),
            ));
        }

        let mut entries = self.entries.lock().unwrap();
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            entries.push((chunk.clone(), embedding.clone()));
        }
        Ok(chunks.len())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.entries.lock().unwrap().len())
    }

    fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f32)>, StorageError> {
        let entries = self.entries.lock().unwrap();
        let mut scored: Vec<(Chunk, f32)> = entries
            .iter()
            .map(|(chunk, embedding)| {
                (chunk.clone(), cosine_similarity(query_embedding, embedding))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::SourceKind;
    use crate::pipeline::storage::types::ChunkKind;
    use uuid::Uuid;

    fn make_chunk(content: &str) -> Chunk {
        Chunk {
            id: Uuid::new_v4(),
            content: content.to_string(),
            source: "/data/code_du_travail.pdf".into(),
            source_name: "Code du Travail".into(),
            source_kind: SourceKind::Pdf,
            kind: ChunkKind::ArticleComplete,
            breadcrumb: String::new(),
            article: Some("Article 1".into()),
            part: None,
            page: None,
        }
    }

    #[test]
    fn cosine_similarity_identical_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((sim - 1.0).abs() < 0.01);
    }

    #[test]
    fn cosine_similarity_orthogonal_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 0.01);
    }

    #[test]
    fn cosine_similarity_mismatched_lengths_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn embedding_blob_round_trip() {
        let embedding = vec![0.25f32, -1.5, 3.75, 0.0];
        let blob = embedding_to_blob(&embedding);
        assert_eq!(blob.len(), 16);
        assert_eq!(blob_to_embedding(&blob), embedding);
    }

    #[test]
    fn store_count_and_clear() {
        let store = SqliteVectorStore::open_in_memory().unwrap();
        let chunks = vec![make_chunk("a"), make_chunk("b")];
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];

        assert_eq!(store.store_chunks(&chunks, &embeddings).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn search_returns_most_similar_first() {
        let store = SqliteVectorStore::open_in_memory().unwrap();
        let chunks = vec![
            make_chunk("salaire minimum"),
            make_chunk("congé payé"),
            make_chunk("durée du travail"),
        ];
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.7, 0.7, 0.0],
        ];
        store.store_chunks(&chunks, &embeddings).unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].0.content.contains("salaire"));
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn search_round_trips_chunk_metadata() {
        let store = SqliteVectorStore::open_in_memory().unwrap();
        let chunk = make_chunk("[Livre I]\nArticle 1\n\ncontenu");
        store
            .store_chunks(&[chunk.clone()], &[vec![1.0, 0.0]])
            .unwrap();

        let results = store.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].0.id, chunk.id);
        assert_eq!(results[0].0.article.as_deref(), Some("Article 1"));
        assert_eq!(results[0].0.source_name, "Code du Travail");
    }

    #[test]
    fn mismatched_chunks_and_embeddings_error() {
        let store = SqliteVectorStore::open_in_memory().unwrap();
        let result = store.store_chunks(&[make_chunk("a")], &[]);
        assert!(matches!(result, Err(StorageError::VectorDb(_))));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.sqlite3");

        {
            let store = SqliteVectorStore::open(&path).unwrap();
            store
                .store_chunks(&[make_chunk("persisté")], &[vec![1.0, 0.0]])
                .unwrap();
        }

        let reopened = SqliteVectorStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        let results = reopened.search(&[1.0, 0.0], 1).unwrap();
        assert!(results[0].0.content.contains("persisté"));
    }

    #[test]
    fn in_memory_store_behaves_like_sqlite() {
        let store = InMemoryVectorStore::new();
        let chunks = vec![make_chunk("a"), make_chunk("b")];
        store
            .store_chunks(&chunks, &[vec![1.0, 0.0], vec![0.0, 1.0]])
            .unwrap();

        assert_eq!(store.count().unwrap(), 2);
        let results = store.search(&[0.0, 1.0], 1).unwrap();
        assert!(results[0].0.content.contains('b'));

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
