//! SQLite-backed persistent vector collection with cosine similarity search

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::document::{Chunk, START_INDEX_KEY};

/// Database filename inside the persistence directory
const DB_FILE: &str = "vectors.db";

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk (embedding not rehydrated)
    pub chunk: Chunk,
    /// Cosine similarity to the query (-1.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Persistent named collection of (content, embedding, metadata) rows.
///
/// Rows are appended in insertion order; similarity search ranks by cosine
/// similarity with a stable sort, so equal scores keep insertion order.
pub struct VectorStore {
    conn: Mutex<Connection>,
    collection: String,
}

impl VectorStore {
    /// Open the collection at `persist_dir`, creating directory and schema
    /// on first use. Reopening an existing collection never resets it.
    pub fn open_or_create<P: AsRef<Path>>(persist_dir: P, collection: &str) -> Result<Self> {
        std::fs::create_dir_all(&persist_dir)
            .map_err(|e| Error::storage(format!("failed to create persistence dir: {}", e)))?;

        let conn = Connection::open(persist_dir.as_ref().join(DB_FILE))
            .map_err(|e| Error::storage(format!("failed to open database: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory collection (for testing)
    #[cfg(test)]
    pub fn in_memory(collection: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("failed to open in-memory database: {}", e)))?;
        let store = Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                metadata TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_collection ON chunks(collection);
            "#,
        )
        .map_err(|e| Error::storage(format!("failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Append chunks to the collection, returning the number written.
    ///
    /// Every chunk must carry an embedding; the batch is written in one
    /// transaction.
    pub fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::storage(format!("failed to begin transaction: {}", e)))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO chunks (id, collection, content, embedding, metadata, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(|e| Error::storage(format!("failed to prepare insert: {}", e)))?;

            let now = Utc::now().to_rfc3339();
            for chunk in chunks {
                if chunk.embedding.is_empty() {
                    return Err(Error::storage("chunk has no embedding"));
                }
                let metadata = serde_json::to_string(&chunk.metadata)?;
                stmt.execute(params![
                    chunk.id.to_string(),
                    self.collection,
                    chunk.content,
                    encode_embedding(&chunk.embedding),
                    metadata,
                    &now,
                ])
                .map_err(|e| Error::storage(format!("failed to insert chunk: {}", e)))?;
            }
        }

        tx.commit()
            .map_err(|e| Error::storage(format!("failed to commit: {}", e)))?;

        Ok(chunks.len())
    }

    /// Search the collection for the `top_k` chunks most similar to the
    /// query embedding, most similar first.
    pub fn similarity_search(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                "SELECT id, content, embedding, metadata FROM chunks
                 WHERE collection = ?1 ORDER BY rowid",
            )
            .map_err(|e| Error::storage(format!("failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![self.collection], |row| {
                let id: String = row.get(0)?;
                let content: String = row.get(1)?;
                let embedding: Vec<u8> = row.get(2)?;
                let metadata: String = row.get(3)?;
                Ok((id, content, embedding, metadata))
            })
            .map_err(|e| Error::storage(format!("failed to query chunks: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (id, content, embedding, metadata) =
                row.map_err(|e| Error::storage(format!("failed to read row: {}", e)))?;
            let embedding = decode_embedding(&embedding);
            let similarity = cosine_similarity(query, &embedding);
            results.push(ScoredChunk {
                chunk: row_to_chunk(&id, content, metadata)?,
                similarity,
            });
        }

        // Stable sort: rows arrive in insertion order, so ties keep it.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }

    /// Number of chunks in the collection
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
                params![self.collection],
                |row| row.get(0),
            )
            .map_err(|e| Error::storage(format!("failed to count chunks: {}", e)))?;
        Ok(count as usize)
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn row_to_chunk(id: &str, content: String, metadata: String) -> Result<Chunk> {
    let metadata: std::collections::HashMap<String, serde_json::Value> =
        serde_json::from_str(&metadata)?;
    let start_index = metadata
        .get(START_INDEX_KEY)
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as usize;

    Ok(Chunk {
        id: Uuid::parse_str(id).unwrap_or_else(|_| Uuid::new_v4()),
        content,
        metadata,
        start_index,
        embedding: Vec::new(),
    })
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Cosine similarity between two vectors; 0.0 when either has zero
/// magnitude or the dimensions differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::Document;

    fn chunk_with(content: &str, source: &str, embedding: Vec<f32>) -> Chunk {
        let mut doc = Document::new(content);
        doc.set_default_source(source);
        let mut chunk = Chunk::from_parent(&doc, content.to_string(), 0);
        chunk.embedding = embedding;
        chunk
    }

    #[test]
    fn add_returns_count_and_len_reflects_it() {
        let store = VectorStore::in_memory("rag_collection").unwrap();
        let chunks = vec![
            chunk_with("a", "s1", vec![1.0, 0.0]),
            chunk_with("b", "s1", vec![0.0, 1.0]),
        ];
        assert_eq!(store.add(&chunks).unwrap(), 2);
        assert_eq!(store.len().unwrap(), 2);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn add_rejects_chunks_without_embeddings() {
        let store = VectorStore::in_memory("rag_collection").unwrap();
        let chunks = vec![chunk_with("a", "s1", Vec::new())];
        assert!(store.add(&chunks).is_err());
    }

    #[test]
    fn search_ranks_by_cosine_similarity() {
        let store = VectorStore::in_memory("rag_collection").unwrap();
        store
            .add(&[
                chunk_with("east", "s", vec![1.0, 0.0]),
                chunk_with("north", "s", vec![0.0, 1.0]),
                chunk_with("northeast", "s", vec![0.7, 0.7]),
            ])
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "east");
        assert_eq!(results[1].chunk.content, "northeast");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let store = VectorStore::in_memory("rag_collection").unwrap();
        store
            .add(&[
                chunk_with("first", "s", vec![1.0, 0.0]),
                chunk_with("second", "s", vec![1.0, 0.0]),
                chunk_with("third", "s", vec![1.0, 0.0]),
            ])
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 3).unwrap();
        let contents: Vec<&str> = results.iter().map(|r| r.chunk.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn search_on_empty_collection_is_empty() {
        let store = VectorStore::in_memory("rag_collection").unwrap();
        assert!(store.similarity_search(&[1.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn search_restores_metadata_and_start_index() {
        let store = VectorStore::in_memory("rag_collection").unwrap();
        let mut doc = Document::new("body");
        doc.set_default_source("file:x.txt");
        let mut chunk = Chunk::from_parent(&doc, "body".to_string(), 42);
        chunk.embedding = vec![0.5, 0.5];
        store.add(&[chunk]).unwrap();

        let results = store.similarity_search(&[0.5, 0.5], 1).unwrap();
        assert_eq!(results[0].chunk.source(), Some("file:x.txt"));
        assert_eq!(results[0].chunk.start_index, 42);
    }

    #[test]
    fn open_or_create_is_idempotent_across_reopens() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = VectorStore::open_or_create(dir.path(), "rag_collection").unwrap();
            store
                .add(&[chunk_with("persisted", "s", vec![1.0, 0.0])])
                .unwrap();
        }

        let reopened = VectorStore::open_or_create(dir.path(), "rag_collection").unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        let results = reopened.similarity_search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].chunk.content, "persisted");
    }

    #[test]
    fn embedding_roundtrip() {
        let embedding = vec![0.25f32, -1.5, 3.75];
        assert_eq!(decode_embedding(&encode_embedding(&embedding)), embedding);
    }

    #[test]
    fn cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }
}
