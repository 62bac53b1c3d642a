//! In-memory vector store.
//!
//! Zero-infrastructure backend for tests and local demos. Documents live in
//! a per-collection `Vec` and search is a full cosine-similarity scan,
//! fine at the collection sizes a demo knowledge base reaches.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use strategist_core::{ProviderError, Result, RetrievedDocument, VectorStore, validate_limit};
use tracing::debug;

struct StoredDocument {
    embedding: Vec<f32>,
    fields: Map<String, Value>,
}

/// A [`VectorStore`] holding everything in process memory.
pub struct InMemoryVectorStore {
    dimension: usize,
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self { dimension, collections: RwLock::new(HashMap::new()) }
    }

    /// Create an empty collection so that searching it yields an empty
    /// result rather than `CollectionNotFound`.
    pub fn create_collection(&self, name: &str) {
        self.collections.write().expect("collections lock").entry(name.to_string()).or_default();
    }

    /// Insert a document with its precomputed embedding, creating the
    /// collection if needed. Used by tests and demo ingestion only; the
    /// pipeline never writes.
    pub fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
        embedding: Vec<f32>,
    ) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(ProviderError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        self.collections
            .write()
            .expect("collections lock")
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { embedding, fields });
        Ok(())
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        validate_limit(limit)?;
        if query.len() != self.dimension {
            return Err(ProviderError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let collections = self.collections.read().expect("collections lock");
        let documents = collections
            .get(collection)
            .ok_or_else(|| ProviderError::CollectionNotFound(collection.to_string()))?;

        let mut scored: Vec<(f32, &StoredDocument)> = documents
            .iter()
            .map(|doc| (Self::cosine_similarity(query, &doc.embedding), doc))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        debug!(collection, returned = scored.len(), "in-memory search complete");
        Ok(scored
            .into_iter()
            .map(|(score, doc)| RetrievedDocument::new(doc.fields.clone()).with_similarity(score))
            .collect())
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn results_are_always_sorted_and_bounded(
            vectors in proptest::collection::vec(
                (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0),
                1..20
            ),
            query in (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0),
            limit in 1usize..10,
        ) {
            let store = InMemoryVectorStore::new(3);
            for (i, (x, y, z)) in vectors.iter().enumerate() {
                let mut fields = Map::new();
                fields.insert("text".to_string(), json!(format!("doc-{i}")));
                store.insert("props", fields, vec![*x, *y, *z]).unwrap();
            }

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let results = runtime
                .block_on(store.search("props", &[query.0, query.1, query.2], limit))
                .unwrap();

            prop_assert!(results.len() <= limit);
            prop_assert!(results.len() <= vectors.len());
            for pair in results.windows(2) {
                prop_assert!(pair[0].similarity.unwrap() >= pair[1].similarity.unwrap());
            }
        }
    }
}
