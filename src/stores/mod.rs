//! Vector store: the pairing of chunks with their embeddings.
//!
//! A [`VectorStore`] is constructed by exactly two paths — a fresh build
//! that derives vectors from documents, and a load that restores an
//! already-derived instance from persisted artifacts — and both uphold
//! the same invariant: index row *i* pairs with chunk list position *i*.
//! Stores are immutable after construction; concurrent searches need no
//! locking, and a rebuild is a new store swapped in by the caller rather
//! than an in-place mutation.

pub mod index;
mod persist;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::chunking::{Chunk, clean_text};
use crate::embeddings::{EmbedderRegistry, EmbeddingProvider};
use crate::types::RagError;

pub use index::{FlatIpIndex, l2_normalize};

/// Immutable pairing of a chunk list with its similarity index.
pub struct VectorStore {
    documents: Vec<Chunk>,
    embedding_model: String,
    index: FlatIpIndex,
    provider: Arc<dyn EmbeddingProvider>,
}

impl VectorStore {
    /// Embed every chunk in one batch and build the index over the rows.
    ///
    /// The chunk order given here fixes the index row order for the life
    /// of the store, including across save/load. An empty document list
    /// builds a valid, permanently-empty store.
    pub async fn build_from_documents(
        documents: Vec<Chunk>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        let index = if documents.is_empty() {
            FlatIpIndex::empty()
        } else {
            let texts: Vec<String> = documents
                .iter()
                .map(|chunk| clean_text(&chunk.text))
                .collect();
            let rows = provider.embed_batch(&texts).await?;
            if rows.len() != texts.len() {
                return Err(RagError::Embedding(format!(
                    "provider returned {} vectors for {} chunks",
                    rows.len(),
                    texts.len()
                )));
            }
            FlatIpIndex::build(rows)?
        };

        info!(
            documents = documents.len(),
            dims = index.dims(),
            model = provider.model_id(),
            "built vector store"
        );

        Ok(Self {
            documents,
            embedding_model: provider.model_id().to_string(),
            index,
            provider,
        })
    }

    /// Retrieve up to `k` chunks ranked by similarity to `query`,
    /// dropping any result scoring below `min_score`.
    ///
    /// The query is embedded with the same model recorded at build time.
    /// Filtering happens after ranking, so a low floor never reorders
    /// results — it only truncates the tail.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        min_score: f32,
    ) -> Result<Vec<(Chunk, f32)>, RagError> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let cleaned = clean_text(query);
        let mut rows = self.provider.embed_batch(&[cleaned]).await?;
        if rows.is_empty() {
            return Err(RagError::Embedding(
                "provider returned no vector for the query".to_string(),
            ));
        }
        let query_vector = rows.remove(0);

        let ranked = self.index.search(&query_vector, k);
        let results: Vec<(Chunk, f32)> = ranked
            .into_iter()
            .filter(|(_, score)| *score >= min_score)
            .map(|(position, score)| (self.documents[position].clone(), score))
            .collect();

        debug!(
            k,
            min_score,
            results = results.len(),
            "similarity search complete"
        );
        Ok(results)
    }

    /// Persist the index blob and the metadata record as a pair.
    ///
    /// The pair is sufficient to reconstruct a functioning store without
    /// recomputing any embedding.
    pub async fn save(&self, index_path: &Path, meta_path: &Path) -> Result<(), RagError> {
        let meta = persist::StoreMeta {
            index_id: Uuid::new_v4(),
            documents: self.documents.clone(),
            embedding_model: self.embedding_model.clone(),
        };
        persist::write_artifacts(index_path, meta_path, &self.index, &meta).await?;
        info!(
            index = %index_path.display(),
            meta = %meta_path.display(),
            documents = self.documents.len(),
            "persisted vector store"
        );
        Ok(())
    }

    /// Reconstruct a store from its persisted artifact pair.
    ///
    /// The embedding provider is resolved from the registry by the model
    /// identifier recorded at save time and is not invoked here; loading
    /// never recomputes embeddings. Fails with [`RagError::NotFound`]
    /// when either artifact is missing and [`RagError::Corrupt`] when the
    /// pair cannot be trusted.
    pub async fn load(
        index_path: &Path,
        meta_path: &Path,
        registry: &EmbedderRegistry,
    ) -> Result<Self, RagError> {
        let (index, meta) = persist::read_artifacts(index_path, meta_path).await?;
        let provider = registry.provider(&meta.embedding_model)?;

        info!(
            documents = meta.documents.len(),
            model = %meta.embedding_model,
            "loaded vector store"
        );

        Ok(Self {
            documents: meta.documents,
            embedding_model: meta.embedding_model,
            index,
            provider,
        })
    }

    /// Chunks backing the index, in row order.
    pub fn documents(&self) -> &[Chunk] {
        &self.documents
    }

    /// Model identifier recorded at build time.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
