//! Embedding providers and the process-wide provider registry.
//!
//! Models are expensive to construct and shared by every caller in the
//! process, so providers live behind [`EmbedderRegistry`]: an explicit
//! initialization gate that constructs each model at most once and hands
//! out shared handles afterwards. Construction is resolved by string
//! model identifier; same identifier, same provider instance.

pub mod remote;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use crate::types::RagError;

pub use remote::HttpEmbeddingProvider;

/// A capability that maps batches of cleaned strings to fixed-dimension
/// vectors.
///
/// One row per input, stable dimensionality across calls for a given
/// model identifier, and deterministic output for identical input text.
/// Callers clean text with [`crate::chunking::clean_text`] before
/// embedding. Implementations must be safe to call concurrently.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the model backing this provider.
    fn model_id(&self) -> &str;

    /// Embed a batch of strings, one vector per input.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}

/// Factory invoked once per model identifier on first use.
pub type ProviderFactory =
    dyn Fn(&str) -> Result<Arc<dyn EmbeddingProvider>, RagError> + Send + Sync;

/// Process-wide registry of lazily constructed embedding providers.
///
/// First use of a model identifier runs the factory under the write lock;
/// concurrent first callers block until that construction completes and
/// then share the same handle (check, lock, re-check — initialization
/// happens at most once per identifier).
pub struct EmbedderRegistry {
    factory: Box<ProviderFactory>,
    providers: RwLock<HashMap<String, Arc<dyn EmbeddingProvider>>>,
}

impl EmbedderRegistry {
    /// Registry that constructs providers through `factory` on demand.
    pub fn new(
        factory: impl Fn(&str) -> Result<Arc<dyn EmbeddingProvider>, RagError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Registry pre-seeded with a single provider; unknown identifiers
    /// fail instead of constructing anything.
    pub fn with_provider(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let registry = Self::new(|model_id| {
            Err(RagError::Embedding(format!(
                "no provider registered for model '{model_id}'"
            )))
        });
        registry
            .providers
            .write()
            .insert(provider.model_id().to_string(), provider);
        registry
    }

    /// Resolve the shared provider for `model_id`, constructing it on
    /// first use.
    pub fn provider(&self, model_id: &str) -> Result<Arc<dyn EmbeddingProvider>, RagError> {
        if let Some(provider) = self.providers.read().get(model_id) {
            return Ok(Arc::clone(provider));
        }

        let mut providers = self.providers.write();
        if let Some(provider) = providers.get(model_id) {
            return Ok(Arc::clone(provider));
        }

        let provider = (self.factory)(model_id)?;
        info!(model = model_id, "initialized embedding provider");
        providers.insert(model_id.to_string(), Arc::clone(&provider));
        Ok(provider)
    }
}

/// Deterministic hash-derived embeddings for tests and offline runs.
///
/// Identical text always maps to the identical unit vector, different
/// texts almost surely differ, and no model weights are needed — enough
/// to exercise the index, store, and persistence paths in CI.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    model: String,
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self::with_dimensions(32)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            model: "mock-embedder".to_string(),
            dimensions: dimensions.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        // FNV-1a over the bytes seeds a splitmix64 stream per dimension.
        let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.as_bytes() {
            seed ^= u64::from(*byte);
            seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
        }

        let mut state = seed;
        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|_| {
                state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
                let mut z = state;
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
                z ^= z >> 31;
                // Map to [-1, 1).
                (z as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect();

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}
