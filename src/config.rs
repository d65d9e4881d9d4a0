//! Environment-driven runtime settings.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::chunking::ChunkBounds;

/// Model identifier used when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str =
    "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";

/// Values consumed by the pipeline: retrieval knobs, chunk bounds, the
/// embedding model, and the source/artifact paths.
#[derive(Clone, Debug)]
pub struct RagConfig {
    pub document_path: PathBuf,
    pub embedding_model: String,
    /// Root URL of the embedding service, when one is used.
    pub embedding_endpoint: Option<String>,
    /// Result count requested per query.
    pub top_k: usize,
    /// Similarity floor in `[0, 1]`; results below it are discarded
    /// post-ranking.
    pub min_score: f32,
    /// Word budget for the assembled context block.
    pub max_context_words: usize,
    pub bounds: ChunkBounds,
    pub index_path: PathBuf,
    pub meta_path: PathBuf,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("data/data.jsonl"),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_endpoint: None,
            top_k: 3,
            min_score: 0.4,
            max_context_words: 400,
            bounds: ChunkBounds::default(),
            index_path: PathBuf::from("index.vec"),
            meta_path: PathBuf::from("index_meta.json"),
        }
    }
}

impl RagConfig {
    /// Load settings from the environment, reading `.env` first.
    ///
    /// Unset or unparsable variables fall back to their defaults;
    /// `min_score` is clamped to `[0, 1]`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            document_path: var_or("DOCUMENT_PATH", defaults.document_path),
            embedding_model: env::var("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embedding_endpoint: env::var("EMBEDDING_ENDPOINT").ok(),
            top_k: var_or("TOP_K", defaults.top_k),
            min_score: var_or("RETRIEVE_MIN_SCORE", defaults.min_score).clamp(0.0, 1.0),
            max_context_words: var_or("MAX_CONTEXT_WORDS", defaults.max_context_words),
            bounds: ChunkBounds::new(
                var_or("CHUNK_MAX_WORDS", defaults.bounds.max_words),
                var_or("CHUNK_MIN_WORDS", defaults.bounds.min_words),
            ),
            index_path: var_or("INDEX_PATH", defaults.index_path),
            meta_path: var_or("INDEX_META_PATH", defaults.meta_path),
        }
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
