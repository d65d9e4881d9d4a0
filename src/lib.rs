//! Sentence-aware chunking, embedding, and exact vector retrieval.
//!
//! ```text
//! Document source ──► ingestion::load_documents ──► Vec<Chunk>
//!                          │
//!                          └─ chunking::{clean_text, segmenter, assembly}
//!
//! Vec<Chunk> ──► embeddings::EmbeddingProvider ──► normalized rows
//!                                   │
//! normalized rows ──► stores::FlatIpIndex ──► stores::VectorStore
//!                                   │
//!                                   ├─► save / load (artifact pair)
//!                                   └─► search ──► ranked (Chunk, score)
//!
//! ranked results ──► context::build_context ──► bounded prompt context
//! ```
//!
//! Stores are immutable once built or loaded; replacing one is an atomic
//! handle swap by the caller, so concurrent searches never observe a
//! partially rebuilt index.

pub mod chunking;
pub mod config;
pub mod context;
pub mod embeddings;
pub mod ingestion;
pub mod stores;
pub mod types;

pub use chunking::{Chunk, ChunkBounds, ChunkMetadata, chunk_text, clean_text};
pub use config::RagConfig;
pub use context::build_context;
pub use embeddings::{
    EmbedderRegistry, EmbeddingProvider, HttpEmbeddingProvider, MockEmbeddingProvider,
};
pub use ingestion::{DocumentFormat, detect_format, load_documents};
pub use stores::{FlatIpIndex, VectorStore};
pub use types::RagError;
