//! Text normalization and sentence-aware chunking.
//!
//! The pipeline runs in fixed stages: [`normalize::clean_text`] strips
//! markup artifacts, [`segmenter`] splits paragraphs and sentences, and
//! [`assembly`] reassembles sentences into size-bounded, deduplicated
//! [`Chunk`]s. Everything here is pure and synchronous; embedding and
//! storage live in their own modules.

pub mod assembly;
pub mod normalize;
pub mod segmenter;
pub mod types;

pub use assembly::{assemble_chunks, chunk_text};
pub use normalize::clean_text;
pub use segmenter::{split_paragraphs, split_sentences};
pub use types::{Chunk, ChunkBounds, ChunkMetadata};
