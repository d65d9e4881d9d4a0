//! Chunk records produced by the chunking pipeline.

use serde::{Deserialize, Serialize};

/// The atomic retrievable unit: a bounded span of normalized text plus
/// the provenance needed to cite it back to its source.
///
/// `chunk_id` is unique and increasing within one document walk and is
/// never reused across a rebuild; index row *i* of a built store always
/// corresponds to chunk list position *i*.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Whitespace-normalized, non-empty chunk body.
    pub text: String,
    /// 1-based page number for paginated sources, `None` for record sources.
    #[serde(default)]
    pub source_page: Option<u32>,
    /// Zero-based position in the final chunk sequence.
    pub chunk_id: usize,
    /// Descriptive attributes carried over from record-oriented sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChunkMetadata>,
}

impl Chunk {
    /// Create a chunk with no provenance; the loader fills in pages,
    /// metadata, and global ids afterwards.
    pub fn new(text: impl Into<String>, chunk_id: usize) -> Self {
        Self {
            text: text.into(),
            source_page: None,
            chunk_id,
            metadata: None,
        }
    }

    /// Tag the chunk with its source page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.source_page = Some(page);
        self
    }

    /// Attach record-source metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whitespace-token count of the chunk body.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Descriptive fields attached when the source is record-oriented.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub name: String,
    pub summary: String,
    pub description: String,
    pub difficulty: String,
    pub technologies: Vec<String>,
}

/// Word-count bounds applied during chunk assembly.
///
/// Chunks stay within `[min_words, max_words]` except for the final
/// leftover chunk (which may fall under `min_words` when no further merge
/// fits) — the oversize-sentence hard split guarantees the ceiling is
/// never exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkBounds {
    pub max_words: usize,
    pub min_words: usize,
}

impl Default for ChunkBounds {
    fn default() -> Self {
        Self {
            max_words: 100,
            min_words: 40,
        }
    }
}

impl ChunkBounds {
    /// Bounds with an explicit ceiling and floor.
    pub fn new(max_words: usize, min_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
            min_words,
        }
    }
}
