//! Loading document sources into chunk lists.
//!
//! Two source shapes are supported: paginated plain text (pages separated
//! by form-feed, the page marker PDF text extractors emit) and JSONL
//! records carrying a `combined_text` field plus descriptive attributes.
//! Anything else fails fast before any chunking or index work begins.

use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::info;

use crate::chunking::{Chunk, ChunkBounds, ChunkMetadata, chunk_text};
use crate::types::RagError;

/// Form feed, emitted between pages by PDF-to-text extraction.
const PAGE_BREAK: char = '\u{0C}';

/// Source shapes the loader understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain text with form-feed page separators; chunks carry page numbers.
    PagedText,
    /// One JSON record per line; chunks carry record metadata.
    JsonRecords,
}

/// Decide the source format from the file extension.
pub fn detect_format(path: &Path) -> Result<DocumentFormat, RagError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("txt") | Some("text") => Ok(DocumentFormat::PagedText),
        Some("jsonl") => Ok(DocumentFormat::JsonRecords),
        _ => Err(RagError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load and chunk a document source.
///
/// Chunk ids are globally increasing over the whole source, in walk
/// order, regardless of page or record boundaries.
pub async fn load_documents(path: &Path, bounds: ChunkBounds) -> Result<Vec<Chunk>, RagError> {
    let chunks = match detect_format(path)? {
        DocumentFormat::PagedText => load_paged_text(path, bounds).await?,
        DocumentFormat::JsonRecords => load_json_records(path, bounds).await?,
    };
    info!(
        source = %path.display(),
        chunks = chunks.len(),
        "loaded document source"
    );
    Ok(chunks)
}

async fn load_paged_text(path: &Path, bounds: ChunkBounds) -> Result<Vec<Chunk>, RagError> {
    let text = fs::read_to_string(path).await?;

    let mut chunks = Vec::new();
    for (page_index, page) in text.split(PAGE_BREAK).enumerate() {
        if page.trim().is_empty() {
            continue;
        }
        let page_number = page_index as u32 + 1;
        for chunk in chunk_text(page, bounds) {
            chunks.push(chunk.with_page(page_number));
        }
    }

    renumber(&mut chunks);
    Ok(chunks)
}

/// One line of a record-oriented source. Only `combined_text` is
/// required; descriptive fields fall back to loader defaults.
#[derive(Debug, Deserialize)]
struct SourceRecord {
    combined_text: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    course_difficulty: Option<String>,
    #[serde(default)]
    technologies: Option<Vec<String>>,
}

impl SourceRecord {
    fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            name: self.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            summary: self.summary.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            difficulty: self
                .course_difficulty
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            technologies: self.technologies.clone().unwrap_or_default(),
        }
    }
}

async fn load_json_records(path: &Path, bounds: ChunkBounds) -> Result<Vec<Chunk>, RagError> {
    let raw = fs::read_to_string(path).await?;

    let mut chunks = Vec::new();
    for (line_index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: SourceRecord = serde_json::from_str(line).map_err(|err| {
            RagError::Parse(format!("{}:{}: {err}", path.display(), line_index + 1))
        })?;

        let metadata = record.metadata();
        for chunk in chunk_text(&record.combined_text, bounds) {
            chunks.push(chunk.with_metadata(metadata.clone()));
        }
    }

    renumber(&mut chunks);
    Ok(chunks)
}

fn renumber(chunks: &mut [Chunk]) {
    for (id, chunk) in chunks.iter_mut().enumerate() {
        chunk.chunk_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(name_suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(name_suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn format_detection_by_extension() {
        assert_eq!(
            detect_format(Path::new("doc.txt")).unwrap(),
            DocumentFormat::PagedText
        );
        assert_eq!(
            detect_format(Path::new("data.JSONL")).unwrap(),
            DocumentFormat::JsonRecords
        );
        assert!(matches!(
            detect_format(Path::new("slides.pdf")),
            Err(RagError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Path::new("no_extension")),
            Err(RagError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn paged_text_tags_page_numbers() {
        let file = temp_file(
            ".txt",
            "Page one sentence here.\u{0C}Page two sentence here.\u{0C}\u{0C}Page four text here.",
        );
        let chunks = load_documents(file.path(), ChunkBounds::new(50, 1))
            .await
            .unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].source_page, Some(1));
        assert_eq!(chunks[1].source_page, Some(2));
        // Blank page three is skipped without shifting later numbering.
        assert_eq!(chunks[2].source_page, Some(4));
        let ids: Vec<usize> = chunks.iter().map(|c| c.chunk_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn json_records_attach_metadata_with_defaults() {
        let file = temp_file(
            ".jsonl",
            concat!(
                r#"{"combined_text": "Learn Rust ownership rules.", "name": "Rust Basics", "course_difficulty": "Beginner", "technologies": ["rust"]}"#,
                "\n",
                r#"{"combined_text": "Bare record with text only."}"#,
                "\n",
            ),
        );
        let chunks = load_documents(file.path(), ChunkBounds::new(50, 1))
            .await
            .unwrap();

        assert_eq!(chunks.len(), 2);
        let first = chunks[0].metadata.as_ref().unwrap();
        assert_eq!(first.name, "Rust Basics");
        assert_eq!(first.difficulty, "Beginner");
        assert_eq!(first.technologies, vec!["rust".to_string()]);

        let second = chunks[1].metadata.as_ref().unwrap();
        assert_eq!(second.name, "Unknown");
        assert_eq!(second.difficulty, "N/A");
        assert!(second.technologies.is_empty());

        assert!(chunks.iter().all(|c| c.source_page.is_none()));
    }

    #[tokio::test]
    async fn record_ids_increase_across_records() {
        let long_text = (0..30)
            .map(|i| format!("Sentence number {i} sits right here."))
            .collect::<Vec<_>>()
            .join(" ");
        let file = temp_file(
            ".jsonl",
            &format!(
                "{}\n{}\n",
                serde_json::json!({ "combined_text": long_text, "name": "A" }),
                serde_json::json!({ "combined_text": "Short closing record text.", "name": "B" }),
            ),
        );
        let chunks = load_documents(file.path(), ChunkBounds::new(40, 10))
            .await
            .unwrap();

        assert!(chunks.len() > 2);
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, expected);
        }
        assert_eq!(chunks.last().unwrap().metadata.as_ref().unwrap().name, "B");
    }

    #[tokio::test]
    async fn malformed_record_fails_the_load() {
        let file = temp_file(
            ".jsonl",
            "{\"combined_text\": \"fine\"}\nnot json at all\n",
        );
        let result = load_documents(file.path(), ChunkBounds::default()).await;
        assert!(matches!(result, Err(RagError::Parse(_))));
    }

    #[tokio::test]
    async fn record_without_combined_text_fails_the_load() {
        let file = temp_file(".jsonl", "{\"name\": \"No text\"}\n");
        let result = load_documents(file.path(), ChunkBounds::default()).await;
        assert!(matches!(result, Err(RagError::Parse(_))));
    }

    #[tokio::test]
    async fn missing_source_file_is_an_io_error() {
        let result =
            load_documents(Path::new("/nonexistent/data.jsonl"), ChunkBounds::default()).await;
        assert!(matches!(result, Err(RagError::Io(_))));
    }
}
