//! Assembling ranked search results into a bounded context block.
//!
//! Each result gets a provenance header (class metadata for record
//! sources, page and chunk id otherwise) followed by its text, and the
//! concatenation is cut off at a word budget so the downstream prompt
//! never grows without bound.

use crate::chunking::Chunk;

/// Format ranked results into a context block of at most
/// `max_context_words` words of chunk text (headers are not counted).
///
/// The final result that would overflow the budget is truncated to the
/// remaining words; everything after it is dropped.
pub fn build_context(results: &[(Chunk, f32)], max_context_words: usize) -> String {
    let mut parts = Vec::new();
    let mut total_words = 0usize;

    for (chunk, score) in results {
        let text = chunk.text.trim();
        let header = header_for(chunk, *score);
        let words: Vec<&str> = text.split_whitespace().collect();

        if total_words + words.len() > max_context_words {
            let allowed = max_context_words.saturating_sub(total_words);
            if allowed == 0 {
                break;
            }
            parts.push(format!("{header}\n{}", words[..allowed].join(" ")));
            break;
        }

        parts.push(format!("{header}\n{text}"));
        total_words += words.len();
    }

    parts.join("\n\n")
}

fn header_for(chunk: &Chunk, score: f32) -> String {
    match &chunk.metadata {
        Some(meta) => {
            let technologies = meta
                .technologies
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "[Class: {} | Level: {} | Technologies: {} | Score: {:.3}]",
                meta.name, meta.difficulty, technologies, score
            )
        }
        None => {
            let page = chunk
                .source_page
                .map_or_else(|| "N/A".to_string(), |p| p.to_string());
            format!(
                "[Page: {} | Chunk: {} | Score: {:.3}]",
                page, chunk.chunk_id, score
            )
        }
    }
}
