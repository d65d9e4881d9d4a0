//! Greedy sentence accumulation into bounded, deduplicated chunks.

use std::collections::HashSet;
use std::mem;

use super::segmenter::{split_paragraphs, split_sentences};
use super::types::{Chunk, ChunkBounds};

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Chunk raw text: paragraphs → sentences → bounded chunks.
///
/// Chunk boundaries stay aligned with sentence boundaries wherever
/// possible; a sentence that alone exceeds `max_words` is hard-split into
/// word windows so the ceiling always holds. An undersize merge pass then
/// coalesces small fragments (a lone one-sentence paragraph would
/// otherwise become a noisy, low-information embedding unit), and exact
/// duplicates are dropped keeping first occurrence. `chunk_id` is assigned
/// sequentially over the final sequence; `source_page` is left for the
/// caller.
///
/// Empty input produces an empty sequence.
pub fn chunk_text(raw: &str, bounds: ChunkBounds) -> Vec<Chunk> {
    let paragraphs = split_paragraphs(raw);
    assemble_chunks(&paragraphs, bounds)
}

/// Run accumulation, merge, and dedupe over pre-split paragraphs.
pub fn assemble_chunks(paragraphs: &[String], bounds: ChunkBounds) -> Vec<Chunk> {
    // Re-validate in case the bounds were built from a struct literal.
    let bounds = ChunkBounds::new(bounds.max_words, bounds.min_words);
    let raw_chunks = accumulate(paragraphs, bounds);
    let merged = merge_undersized(raw_chunks, bounds);
    dedupe(merged)
        .into_iter()
        .enumerate()
        .map(|(id, text)| Chunk::new(text, id))
        .collect()
}

/// Walk sentences in order, growing a current chunk until the next
/// sentence would push it past `max_words`.
fn accumulate(paragraphs: &[String], bounds: ChunkBounds) -> Vec<String> {
    let mut raw_chunks = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs {
        for sentence in split_sentences(paragraph) {
            let words: Vec<&str> = sentence.split_whitespace().collect();

            if words.len() > bounds.max_words {
                if !current.is_empty() {
                    raw_chunks.push(mem::take(&mut current));
                }
                for window in words.chunks(bounds.max_words) {
                    raw_chunks.push(window.join(" "));
                }
                continue;
            }

            if current.is_empty() {
                current = sentence;
                continue;
            }

            if word_count(&current) + words.len() > bounds.max_words {
                raw_chunks.push(mem::replace(&mut current, sentence));
            } else {
                current.push(' ');
                current.push_str(&sentence);
            }
        }
    }

    if !current.is_empty() {
        raw_chunks.push(current);
    }
    raw_chunks
}

/// Coalesce consecutive undersized chunks while the merge stays under
/// `max_words`. The final leftover may legitimately stay under
/// `min_words` when nothing more fits.
fn merge_undersized(raw_chunks: Vec<String>, bounds: ChunkBounds) -> Vec<String> {
    let mut finals = Vec::new();
    let mut buffer = String::new();

    for chunk in raw_chunks {
        let wc = word_count(&chunk);

        if wc < bounds.min_words {
            if buffer.is_empty() {
                buffer = chunk;
            } else if word_count(&buffer) + wc <= bounds.max_words {
                buffer.push(' ');
                buffer.push_str(&chunk);
            } else {
                finals.push(mem::replace(&mut buffer, chunk));
            }
        } else {
            if !buffer.is_empty() {
                finals.push(mem::take(&mut buffer));
            }
            finals.push(chunk);
        }
    }

    if !buffer.is_empty() {
        finals.push(buffer);
    }
    finals
}

/// Drop exact-text duplicates (after trimming), first occurrence wins.
fn dedupe(chunks: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter_map(|chunk| {
            let trimmed = chunk.trim().to_string();
            seen.insert(trimmed.clone()).then_some(trimmed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", ChunkBounds::default()).is_empty());
    }

    #[test]
    fn short_text_becomes_a_single_chunk() {
        let chunks = chunk_text("One sentence here.", ChunkBounds::default());
        assert_eq!(texts(&chunks), vec!["One sentence here."]);
        assert_eq!(chunks[0].chunk_id, 0);
    }

    #[test]
    fn greedy_accumulation_flushes_at_the_word_ceiling() {
        let bounds = ChunkBounds::new(5, 2);
        let chunks = chunk_text(
            "AI is powerful. It learns patterns. It improves over time.",
            bounds,
        );
        assert_eq!(
            texts(&chunks),
            vec![
                "AI is powerful.",
                "It learns patterns.",
                "It improves over time.",
            ]
        );
        for chunk in &chunks {
            assert!(chunk.word_count() <= bounds.max_words);
        }
    }

    #[test]
    fn sentences_merge_while_under_the_ceiling() {
        let bounds = ChunkBounds::new(10, 2);
        let chunks = chunk_text("AI is powerful. It learns patterns.", bounds);
        assert_eq!(texts(&chunks), vec!["AI is powerful. It learns patterns."]);
    }

    #[test]
    fn oversize_sentence_is_hard_split_into_windows() {
        let sentence = (0..23).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_text(&sentence, ChunkBounds::new(10, 1));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].word_count(), 10);
        assert_eq!(chunks[1].word_count(), 10);
        assert_eq!(chunks[2].word_count(), 3);
    }

    #[test]
    fn pending_chunk_flushes_before_a_hard_split() {
        let long = (0..12).map(|i| format!("X{i}")).collect::<Vec<_>>().join(" ");
        let text = format!("Short lead in. {long}.");
        let chunks = chunk_text(&text, ChunkBounds::new(10, 1));
        assert_eq!(chunks[0].text, "Short lead in.");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].word_count(), 10);
        assert_eq!(chunks[2].word_count(), 2);
    }

    #[test]
    fn undersized_fragments_merge_up() {
        // Two one-sentence paragraphs, each below min_words, merge into one
        // chunk in the second pass.
        let chunks = chunk_text("Tiny one.\n\nTiny two.", ChunkBounds::new(20, 4));
        assert_eq!(texts(&chunks), vec!["Tiny one. Tiny two."]);
    }

    #[test]
    fn merge_respects_the_ceiling() {
        let a = (0..6).map(|i| format!("a{i}")).collect::<Vec<_>>().join(" ");
        let b = (0..6).map(|i| format!("b{i}")).collect::<Vec<_>>().join(" ");
        let text = format!("{a}.\n\n{b}.");
        // Both fragments are undersized (6 < 8) but merging would hit 12 > 10.
        let chunks = chunk_text(&text, ChunkBounds::new(10, 8));
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn all_undersized_input_may_yield_one_small_chunk() {
        let chunks = chunk_text("Just this.", ChunkBounds::new(100, 40));
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].word_count() < 40);
    }

    #[test]
    fn duplicate_chunks_are_dropped_keeping_first() {
        let chunks = chunk_text(
            "Repeated line here.\n\nRepeated line here.\n\nDistinct line here.",
            ChunkBounds::new(5, 1),
        );
        assert_eq!(
            texts(&chunks),
            vec!["Repeated line here.", "Distinct line here."]
        );
    }

    #[test]
    fn chunk_ids_are_sequential_after_dedupe() {
        let chunks = chunk_text(
            "Alpha beta gamma.\n\nAlpha beta gamma.\n\nDelta epsilon zeta.",
            ChunkBounds::new(4, 1),
        );
        let ids: Vec<usize> = chunks.iter().map(|c| c.chunk_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn coverage_is_preserved_across_chunk_boundaries() {
        let text = "First sentence is here. Second sentence follows. Third one closes.";
        let chunks = chunk_text(text, ChunkBounds::new(6, 2));
        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.text.split_whitespace().map(String::from))
            .collect();
        let original: Vec<String> = text.split_whitespace().map(String::from).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn rechunking_joined_output_is_stable() {
        let bounds = ChunkBounds::new(8, 3);
        let text = "One two three four. Five six seven. Eight nine ten eleven twelve.";
        let first = chunk_text(text, bounds);
        let rejoined = first
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let second = chunk_text(&rejoined, bounds);
        assert_eq!(texts(&first), texts(&second));
    }
}
