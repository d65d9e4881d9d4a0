//! Paragraph and sentence boundary detection.
//!
//! Sentence splitting is a punctuation heuristic, not a full boundary
//! parser: a terminal character followed by whitespace and a
//! capital/digit/opening bracket starts a new sentence, unless the text
//! before the boundary ends in a dotted abbreviation ("U.S.") or a lone
//! capitalized initial ("A. Smith"). Abbreviations outside those two
//! patterns ("etc.") still split.

use std::sync::LazyLock;

use regex::Regex;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Terminal punctuation, whitespace, then something that can open a
/// sentence. The boundary sits after the terminal character.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.?!"]\s+["'A-Z0-9(\[]"#).unwrap());

/// Dotted single-letter abbreviation tail, e.g. "U.S." or "e.g.".
static ABBREV_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w\.\w\.$").unwrap());

/// Lone capitalized initial tail, e.g. the "A." in "A. Smith".
static INITIAL_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|[\s("'\[])[A-Z]\.$"#).unwrap());

/// Split raw text into paragraphs on runs of line breaks.
///
/// Segments are trimmed, empty ones dropped, and internal whitespace runs
/// collapsed to single spaces. Input without any line break comes back as
/// one paragraph.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| WHITESPACE_RUN.replace_all(p, " ").into_owned())
        .collect()
}

/// Split one paragraph into sentences.
///
/// A paragraph without terminal punctuation is returned whole as a single
/// sentence.
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    if paragraph.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0usize;

    for candidate in SENTENCE_BOUNDARY.find_iter(paragraph) {
        // All boundary characters are ASCII, so +1 / -1 stay on char
        // boundaries even in non-ASCII text.
        let end = candidate.start() + 1;
        let prefix = &paragraph[..end];
        if ABBREV_TAIL.is_match(prefix) || INITIAL_TAIL.is_match(prefix) {
            continue;
        }

        let sentence = paragraph[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = candidate.end() - 1;
    }

    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
