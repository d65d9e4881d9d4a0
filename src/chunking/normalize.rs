//! Markup-artifact stripping applied before text is embedded.

use std::sync::LazyLock;

use regex::Regex;

static NBSP_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&nbsp;?").unwrap());
static BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Strip HTML leftovers and collapse whitespace.
///
/// Non-breaking-space entities and line-break tags become a single space,
/// runs of two or more whitespace characters collapse to one, and the
/// result is trimmed. Empty input yields an empty string; the function is
/// pure and has no failure modes.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = NBSP_ENTITY.replace_all(text, " ");
    let text = BREAK_TAG.replace_all(&text, " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
