use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence boundary pattern is valid"));

/// Splits text on whitespace that follows `.`, `!` or `?`.
///
/// The terminal punctuation stays with its sentence. Pieces are trimmed and
/// empty ones dropped, so text without terminal punctuation comes back as a
/// single sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // The punctuation marks are all single-byte.
        let end = boundary.start() + 1;
        push_trimmed(&text[start..end], &mut sentences);
        start = boundary.end();
    }
    push_trimmed(&text[start..], &mut sentences);

    sentences
}

fn push_trimmed(piece: &str, sentences: &mut Vec<String>) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
