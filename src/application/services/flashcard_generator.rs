use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;

use crate::application::ports::{Embedder, GenerationParams, GeneratorError, TextGenerator};
use crate::domain::Flashcard;

use super::key_phrase_extractor::{KeyPhraseError, KeyPhraseExtractor};

pub const DEFAULT_MIN_SCORE: f32 = 0.10;

static QA_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[QA][:\-]").expect("Q/A marker pattern is valid"));

#[derive(Debug, Clone)]
pub struct FlashcardGeneratorConfig {
    pub top_phrases: usize,
    /// Cards whose question/answer similarity falls below this are dropped.
    pub min_score: f32,
    pub params: GenerationParams,
}

/// Generates flashcards in a single decoding pass and keeps the ones whose
/// answer is semantically related to the question.
pub struct FlashcardGenerator {
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
    key_phrases: KeyPhraseExtractor,
    config: FlashcardGeneratorConfig,
}

impl FlashcardGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
        config: FlashcardGeneratorConfig,
    ) -> Self {
        let key_phrases = KeyPhraseExtractor::new(Arc::clone(&embedder), config.top_phrases);
        Self {
            generator,
            embedder,
            key_phrases,
            config,
        }
    }

    #[tracing::instrument(skip(self, text), fields(text_chars = text.len()))]
    pub async fn generate(&self, text: &str) -> Result<Vec<Flashcard>, FlashcardError> {
        let phrases = self.key_phrases.extract(text).await?;
        tracing::debug!(phrases = ?phrases, "Key phrases selected");

        let prompt = build_flashcard_prompt(&phrases, text);
        let decoded = self
            .generator
            .generate(&prompt, &self.config.params)
            .await?;

        let pairs = parse_qa_pairs(&decoded);
        let candidates = pairs.len();
        let flashcards = self.score_pairs(pairs).await;

        tracing::info!(
            candidates,
            kept = flashcards.len(),
            "Flashcard generation complete"
        );

        Ok(flashcards)
    }

    /// Drops pairs with an empty side or a similarity below the threshold,
    /// then orders the rest by score, highest first.
    pub async fn score_pairs(&self, pairs: Vec<(String, String)>) -> Vec<Flashcard> {
        let mut flashcards = Vec::new();

        for (question, answer) in pairs {
            let question = question.trim();
            let answer = answer.trim();
            if question.is_empty() || answer.is_empty() {
                continue;
            }

            let score = self.similarity(question, answer).await;
            if score < self.config.min_score {
                tracing::debug!(score, "Discarding weakly related flashcard");
                continue;
            }

            flashcards.push(Flashcard::new(question, answer, score));
        }

        flashcards.sort_by(|a, b| b.score.total_cmp(&a.score));
        flashcards
    }

    /// Any embedding failure scores 0.0 instead of failing the request.
    async fn similarity(&self, question: &str, answer: &str) -> f32 {
        match self.embedder.embed_batch(&[question, answer]).await {
            Ok(embeddings) => match embeddings.as_slice() {
                [q, a] => q.cosine_similarity(a),
                other => {
                    tracing::warn!(
                        returned = other.len(),
                        "Unexpected embedding count, scoring flashcard as 0.0"
                    );
                    0.0
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Embedding failed, scoring flashcard as 0.0");
                0.0
            }
        }
    }
}

pub fn build_flashcard_prompt(phrases: &[String], text: &str) -> String {
    format!(
        "Generate multiple high-quality study flashcards. \
         Format each item as:\nQ: <question>\nA: <answer>\n\n\
         Concepts: {}\n\n\
         Context:\n{}",
        phrases.join(", "),
        text
    )
}

struct Marker {
    kind: u8,
    start: usize,
    end: usize,
}

/// Extracts `(question, answer)` pairs from `Q: ... A: ...` formatted text.
///
/// A question runs from a `Q:`/`Q-` marker to the next `A:`/`A-` marker; the
/// answer runs from there to the next `Q:`/`Q-` marker or the end of input.
/// Both sides are trimmed but may be empty.
pub fn parse_qa_pairs(decoded: &str) -> Vec<(String, String)> {
    let bytes = decoded.as_bytes();
    let markers: Vec<Marker> = QA_MARKER
        .find_iter(decoded)
        .map(|m| Marker {
            kind: bytes[m.start()],
            start: m.start(),
            end: m.end(),
        })
        .collect();

    let next_of = |kind: u8, from: usize| (from..markers.len()).find(|&i| markers[i].kind == kind);

    let mut pairs = Vec::new();
    let mut cursor = 0;

    while let Some(q) = next_of(b'Q', cursor) {
        let Some(a) = next_of(b'A', q + 1) else {
            break;
        };
        let next_q = next_of(b'Q', a + 1);

        let question = &decoded[markers[q].end..markers[a].start];
        let answer_end = next_q.map_or(decoded.len(), |i| markers[i].start);
        let answer = &decoded[markers[a].end..answer_end];

        pairs.push((question.trim().to_string(), answer.trim().to_string()));

        match next_q {
            Some(i) => cursor = i,
            None => break,
        }
    }

    pairs
}

#[derive(Debug, thiserror::Error)]
pub enum FlashcardError {
    #[error("key phrases: {0}")]
    KeyPhrases(#[from] KeyPhraseError),
    #[error("generation: {0}")]
    Generation(#[from] GeneratorError),
}
