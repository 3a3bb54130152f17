use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::ports::{Embedder, EmbedderError};

use super::sentence_splitter::split_sentences;

pub const DEFAULT_TOP_PHRASES: usize = 8;

const MIN_PHRASE_CHARS: usize = 3;
const MAX_PHRASE_CHARS: usize = 50;
const LONG_WORD_CHARS: usize = 6;

/// Picks concept-like phrases from a document and ranks them by how close
/// they sit to the whole document in embedding space.
pub struct KeyPhraseExtractor {
    embedder: Arc<dyn Embedder>,
    top_n: usize,
}

impl KeyPhraseExtractor {
    pub fn new(embedder: Arc<dyn Embedder>, top_n: usize) -> Self {
        Self { embedder, top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    #[tracing::instrument(skip(self, text), fields(text_chars = text.len()))]
    pub async fn extract(&self, text: &str) -> Result<Vec<String>, KeyPhraseError> {
        let candidates = candidate_phrases(text);

        if candidates.is_empty() {
            tracing::debug!("No candidate phrases, falling back to leading sentences");
            return Ok(split_sentences(text).into_iter().take(self.top_n).collect());
        }

        let document_embedding = self
            .embedder
            .embed(text)
            .await
            .map_err(KeyPhraseError::Embedding)?;

        let phrase_refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let phrase_embeddings = self
            .embedder
            .embed_batch(&phrase_refs)
            .await
            .map_err(KeyPhraseError::Embedding)?;

        if phrase_embeddings.len() != candidates.len() {
            return Err(KeyPhraseError::EmbeddingCountMismatch {
                expected: candidates.len(),
                actual: phrase_embeddings.len(),
            });
        }

        let mut scored: Vec<(f32, String)> = phrase_embeddings
            .iter()
            .map(|embedding| document_embedding.cosine_similarity(embedding))
            .zip(candidates)
            .collect();

        scored.sort_by(|(score_a, phrase_a), (score_b, phrase_b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| phrase_b.cmp(phrase_a))
        });

        tracing::debug!(candidates = scored.len(), "Ranked key phrases");

        Ok(scored
            .into_iter()
            .take(self.top_n)
            .map(|(_, phrase)| phrase)
            .collect())
    }
}

/// Heuristic phrase candidates: runs of capitalised or long words inside a
/// sentence, deduplicated and limited to 3..=50 characters.
pub fn candidate_phrases(text: &str) -> Vec<String> {
    let mut phrases = BTreeSet::new();

    for sentence in split_sentences(text) {
        let mut run: Vec<&str> = Vec::new();

        for word in sentence.split_whitespace() {
            if is_notable(word) {
                run.push(word);
            } else if !run.is_empty() {
                phrases.insert(run.join(" "));
                run.clear();
            }
        }

        if !run.is_empty() {
            phrases.insert(run.join(" "));
        }
    }

    phrases
        .into_iter()
        .filter(|phrase| (MIN_PHRASE_CHARS..=MAX_PHRASE_CHARS).contains(&phrase.chars().count()))
        .collect()
}

fn is_notable(word: &str) -> bool {
    let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
    starts_upper || word.chars().count() > LONG_WORD_CHARS
}

#[derive(Debug, thiserror::Error)]
pub enum KeyPhraseError {
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("embedder returned {actual} vectors for {expected} phrases")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}
