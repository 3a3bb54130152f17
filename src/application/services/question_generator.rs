use std::sync::Arc;

use crate::application::ports::{GenerationParams, GeneratorError, TextGenerator};

const QUESTION_PROMPT_PREFIX: &str = "generate question: ";
const MIN_QUESTION_CHARS: usize = 5;

#[derive(Debug, Clone)]
pub struct QuestionGeneratorConfig {
    /// Words per chunk fed to the model.
    pub chunk_size: usize,
    /// Chunks past this count are dropped to bound latency.
    pub max_chunks: usize,
    pub params: GenerationParams,
}

/// Generates one quiz question per fixed-size word window of a document.
pub struct QuestionGenerator {
    generator: Arc<dyn TextGenerator>,
    config: QuestionGeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: QuestionGeneratorConfig) -> Self {
        Self { generator, config }
    }

    #[tracing::instrument(skip(self, text), fields(text_chars = text.len()))]
    pub async fn generate(&self, text: &str) -> Result<Vec<String>, QuestionGenerationError> {
        let chunks = chunk_words(text, self.config.chunk_size);
        let total_chunks = chunks.len();
        let mut questions = Vec::new();

        for (index, chunk) in chunks.into_iter().take(self.config.max_chunks).enumerate() {
            let prompt = format!("{QUESTION_PROMPT_PREFIX}{chunk}");
            let generated = self
                .generator
                .generate(&prompt, &self.config.params)
                .await
                .map_err(|source| QuestionGenerationError::Generation { chunk: index, source })?;

            let question = generated.trim();
            if question.chars().count() > MIN_QUESTION_CHARS {
                questions.push(question.to_string());
            } else {
                tracing::debug!(chunk = index, "Discarding short generated question");
            }
        }

        tracing::info!(
            total_chunks,
            processed = total_chunks.min(self.config.max_chunks),
            questions = questions.len(),
            "Question generation complete"
        );

        Ok(questions)
    }
}

/// Groups whitespace-separated words into consecutive windows of
/// `chunk_size` words. The last window may be shorter.
pub fn chunk_words(text: &str, chunk_size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_size.max(1))
        .map(|window| window.join(" "))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionGenerationError {
    #[error("generation failed for chunk {chunk}: {source}")]
    Generation {
        chunk: usize,
        #[source]
        source: GeneratorError,
    },
}
