use std::sync::Arc;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, Flashcard};

use super::flashcard_generator::{FlashcardError, FlashcardGenerator};
use super::question_generator::{QuestionGenerationError, QuestionGenerator};

/// Runs the whole pipeline for one uploaded document: text extraction,
/// question generation, then flashcard generation.
pub struct AnalysisService {
    file_loader: Arc<dyn FileLoader>,
    question_generator: QuestionGenerator,
    flashcard_generator: FlashcardGenerator,
}

impl AnalysisService {
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        question_generator: QuestionGenerator,
        flashcard_generator: FlashcardGenerator,
    ) -> Self {
        Self {
            file_loader,
            question_generator,
            flashcard_generator,
        }
    }

    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn analyze(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<AnalysisReport, AnalysisError> {
        let document = Document::from_upload(filename, data);
        tracing::debug!(content_type = ?document.content_type, "Extracting document text");

        let text = self.file_loader.extract_text(data, &document).await?;

        let questions = self.question_generator.generate(&text).await?;
        tracing::info!(count = questions.len(), "Generated questions");

        let flashcards = self.flashcard_generator.generate(&text).await?;
        tracing::info!(count = flashcards.len(), "Generated flashcards");

        Ok(AnalysisReport {
            questions,
            flashcards,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub questions: Vec<String>,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("text extraction: {0}")]
    Extraction(#[from] FileLoaderError),
    #[error("question generation: {0}")]
    Questions(#[from] QuestionGenerationError),
    #[error("flashcard generation: {0}")]
    Flashcards(#[from] FlashcardError),
}
