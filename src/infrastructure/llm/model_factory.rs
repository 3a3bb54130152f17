use std::sync::Arc;

use crate::application::ports::{Embedder, TextGenerator};
use crate::presentation::config::ModelSettings;

use super::{CandleT5Generator, LazyModel, LocalCandleEmbedder, ModelLoadError};

/// The process-wide model handles, built once at startup and injected into
/// the services.
pub struct ModelRegistry {
    embedder: Arc<LazyModel<LocalCandleEmbedder>>,
    question_generator: Arc<LazyModel<CandleT5Generator>>,
    flashcard_generator: Arc<LazyModel<CandleT5Generator>>,
}

pub struct ModelFactory;

impl ModelFactory {
    pub fn create(settings: &ModelSettings) -> ModelRegistry {
        let embedder = Arc::new(lazy_embedder(&settings.embedding_model));
        let question_generator = Arc::new(lazy_generator(&settings.question_model));

        // Both call sites differ only in their prompts, so identical weights
        // are loaded once.
        let flashcard_generator = if settings.flashcard_model == settings.question_model {
            Arc::clone(&question_generator)
        } else {
            Arc::new(lazy_generator(&settings.flashcard_model))
        };

        tracing::info!(
            embedding_model = %settings.embedding_model,
            question_model = %settings.question_model,
            flashcard_model = %settings.flashcard_model,
            shared_generator = Arc::ptr_eq(&question_generator, &flashcard_generator),
            "Model registry created"
        );

        ModelRegistry {
            embedder,
            question_generator,
            flashcard_generator,
        }
    }
}

impl ModelRegistry {
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    pub fn question_generator(&self) -> Arc<dyn TextGenerator> {
        self.question_generator.clone()
    }

    pub fn flashcard_generator(&self) -> Arc<dyn TextGenerator> {
        self.flashcard_generator.clone()
    }

    pub fn shares_generator(&self) -> bool {
        Arc::ptr_eq(&self.question_generator, &self.flashcard_generator)
    }

    /// Forces every model to load now instead of on the first request.
    pub async fn preload(&self) -> Result<(), ModelLoadError> {
        self.embedder.get().await?;
        self.question_generator.get().await?;
        if !self.shares_generator() {
            self.flashcard_generator.get().await?;
        }
        Ok(())
    }
}

fn lazy_embedder(model_id: &str) -> LazyModel<LocalCandleEmbedder> {
    let id = model_id.to_string();
    LazyModel::new(model_id, move || LocalCandleEmbedder::new(&id))
}

fn lazy_generator(model_id: &str) -> LazyModel<CandleT5Generator> {
    let id = model_id.to_string();
    LazyModel::new(model_id, move || CandleT5Generator::new(&id))
}
