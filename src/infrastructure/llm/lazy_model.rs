use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::application::ports::{
    Embedder, EmbedderError, GenerationParams, GeneratorError, TextGenerator,
};
use crate::domain::Embedding;

use super::{CandleT5Generator, LocalCandleEmbedder};

type Loader<T> = dyn Fn() -> Result<T, String> + Send + Sync;

#[derive(Debug, Clone, thiserror::Error)]
#[error("loading {model} failed: {reason}")]
pub struct ModelLoadError {
    pub model: String,
    pub reason: String,
}

/// A model that is loaded on first use and then shared for the process
/// lifetime.
///
/// The `OnceCell` only guards initialization: concurrent first callers wait
/// for a single load, later callers get the shared `Arc` with no locking. The
/// load itself runs in a spawned task, so a caller that is dropped mid-load
/// (client disconnect) does not release the cell to a second loader. A failed
/// load leaves the cell empty so the next call retries.
pub struct LazyModel<T> {
    name: String,
    cell: Arc<OnceCell<Arc<T>>>,
    loader: Arc<Loader<T>>,
}

impl<T> LazyModel<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F, E>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            name: name.into(),
            cell: Arc::new(OnceCell::new()),
            loader: Arc::new(move || loader().map_err(|e| e.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<T>, ModelLoadError> {
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }

        let cell = Arc::clone(&self.cell);
        let loader = Arc::clone(&self.loader);
        let name = self.name.clone();

        let init = tokio::spawn(async move {
            cell.get_or_try_init(|| load(name, loader))
                .await
                .map(Arc::clone)
        });

        init.await.map_err(|e| ModelLoadError {
            model: self.name.clone(),
            reason: format!("load task failed: {e}"),
        })?
    }
}

async fn load<T>(name: String, loader: Arc<Loader<T>>) -> Result<Arc<T>, ModelLoadError>
where
    T: Send + Sync + 'static,
{
    tracing::info!(model = %name, "Loading model");
    let started = Instant::now();

    let loaded = match tokio::task::spawn_blocking(move || loader()).await {
        Ok(result) => result,
        Err(e) => Err(format!("loader task failed: {e}")),
    };

    match loaded {
        Ok(model) => {
            tracing::info!(
                model = %name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Model ready"
            );
            Ok(Arc::new(model))
        }
        Err(reason) => {
            tracing::error!(model = %name, reason = %reason, "Model loading failed");
            Err(ModelLoadError {
                model: name,
                reason,
            })
        }
    }
}

#[async_trait]
impl Embedder for LazyModel<LocalCandleEmbedder> {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbedderError::InferenceFailed("empty result".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self
            .get()
            .await
            .map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))?;
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();

        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
            model.encode_all(&refs)
        })
        .await
        .map_err(|e| EmbedderError::InferenceFailed(format!("task join error: {e}")))?
    }
}

#[async_trait]
impl TextGenerator for LazyModel<CandleT5Generator> {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        let model = self
            .get()
            .await
            .map_err(|e| GeneratorError::ModelLoadFailed(e.to_string()))?;
        model.generate(prompt, params).await
    }
}
