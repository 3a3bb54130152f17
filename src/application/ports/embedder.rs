use async_trait::async_trait;

use crate::domain::Embedding;

/// Maps text to a fixed-dimension vector where cosine similarity tracks
/// semantic closeness.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError>;

    /// One embedding per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("embedding model unavailable: {0}")]
    ModelLoadFailed(String),
    #[error("embedding failed: {0}")]
    InferenceFailed(String),
}
