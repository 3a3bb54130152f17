use async_trait::async_trait;

use crate::domain::Document;

/// Turns the raw bytes of an upload into plain text.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(&self, data: &[u8], document: &Document)
    -> Result<String, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("no extractor for {0}")]
    UnsupportedContentType(String),
    #[error("could not read document: {0}")]
    ExtractionFailed(String),
}
