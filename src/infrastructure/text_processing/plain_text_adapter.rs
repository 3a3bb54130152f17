use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// Strict UTF-8 decoding; invalid byte sequences are an extraction error.
pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Text {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        std::str::from_utf8(data)
            .map(str::to_string)
            .map_err(|e| {
                FileLoaderError::ExtractionFailed(format!(
                    "{} is not valid UTF-8: {e}",
                    document.filename
                ))
            })
    }
}
