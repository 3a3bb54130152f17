use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Page-by-page PDF text via pdf_oxide. Pages are joined with a single
/// newline, unreadable pages contribute an empty line.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Text of every page, in page order. Blocks; callers on the runtime go
    /// through `extract_text`.
    pub fn pages(data: &[u8]) -> Result<Vec<String>, FileLoaderError> {
        read_pages(data)
    }
}

/// pdf_oxide opens from a path, so the upload is spooled to a temp file that
/// is removed when this returns.
fn read_pages(data: &[u8]) -> Result<Vec<String>, FileLoaderError> {
    let mut spool = tempfile::NamedTempFile::new()
        .map_err(|e| extraction_failed("failed to create temp file", e))?;
    spool
        .write_all(data)
        .map_err(|e| extraction_failed("failed to write temp file", e))?;

    let mut pdf =
        PdfDocument::open(spool.path()).map_err(|e| extraction_failed("failed to parse PDF", e))?;
    let page_count = pdf
        .page_count()
        .map_err(|e| extraction_failed("failed to read page count", e))?;

    Ok((0..page_count)
        .map(|index| {
            pdf.extract_text(index).unwrap_or_else(|e| {
                tracing::warn!(page = index + 1, error = %e, "Skipping unreadable page");
                String::new()
            })
        })
        .collect())
}

fn extraction_failed(context: &str, error: impl std::fmt::Display) -> FileLoaderError {
    FileLoaderError::ExtractionFailed(format!("{context}: {error}"))
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let owned = data.to_vec();
        let extraction = tokio::task::spawn_blocking(move || read_pages(&owned));

        let pages = match tokio::time::timeout(EXTRACTION_TIMEOUT, extraction).await {
            Ok(joined) => joined.map_err(|e| extraction_failed("extraction task failed", e))??,
            Err(_) => {
                return Err(FileLoaderError::ExtractionFailed(format!(
                    "PDF extraction exceeded {}s",
                    EXTRACTION_TIMEOUT.as_secs()
                )));
            }
        };

        tracing::info!(page_count = pages.len(), "PDF text extraction complete");

        Ok(pages.join("\n"))
    }
}
