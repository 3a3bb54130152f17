use std::sync::Arc;

use docquiz::application::ports::{FileLoader, FileLoaderError};
use docquiz::domain::{ContentType, Document};
use docquiz::infrastructure::text_processing::{
    CompositeFileLoader, DocxAdapter, PdfAdapter, PlainTextAdapter,
};

#[tokio::test]
async fn given_text_document_when_loading_then_delegates_to_text_adapter() {
    let pdf_adapter: Arc<dyn FileLoader> = Arc::new(PdfAdapter::new());
    let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let loader = CompositeFileLoader::new(vec![
        (ContentType::Pdf, pdf_adapter),
        (ContentType::Text, text_adapter),
    ]);

    let text_bytes = b"Hello plain text";
    let document = Document::new(
        "readme.txt".to_string(),
        ContentType::Text,
        text_bytes.len() as u64,
    );

    let result = loader.extract_text(text_bytes, &document).await;

    assert_eq!(result.unwrap(), "Hello plain text");
}

#[tokio::test]
async fn given_unregistered_content_type_when_loading_then_returns_unsupported() {
    let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let docx_adapter: Arc<dyn FileLoader> = Arc::new(DocxAdapter::new());
    let loader = CompositeFileLoader::new(vec![
        (ContentType::Text, text_adapter),
        (ContentType::Docx, docx_adapter),
    ]);

    let data = b"%PDF-1.7";
    let document = Document::new("paper.pdf".to_string(), ContentType::Pdf, data.len() as u64);

    let result = loader.extract_text(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}

#[tokio::test]
async fn given_default_adapters_when_loading_invalid_utf8_then_propagates_extraction_failure() {
    let loader = CompositeFileLoader::with_default_adapters();

    let data: &[u8] = &[0xC3, 0x28];
    let document = Document::from_upload("notes.md", data);

    let result = loader.extract_text(data, &document).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_default_adapters_when_loading_garbage_pdf_then_returns_extraction_failure() {
    let loader = CompositeFileLoader::with_default_adapters();

    let data = b"this is not a pdf";
    let document = Document::from_upload("paper.pdf", data);

    let result = loader.extract_text(data, &document).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}
