use std::io::Cursor;

use docquiz::application::ports::{FileLoader, FileLoaderError};
use docquiz::domain::{ContentType, Document};
use docquiz::infrastructure::text_processing::DocxAdapter;
use docx_rs::{Docx, Paragraph, Run};

fn build_docx(paragraphs: &[&[&str]]) -> Vec<u8> {
    let mut docx = Docx::new();
    for runs in paragraphs {
        let mut paragraph = Paragraph::new();
        for text in *runs {
            paragraph = paragraph.add_run(Run::new().add_text(*text));
        }
        docx = docx.add_paragraph(paragraph);
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).unwrap();
    buffer.into_inner()
}

#[test]
fn given_docx_with_paragraphs_when_reading_then_returns_one_entry_per_paragraph() {
    let data = build_docx(&[&["Alice went to Paris."], &["The Eiffel Tower ", "is tall."]]);

    let paragraphs = DocxAdapter::paragraphs(&data).unwrap();

    assert_eq!(
        paragraphs,
        vec!["Alice went to Paris.", "The Eiffel Tower is tall."]
    );
}

#[tokio::test]
async fn given_docx_document_when_extracting_then_joins_paragraphs_with_newlines() {
    let data = build_docx(&[&["First"], &["Second"]]);
    let document = Document::new(
        "essay.docx".to_string(),
        ContentType::Docx,
        data.len() as u64,
    );

    let text = DocxAdapter::new().extract_text(&data, &document).await.unwrap();

    assert_eq!(text, "First\nSecond");
}

#[tokio::test]
async fn given_corrupt_bytes_when_extracting_then_returns_extraction_failed() {
    let data = b"PK definitely not a docx";
    let document = Document::new(
        "broken.docx".to_string(),
        ContentType::Docx,
        data.len() as u64,
    );

    let result = DocxAdapter::new().extract_text(data, &document).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_non_docx_content_type_when_extracting_then_returns_unsupported() {
    let data = b"plain";
    let document = Document::new("notes.txt".to_string(), ContentType::Text, 5);

    let result = DocxAdapter::new().extract_text(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}
