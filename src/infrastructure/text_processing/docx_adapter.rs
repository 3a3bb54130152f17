use async_trait::async_trait;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// Reads the body paragraphs of a Word document, one paragraph per line.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn paragraphs(data: &[u8]) -> Result<Vec<String>, FileLoaderError> {
        let docx = docx_rs::read_docx(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse DOCX: {e}")))?;

        Ok(docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .collect())
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        push_paragraph_child(child, &mut text);
    }
    text
}

fn push_paragraph_child(child: &ParagraphChild, out: &mut String) {
    match child {
        ParagraphChild::Run(run) => push_run(run, out),
        ParagraphChild::Hyperlink(link) => {
            for nested in &link.children {
                push_paragraph_child(nested, out);
            }
        }
        _ => {}
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let paragraphs = Self::paragraphs(data)?;
        tracing::info!(paragraph_count = paragraphs.len(), "DOCX text extraction complete");

        Ok(paragraphs.join("\n"))
    }
}
