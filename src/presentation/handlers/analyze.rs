use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::AnalysisReport;
use crate::domain::Flashcard;
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Default, Serialize)]
pub struct AnalyzeResponse {
    pub questions: Vec<String>,
    pub flashcards: Vec<Flashcard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(report: AnalysisReport) -> Self {
        Self {
            questions: report.questions,
            flashcards: report.flashcards,
            error: None,
        }
    }
}

/// `POST /analyze`. Always answers 200; failures leave both lists empty and
/// set `error`.
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Analyze request is not multipart");
            return degraded(format!("expected a multipart upload: {rejection}"));
        }
    };

    let (filename, data) = match read_upload(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::warn!("Analyze request without a file field");
            return degraded(format!("missing multipart field '{FILE_FIELD}'"));
        }
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(error = %e.body_text(), "Upload exceeds body limit");
            return degraded(format!("upload too large: {}", e.body_text()));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return degraded(format!("failed to read upload: {}", e.body_text()));
        }
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

    match state.analysis_service.analyze(&filename, &data).await {
        Ok(report) => {
            tracing::info!(
                filename = %filename,
                questions = report.questions.len(),
                flashcards = report.flashcards.len(),
                "Document analyzed"
            );
            (StatusCode::OK, Json(AnalyzeResponse::from(report))).into_response()
        }
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "Document analysis failed");
            degraded(e.to_string())
        }
    }
}

fn degraded(message: String) -> Response {
    (StatusCode::OK, Json(AnalyzeResponse::failed(message))).into_response()
}

async fn read_upload(mut multipart: Multipart) -> Result<Option<(String, Bytes)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}
