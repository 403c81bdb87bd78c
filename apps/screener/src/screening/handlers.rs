//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{DocumentKind, UploadedDocument};
use crate::screening::batch::{screen_documents, DocumentOutcome, DocumentReport};
use crate::screening::pipeline::Stage;
use crate::state::AppState;

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const RESUMES_FIELD: &str = "resumes";

pub const EXTRACTED_INFO_LABEL: &str = "Extracted Info";
pub const MATCH_REPORT_LABEL: &str = "Match Report";
pub const EXPLANATION_LABEL: &str = "HR-Friendly Explanation";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub documents: Vec<DocumentView>,
}

/// One document's results, in upload order.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentView {
    Completed {
        filename: String,
        format: DocumentKind,
        sections: Vec<Section>,
    },
    Failed {
        filename: String,
        format: DocumentKind,
        error: FailureView,
    },
}

/// A labeled, independently expandable block of text.
#[derive(Debug, Serialize)]
pub struct Section {
    pub label: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FailureView {
    /// "extraction" or "completion"
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub message: String,
}

impl From<DocumentReport> for DocumentView {
    fn from(report: DocumentReport) -> Self {
        let filename = report.filename;
        let format = report.kind;
        match report.outcome {
            DocumentOutcome::Completed(result) => DocumentView::Completed {
                filename,
                format,
                sections: vec![
                    Section {
                        label: EXTRACTED_INFO_LABEL,
                        content: result.extracted_info,
                    },
                    Section {
                        label: MATCH_REPORT_LABEL,
                        content: result.match_report,
                    },
                    Section {
                        label: EXPLANATION_LABEL,
                        content: result.explanation,
                    },
                ],
            },
            DocumentOutcome::ExtractionFailed(e) => DocumentView::Failed {
                error: FailureView {
                    kind: "extraction",
                    stage: None,
                    reason: None,
                    message: if filename.is_empty() {
                        e.to_string()
                    } else {
                        format!("{filename}: {e}")
                    },
                },
                filename,
                format,
            },
            DocumentOutcome::PipelineFailed(e) => DocumentView::Failed {
                error: FailureView {
                    kind: "completion",
                    stage: Some(e.stage),
                    reason: Some(e.source.kind()),
                    message: e.to_string(),
                },
                filename,
                format,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Multipart form: one `job_description` text field and one or more
/// `resumes` file fields. Documents are screened sequentially; a failed
/// document is reported in place and does not fail the request.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut job_description = String::new();
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JOB_DESCRIPTION_FIELD => job_description = field.text().await?,
            RESUMES_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?;
                // Browsers send an empty, nameless part when no file was picked.
                // A nameless part with content is kept and fails on its own.
                if filename.is_empty() && content.is_empty() {
                    continue;
                }
                documents.push(UploadedDocument::new(filename, content));
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let run_id = Uuid::new_v4();
    info!(
        "Screening run {} requested for {} document(s)",
        run_id,
        documents.len()
    );

    let reports = screen_documents(state.llm.as_ref(), &job_description, &documents).await?;

    Ok(Json(ScreeningResponse {
        run_id,
        documents: reports.into_iter().map(DocumentView::from).collect(),
    }))
}
