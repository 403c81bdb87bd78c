//! Batch runner. Validates a run, then screens documents one at a time.
//!
//! Every document gets its own result boundary: an extraction or completion
//! failure is recorded in that document's report and the loop moves on.

use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::{extract_text, DocumentKind, ExtractionError, UploadedDocument};
use crate::llm_client::CompletionClient;
use crate::screening::pipeline::{run_pipeline, PipelineError, PipelineResult};

#[derive(Debug, Error, PartialEq)]
#[error("Please upload resumes and provide a job description.")]
pub struct ValidationError {
    pub missing_job_description: bool,
    pub missing_documents: bool,
}

#[derive(Debug)]
pub enum DocumentOutcome {
    Completed(PipelineResult),
    ExtractionFailed(ExtractionError),
    PipelineFailed(PipelineError),
}

/// Outcome of screening one uploaded document.
#[derive(Debug)]
pub struct DocumentReport {
    pub filename: String,
    pub kind: DocumentKind,
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Completed(_))
    }
}

/// Rejects a run with a blank job description or no documents.
pub fn validate_run(job_description: &str, document_count: usize) -> Result<(), ValidationError> {
    let missing_job_description = job_description.trim().is_empty();
    let missing_documents = document_count == 0;

    if missing_job_description || missing_documents {
        return Err(ValidationError {
            missing_job_description,
            missing_documents,
        });
    }
    Ok(())
}

/// Screens `documents` in upload order against `job_description`.
///
/// Validation happens before any extraction or completion call. Reports are
/// returned in the same order as `documents`.
pub async fn screen_documents(
    llm: &dyn CompletionClient,
    job_description: &str,
    documents: &[UploadedDocument],
) -> Result<Vec<DocumentReport>, ValidationError> {
    validate_run(job_description, documents.len())?;

    let total = documents.len();
    let mut reports = Vec::with_capacity(total);

    for (index, document) in documents.iter().enumerate() {
        info!("[{}/{}] Screening {}", index + 1, total, document.filename);
        let outcome = screen_document(llm, job_description, document).await;

        match &outcome {
            DocumentOutcome::Completed(_) => info!("{}: screening complete", document.filename),
            DocumentOutcome::ExtractionFailed(e) => warn!("{}: {e}", document.filename),
            DocumentOutcome::PipelineFailed(e) => warn!("{}: {e}", document.filename),
        }

        reports.push(DocumentReport {
            filename: document.filename.clone(),
            kind: document.kind,
            outcome,
        });
    }

    let completed = reports.iter().filter(|r| r.is_completed()).count();
    info!("Screening run finished: {completed}/{total} documents completed");

    Ok(reports)
}

async fn screen_document(
    llm: &dyn CompletionClient,
    job_description: &str,
    document: &UploadedDocument,
) -> DocumentOutcome {
    let owned = document.clone();
    let resume_text = match extract_isolated(move || extract_text(&owned)).await {
        Ok(text) => text,
        Err(e) => return DocumentOutcome::ExtractionFailed(e),
    };

    match run_pipeline(llm, &resume_text, job_description).await {
        Ok(result) => DocumentOutcome::Completed(result),
        Err(e) => DocumentOutcome::PipelineFailed(e),
    }
}

/// Runs a parser off the async executor. A panic inside the parser becomes
/// an extraction error for that document only.
async fn extract_isolated<F>(extract: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(extract)
        .await
        .unwrap_or_else(|e| Err(ExtractionError::Panicked(join_error_message(e))))
}

fn join_error_message(e: tokio::task::JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
