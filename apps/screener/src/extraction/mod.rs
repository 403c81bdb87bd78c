//! Document text extraction: turns an uploaded resume into plain text.
//!
//! Dispatch is by declared filename suffix only (no content sniffing).
//! Each `DocumentKind` variant owns its extraction routine.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod docx;
pub mod pdf;

/// Returned in place of text when the filename suffix is not supported.
pub const UNSUPPORTED_FORMAT_TEXT: &str = "Unsupported file format.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to open PDF: {0}")]
    Pdf(#[source] lopdf::Error),

    #[error("Failed to open DOCX: {0}")]
    Docx(#[source] docx_rs::ReaderError),

    #[error("Upload has no filename, so its format cannot be determined")]
    MissingFilename,

    #[error("Parser crashed while reading the document: {0}")]
    Panicked(String),
}

/// Container formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentKind {
    /// Case-sensitive suffix match: `resume.PDF` is unsupported.
    pub fn from_filename(filename: &str) -> Self {
        if filename.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if filename.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::Unsupported
        }
    }

    pub fn extract(self, content: &[u8]) -> Result<String, ExtractionError> {
        match self {
            DocumentKind::Pdf => pdf::extract_text(content),
            DocumentKind::Docx => docx::extract_text(content),
            DocumentKind::Unsupported => Ok(UNSUPPORTED_FORMAT_TEXT.to_string()),
        }
    }
}

/// A file handed over by the presentation shell. Consumed once by extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content: Bytes,
    pub kind: DocumentKind,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename);
        Self {
            filename,
            content: content.into(),
            kind,
        }
    }
}

/// Extracts the plain text of `document`, or the unsupported-format sentinel.
pub fn extract_text(document: &UploadedDocument) -> Result<String, ExtractionError> {
    if document.filename.is_empty() {
        return Err(ExtractionError::MissingFilename);
    }
    if document.kind == DocumentKind::Unsupported {
        warn!(
            "{}: unsupported file format, passing sentinel text downstream",
            document.filename
        );
    }

    let text = document.kind.extract(&document.content)?;
    debug!(
        "{}: extracted {} chars as {:?}",
        document.filename,
        text.len(),
        document.kind
    );
    Ok(text)
}

/// Joins page/paragraph segments with a single newline, keeping empty ones.
pub(crate) fn join_segments<I>(segments: I) -> String
where
    I: IntoIterator<Item = String>,
{
    segments.into_iter().collect::<Vec<_>>().join("\n")
}
