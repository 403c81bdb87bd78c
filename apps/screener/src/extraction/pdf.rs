//! PDF text extraction: one segment per page, in page order.

use lopdf::Document;
use tracing::warn;

use crate::extraction::{join_segments, ExtractionError};

/// Extracts text from every page. A page whose text layer is missing or
/// undecodable contributes an empty segment rather than being dropped.
pub fn extract_text(content: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(content).map_err(ExtractionError::Pdf)?;

    // get_pages() is keyed by page number, so iteration is page order.
    let pages = doc.get_pages().into_keys().map(|page_num| {
        match doc.extract_text(&[page_num]) {
            Ok(text) => text.trim_end_matches(['\r', '\n']).to_string(),
            Err(e) => {
                warn!("No extractable text on page {page_num}: {e}");
                String::new()
            }
        }
    });

    Ok(join_segments(pages))
}
