use crate::doc_processor::{self, PREVIEW_CHARS};
use crate::session::Session;
use std::path::Path;
use tracing::warn;

/// Extract a file into the session and return a preview of its text.
pub fn upload_document(session: &mut Session, file_path: &str) -> Result<String, String> {
    let path = Path::new(file_path);
    let parsed = doc_processor::parse_file(path).map_err(|e| {
        warn!(file = %file_path, error = %e, "document extraction failed");
        format!(
            "No text extracted from {}: {}. Please check the file and try again.",
            file_path, e
        )
    })?;

    let preview = doc_processor::preview(&parsed.content, PREVIEW_CHARS);
    session.load_document(parsed);
    Ok(preview)
}

/// Preview of the current document's text.
pub fn document_preview(session: &Session) -> Result<String, String> {
    session
        .document()
        .map(|doc| doc_processor::preview(&doc.content, PREVIEW_CHARS))
        .ok_or_else(|| "No document loaded. Upload a PDF first.".to_string())
}
