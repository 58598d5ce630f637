use crate::tokenize;
use std::fs;
use std::panic;
use std::path::Path;
use tracing::debug;

/// Characters shown when previewing extracted text.
pub const PREVIEW_CHARS: usize = 5000;

/// Default token budget per chunk.
pub const DEFAULT_CHUNK_TOKENS: usize = 64;

/// Text extracted from one uploaded file.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub file_type: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("no text could be extracted from the document")]
    Empty,
    #[error("Unsupported file type: .{0}")]
    UnsupportedType(String),
}

/// Parse a document file into plain text
pub fn parse_file(path: &Path) -> Result<Document, DocumentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let (content, file_type) = match ext.as_str() {
        "txt" => (fs::read_to_string(path)?, "txt"),
        "md" | "markdown" => (fs::read_to_string(path)?, "md"),
        "pdf" => {
            let bytes = fs::read(path)?;
            (extract_pdf_text(&bytes)?, "pdf")
        }
        _ => return Err(DocumentError::UnsupportedType(ext)),
    };

    if content.trim().is_empty() {
        return Err(DocumentError::Empty);
    }

    debug!(
        file = %file_name,
        file_type,
        chars = content.chars().count(),
        "document parsed"
    );

    Ok(Document {
        file_name,
        file_type: file_type.into(),
        content,
    })
}

/// Extract the text of every page, in page order, from PDF bytes.
///
/// Never yields partial output: a malformed file, a panic inside the PDF
/// parser or a document without any text all come back as errors.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    debug!(bytes = bytes.len(), "extracting PDF text");

    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| DocumentError::Pdf("parser panicked on malformed input".into()))?
        .map_err(|e| DocumentError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    Ok(text)
}

/// First `limit` characters of `text`, followed by an ellipsis.
pub fn preview(text: &str, limit: usize) -> String {
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head)
}

/// Split text into sentence-aligned chunks of at most `max_tokens` tokens.
///
/// Sentences are packed greedily in reading order. A sentence that alone
/// exceeds the budget is emitted as its own chunk and never split.
pub fn chunk_text(text: &str, max_tokens: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_tokens = 0;

    for sentence in tokenize::sentences(text) {
        let sentence_tokens = tokenize::word_tokens(&sentence).len();
        if current_tokens + sentence_tokens <= max_tokens {
            current.push(' ');
            current.push_str(&sentence);
            current_tokens += sentence_tokens;
        } else {
            let closed = current.trim();
            if !closed.is_empty() {
                chunks.push(closed.to_string());
            }
            current = sentence;
            current_tokens = sentence_tokens;
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        chunks.push(last.to_string());
    }

    chunks
}
