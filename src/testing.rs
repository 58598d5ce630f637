//! Test doubles and fixtures shared by unit tests.

use crate::llm::{LlmError, Summarizer, SummaryRequest};
use async_trait::async_trait;

/// Returns its input with the prompt removed, standing in for a perfect
/// extractive "model".
pub struct EchoModel {
    prompt: String,
}

impl EchoModel {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
        }
    }
}

#[async_trait]
impl Summarizer for EchoModel {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, LlmError> {
        let body = request.input.strip_prefix(&self.prompt).unwrap_or(&request.input);
        Ok(body.to_string())
    }
}

/// Fails every call.
pub struct FailingModel;

#[async_trait]
impl Summarizer for FailingModel {
    async fn summarize(&self, _request: &SummaryRequest) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "model is loading".into(),
        })
    }
}

/// A minimal PDF with one page per entry of `pages`, set in Helvetica.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let font_id = 3 + 2 * page_count;
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content_id = 4 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R \
             /Resources << /Font << /F1 {} 0 R >> >> >>",
            content_id, font_id
        ));
        let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}
