use crate::config::AppSettings;
use crate::doc_processor::Document;
use crate::llm::Summarizer;
use crate::metrics::{self, EvaluationReport};
use crate::summarizer::{self, SummarizeError, SummaryOptions};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No document loaded. Upload a PDF first.")]
    NoDocument,
    #[error("No generated abstract yet. Run 'generate' first.")]
    NoSummary,
    #[error("Please enter the original abstract for evaluation.")]
    EmptyReference,
    #[error("the model returned an empty summary")]
    EmptySummary,
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

/// State of one interactive session.
///
/// Holds at most one document and the last summary generated from it.
/// Uploading a document clears the summary; a successful generation
/// overwrites it; a failed one leaves it as it was.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub prompt: String,
    pub model: String,
    pub options: SummaryOptions,
    document: Option<Document>,
    summary: Option<String>,
}

impl Session {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: settings.prompt(),
            model: settings.model(),
            options: settings.summary.clone(),
            document: None,
            summary: None,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Replace the current document; any previous summary is discarded.
    pub fn load_document(&mut self, document: Document) {
        info!(session = %self.id, file = %document.file_name, "document loaded");
        self.document = Some(document);
        self.summary = None;
    }

    /// Summarize the current document with `model` and keep the result.
    pub async fn generate<S: Summarizer + ?Sized>(
        &mut self,
        model: &S,
        model_id: &str,
    ) -> Result<&str, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let span = info_span!("generate", session = %self.id, model = model_id);

        let summary = summarizer::summarize(
            model,
            model_id,
            &self.prompt,
            &document.content,
            &self.options,
        )
        .instrument(span)
        .await?;

        if summary.is_empty() {
            return Err(SessionError::EmptySummary);
        }
        Ok(self.summary.insert(summary).as_str())
    }

    /// Score the stored summary against a reference abstract.
    pub fn evaluate(&self, reference: &str) -> Result<EvaluationReport, SessionError> {
        let summary = self.summary.as_deref().ok_or(SessionError::NoSummary)?;
        if reference.trim().is_empty() {
            return Err(SessionError::EmptyReference);
        }
        Ok(metrics::evaluate(reference, summary))
    }
}
