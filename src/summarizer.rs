//! Prompt-conditioned, chunked abstractive summarization.

use crate::doc_processor::{self, DEFAULT_CHUNK_TOKENS};
use crate::llm::{LlmError, Summarizer, SummaryRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Generation knobs for one summarization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Lower bound on each chunk summary, in model tokens.
    pub min_length: u32,
    /// Upper bound on each chunk summary, in model tokens.
    pub max_length: u32,
    /// Chunks past this count are not summarized.
    pub chunk_limit: usize,
    /// Token budget of a single chunk.
    pub max_chunk_tokens: usize,
    /// Inserted between the prompt and the chunk text.
    pub prompt_separator: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            min_length: 25,
            max_length: 50,
            chunk_limit: 5,
            max_chunk_tokens: DEFAULT_CHUNK_TOKENS,
            prompt_separator: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("No text to summarize.")]
    EmptyInput,
    #[error("summarization failed on chunk {chunk}: {source}")]
    Model {
        chunk: usize,
        #[source]
        source: LlmError,
    },
}

/// Summarize `text` chunk by chunk and join the results.
///
/// Only the first `chunk_limit` chunks are sent to the model; later material
/// is left out. The call is all-or-nothing: the first failing chunk aborts
/// the run and no partial summary is returned.
pub async fn summarize<S: Summarizer + ?Sized>(
    model: &S,
    model_id: &str,
    prompt: &str,
    text: &str,
    options: &SummaryOptions,
) -> Result<String, SummarizeError> {
    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyInput);
    }

    let chunks = doc_processor::chunk_text(text, options.max_chunk_tokens);
    let kept = chunks.len().min(options.chunk_limit);
    if chunks.len() > kept {
        info!(
            total = chunks.len(),
            dropped = chunks.len() - kept,
            "chunk limit reached, trailing chunks not summarized"
        );
    }

    let mut summaries = Vec::with_capacity(kept);
    for (index, chunk) in chunks.iter().take(kept).enumerate() {
        let request = SummaryRequest {
            model: model_id.to_string(),
            input: format!("{}{}{}", prompt, options.prompt_separator, chunk),
            min_length: options.min_length,
            max_length: options.max_length,
        };
        let summary = model
            .summarize(&request)
            .await
            .map_err(|source| SummarizeError::Model {
                chunk: index + 1,
                source,
            })?;
        debug!(chunk = index + 1, of = kept, "chunk summarized");
        summaries.push(summary);
    }

    Ok(capitalize_sentences(&summaries.join(" ")).trim().to_string())
}

/// Uppercase the first character after every literal `". "`.
///
/// The rest of each segment keeps its case, so acronyms such as "BERT"
/// survive. Python's `str.capitalize()` would lowercase them to "Bert".
///
/// Cosmetic only: it does not re-detect sentences, so text after an
/// abbreviation such as "e.g. " is capitalized too.
pub fn capitalize_sentences(text: &str) -> String {
    text.split(". ")
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(". ")
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
