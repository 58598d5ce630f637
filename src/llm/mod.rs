pub mod claude;
pub mod huggingface;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One summarization call. Decoding is always greedy (no sampling).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SummaryRequest {
    pub model: String,
    pub input: String,
    pub min_length: u32,
    pub max_length: u32,
}

/// A backend able to turn one input text into one summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, LlmError>;
}

/// Unified summarization backend, dispatching to Hugging Face, OpenAI-compatible or Claude.
#[derive(Debug, Clone)]
pub enum Provider {
    HuggingFace(huggingface::HuggingFaceConfig),
    OpenAi(openai::OpenAiConfig),
    Claude(claude::ClaudeConfig),
    Ollama(openai::OpenAiConfig),
}

impl Provider {
    pub fn ollama(host: String) -> Self {
        Provider::Ollama(openai::OpenAiConfig {
            api_key: String::new(),
            base_url: format!("{}/v1", host.trim_end_matches('/')),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::HuggingFace(_) => "huggingface",
            Provider::OpenAi(_) => "openai",
            Provider::Claude(_) => "claude",
            Provider::Ollama(_) => "ollama",
        }
    }
}

#[async_trait]
impl Summarizer for Provider {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, LlmError> {
        match self {
            Provider::HuggingFace(config) => huggingface::summarize(config, request).await,
            Provider::OpenAi(config) | Provider::Ollama(config) => {
                openai::summarize(config, request).await
            }
            Provider::Claude(config) => claude::summarize(config, request).await,
        }
    }
}

/// System instruction for chat models, which have no native minimum length.
pub(crate) fn length_instruction(request: &SummaryRequest) -> String {
    format!(
        "You are a summarization model. Reply with only the summary of the user's text, \
         between {} and {} tokens long.",
        request.min_length, request.max_length
    )
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}
