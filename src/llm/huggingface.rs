use super::{LlmError, SummaryRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct GenerationParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

fn build_request(request: &SummaryRequest) -> InferenceRequest<'_> {
    InferenceRequest {
        inputs: &request.input,
        parameters: GenerationParameters {
            min_length: request.min_length,
            max_length: request.max_length,
            do_sample: false,
        },
        options: InferenceOptions {
            wait_for_model: true,
        },
    }
}

/// Run a hosted summarization pipeline (e.g. `facebook/bart-large-cnn`).
pub async fn summarize(
    config: &HuggingFaceConfig,
    request: &SummaryRequest,
) -> Result<String, LlmError> {
    let client = Client::new();
    let url = format!("{}/{}", config.base_url.trim_end_matches('/'), request.model);
    debug!(%url, chars = request.input.len(), "hugging face summarization request");

    let mut req = client
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&build_request(request));

    if !config.api_key.is_empty() {
        req = req.header("Authorization", format!("Bearer {}", config.api_key));
    }

    let resp = req.send().await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            status,
            message: text,
        });
    }

    let data: Vec<SummaryOutput> = resp.json().await?;
    parse_outputs(data)
}

fn parse_outputs(data: Vec<SummaryOutput>) -> Result<String, LlmError> {
    data.into_iter()
        .next()
        .map(|o| o.summary_text)
        .ok_or_else(|| LlmError::Parse("empty summarization response".into()))
}
