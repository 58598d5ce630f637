use super::{length_instruction, LlmError, SummaryRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ClaudeMessage>,
    system: String,
}

#[derive(Serialize, Deserialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: Option<String>,
}

fn build_request(request: &SummaryRequest) -> ClaudeRequest {
    ClaudeRequest {
        model: request.model.clone(),
        max_tokens: request.max_length,
        temperature: 0.0,
        messages: vec![ClaudeMessage {
            role: "user".into(),
            content: request.input.clone(),
        }],
        system: length_instruction(request),
    }
}

fn first_text(data: ClaudeResponse) -> Result<String, LlmError> {
    data.content
        .into_iter()
        .find_map(|c| c.text)
        .ok_or_else(|| LlmError::Parse("response contained no text block".into()))
}

pub async fn summarize(config: &ClaudeConfig, request: &SummaryRequest) -> Result<String, LlmError> {
    let client = Client::new();
    let body = build_request(request);

    let resp = client
        .post(format!("{}/v1/messages", config.base_url))
        .header("Content-Type", "application/json")
        .header("x-api-key", &config.api_key)
        .header("anthropic-version", "2023-06-01")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            status,
            message: text,
        });
    }

    let data: ClaudeResponse = resp.json().await?;
    first_text(data)
}
