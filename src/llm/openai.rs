use super::{length_instruction, LlmError, SummaryRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

fn build_request(request: &SummaryRequest) -> OpenAiRequest {
    OpenAiRequest {
        model: request.model.clone(),
        messages: vec![
            OpenAiMessage {
                role: "system".into(),
                content: length_instruction(request),
            },
            OpenAiMessage {
                role: "user".into(),
                content: request.input.clone(),
            },
        ],
        temperature: 0.0,
        max_tokens: request.max_length,
        stream: false,
    }
}

pub async fn summarize(config: &OpenAiConfig, request: &SummaryRequest) -> Result<String, LlmError> {
    let client = Client::new();
    let body = build_request(request);

    let mut req = client
        .post(format!("{}/chat/completions", config.base_url))
        .header("Content-Type", "application/json")
        .json(&body);

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

    let data: OpenAiResponse = resp.json().await?;
    data.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| LlmError::Parse("response contained no choices".into()))
}
