use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::Settings;
use crate::prompts;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport failure talking to the generation service: {0}")]
    Transport(String),
    #[error("generation service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("generation service returned an empty reply")]
    EmptyReply,
}

/// Turns an aggregated file payload into README markdown.
#[async_trait]
pub trait ReadmeGenerator: Send + Sync {
    async fn generate(&self, payload: &str) -> Result<String, GenerateError>;
}

/// Generator backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    request_timeout: Duration,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// The user message is always the fixed instructional template followed by
/// the aggregated payload.
fn build_user_prompt(payload: &str) -> String {
    format!("{}\n\n{payload}", prompts::README_PROMPT)
}

impl OpenAiGenerator {
    pub fn new(settings: &Settings) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GenerateError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            request_timeout: settings.request_timeout,
        })
    }

    fn build_request(&self, payload: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(payload),
                },
            ],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ReadmeGenerator for OpenAiGenerator {
    async fn generate(&self, payload: &str) -> Result<String, GenerateError> {
        let request = self.build_request(payload);

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerateError::Timeout(self.request_timeout)
                } else {
                    GenerateError::Transport(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api { status, body });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|err| GenerateError::Transport(err.to_string()))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerateError::EmptyReply)?;

        Ok(extract_markdown(&content))
    }
}

/// Pulls the markdown body out of a `{"markdown": "..."}` reply. A reply
/// that is not valid JSON is used verbatim as a degraded fallback; a JSON
/// reply without a markdown field yields an empty string, which the caller
/// treats as "no content generated".
pub fn extract_markdown(reply: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(reply) {
        Ok(value) => value
            .get("markdown")
            .and_then(|markdown| markdown.as_str())
            .map(str::to_string)
            .unwrap_or_default(),
        Err(_) => {
            warn!("generation reply was not valid JSON; using raw text");
            reply.to_string()
        }
    }
}
