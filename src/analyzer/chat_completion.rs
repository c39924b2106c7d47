use crate::analyzer::llm_client::{send_json, ApiKey, CompletionFuture, CompletionProvider};
use crate::error::ProviderError;
use crate::models::AnalysisRequest;
use serde::{Deserialize, Serialize};

pub const REPLY_TEXT_PATH: &str = "choices[0].message.content";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Adapter for OpenAI-compatible `chat/completions` endpoints.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
    model_name: String,
}

impl ChatCompletionClient {
    pub fn new(http: reqwest::Client, endpoint: String, api_key: ApiKey, model_name: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
            model_name,
        }
    }

    pub fn request_body(&self, request: &AnalysisRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt().to_string(),
            }],
        }
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<String, ProviderError> {
        let body = send_json(
            self.http
                .post(&self.endpoint)
                .bearer_auth(self.api_key.expose())
                .json(&self.request_body(request)),
        )
        .await?;

        extract_reply_text(&body)
    }
}

impl CompletionProvider for ChatCompletionClient {
    fn complete<'a>(&'a self, request: &'a AnalysisRequest) -> CompletionFuture<'a> {
        Box::pin(self.send(request))
    }

    fn provider_name(&self) -> &str {
        "chat-completion"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn extract_reply_text(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::InvalidBody(e.to_string()))?;

    parsed
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or(ProviderError::MissingReplyField {
            path: REPLY_TEXT_PATH,
        })
}
