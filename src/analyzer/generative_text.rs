use crate::analyzer::llm_client::{
    send_json, ApiKey, CompletionFuture, CompletionProvider, DEFAULT_GENERATIVE_TEXT_MODEL,
};
use crate::error::ProviderError;
use crate::models::AnalysisRequest;
use serde::{Deserialize, Serialize};

pub const REPLY_TEXT_PATH: &str = "candidates[0].content.parts[0].text";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RequestPart {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Adapter for `generateContent`-style endpoints. The credential travels as
/// the `key` query parameter.
pub struct GenerativeTextClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
    model_name: String,
}

impl GenerativeTextClient {
    pub fn new(http: reqwest::Client, endpoint: String, api_key: ApiKey) -> Self {
        let model_name = model_from_endpoint(&endpoint)
            .unwrap_or(DEFAULT_GENERATIVE_TEXT_MODEL)
            .to_string();
        Self {
            http,
            endpoint,
            api_key,
            model_name,
        }
    }

    pub fn request_body(request: &AnalysisRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: request.prompt().to_string(),
                }],
            }],
        }
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<String, ProviderError> {
        let body = send_json(
            self.http
                .post(&self.endpoint)
                .query(&[("key", self.api_key.expose())])
                .json(&Self::request_body(request)),
        )
        .await?;

        extract_reply_text(&body)
    }
}

impl CompletionProvider for GenerativeTextClient {
    fn complete<'a>(&'a self, request: &'a AnalysisRequest) -> CompletionFuture<'a> {
        Box::pin(self.send(request))
    }

    fn provider_name(&self) -> &str {
        "generative-text"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn extract_reply_text(body: &str) -> Result<String, ProviderError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::InvalidBody(e.to_string()))?;

    parsed
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(ProviderError::MissingReplyField {
            path: REPLY_TEXT_PATH,
        })
}

/// `.../models/gemini-pro:generateContent` -> `gemini-pro`
fn model_from_endpoint(endpoint: &str) -> Option<&str> {
    let path = endpoint.split('?').next()?;
    let segment = path.rsplit('/').next()?;
    let (model, method) = segment.split_once(':')?;
    if model.is_empty() || !method.starts_with("generate") {
        None
    } else {
        Some(model)
    }
}
