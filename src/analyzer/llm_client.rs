use crate::analyzer::chat_completion::ChatCompletionClient;
use crate::analyzer::generative_text::GenerativeTextClient;
use crate::error::{ClaimCheckError, ProviderError};
use crate::models::AnalysisRequest;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_PROVIDER: &str = "CLAIMCHECK_PROVIDER";
pub const ENV_ENDPOINT: &str = "CLAIMCHECK_ENDPOINT";
pub const ENV_API_KEY: &str = "CLAIMCHECK_API_KEY";
pub const ENV_MODEL: &str = "CLAIMCHECK_MODEL";
pub const ENV_TIMEOUT: &str = "CLAIMCHECK_TIMEOUT";

pub const DEFAULT_GENERATIVE_TEXT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
pub const DEFAULT_CHAT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GENERATIVE_TEXT_MODEL: &str = "gemini-pro";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MIN_TIMEOUT_SECONDS: u64 = 5;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Maximum characters of an error body kept in a `ProviderError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 300;

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

/// A remote text-generation service. One call to `complete` issues exactly
/// one request and returns the model's unparsed reply text.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(&'a self, request: &'a AnalysisRequest) -> CompletionFuture<'a>;
    fn provider_name(&self) -> &str;
    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `candidates[0].content.parts[0].text` style endpoints, key in the query.
    GenerativeText,
    /// `choices[0].message.content` style endpoints, bearer token.
    ChatCompletion,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GenerativeText => "generative-text",
            ProviderKind::ChatCompletion => "chat-completion",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::GenerativeText => DEFAULT_GENERATIVE_TEXT_ENDPOINT,
            ProviderKind::ChatCompletion => DEFAULT_CHAT_COMPLETION_ENDPOINT,
        }
    }

    /// The generative-text model is part of the endpoint path; this label is
    /// only used when the endpoint does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::GenerativeText => DEFAULT_GENERATIVE_TEXT_MODEL,
            ProviderKind::ChatCompletion => DEFAULT_CHAT_MODEL,
        }
    }

    /// Vendor-specific variable consulted when `CLAIMCHECK_API_KEY` is unset.
    pub fn fallback_key_variable(&self) -> &'static str {
        match self {
            ProviderKind::GenerativeText => "GEMINI_API_KEY",
            ProviderKind::ChatCompletion => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ClaimCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "generative-text" | "generative_text" => Ok(ProviderKind::GenerativeText),
            "openai" | "chat" | "chat-completion" | "chat_completion" => {
                Ok(ProviderKind::ChatCompletion)
            }
            other => Err(ClaimCheckError::Config(format!(
                "Unsupported provider '{}'. Use gemini (generative-text) or openai (chat-completion)",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential for a provider. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    pub api_key: ApiKey,
    pub model_name: String,
    pub timeout_seconds: u64,
    pub use_system_proxy: bool,
}

impl LlmConfig {
    pub fn new(provider: ProviderKind, api_key: ApiKey) -> Self {
        Self {
            provider,
            endpoint: provider.default_endpoint().to_string(),
            api_key,
            model_name: provider.default_model().to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            use_system_proxy: true,
        }
    }

    pub fn from_env() -> Result<Self, ClaimCheckError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClaimCheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let provider = match get(ENV_PROVIDER) {
            Some(value) => value.parse::<ProviderKind>()?,
            None => ProviderKind::GenerativeText,
        };

        let api_key = get(ENV_API_KEY)
            .or_else(|| get(provider.fallback_key_variable()))
            .map(ApiKey::new)
            .ok_or_else(|| {
                ClaimCheckError::Config(format!(
                    "API key not found. Set {} or {}",
                    ENV_API_KEY,
                    provider.fallback_key_variable()
                ))
            })?;

        let mut config = Self::new(provider, api_key);

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.endpoint = endpoint.trim().to_string();
        }

        if let Some(model) = get(ENV_MODEL) {
            config.model_name = model.trim().to_string();
        }

        if let Some(timeout) = get(ENV_TIMEOUT) {
            config.timeout_seconds = timeout.trim().parse::<u64>().map_err(|_| {
                ClaimCheckError::Config(format!("{} must be a number of seconds", ENV_TIMEOUT))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model_name = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn without_system_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<(), ClaimCheckError> {
        if self.endpoint.trim().is_empty() {
            return Err(ClaimCheckError::Config("Endpoint cannot be empty".to_string()));
        }

        if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&self.timeout_seconds) {
            return Err(ClaimCheckError::Config(format!(
                "Timeout must be between {} and {} seconds",
                MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS
            )));
        }

        if self.api_key.expose().trim().is_empty() {
            return Err(ClaimCheckError::Config("API key cannot be empty".to_string()));
        }

        if self.provider == ProviderKind::ChatCompletion && self.model_name.trim().is_empty() {
            return Err(ClaimCheckError::Config(
                "A model id is required for chat-completion providers".to_string(),
            ));
        }

        Ok(())
    }
}

pub fn create_completion_provider(
    config: &LlmConfig,
) -> Result<Arc<dyn CompletionProvider>, ClaimCheckError> {
    config.validate()?;
    let http = build_http_client(config)?;

    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::GenerativeText => Arc::new(GenerativeTextClient::new(
            http,
            config.endpoint.clone(),
            config.api_key.clone(),
        )),
        ProviderKind::ChatCompletion => Arc::new(ChatCompletionClient::new(
            http,
            config.endpoint.clone(),
            config.api_key.clone(),
            config.model_name.clone(),
        )),
    };

    tracing::debug!(
        provider = %config.provider,
        model = %provider.model_name(),
        timeout_seconds = config.timeout_seconds,
        "Completion provider created"
    );

    Ok(provider)
}

pub(crate) fn build_http_client(config: &LlmConfig) -> Result<reqwest::Client, ClaimCheckError> {
    let mut builder = reqwest::Client::builder().timeout(config.timeout());
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| ClaimCheckError::Config(format!("Failed to build HTTP client: {}", e.without_url())))
}

/// Sends a JSON request and returns the body of a 2xx response.
pub(crate) async fn send_json(request: reqwest::RequestBuilder) -> Result<String, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
        });
    }

    Ok(body)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
