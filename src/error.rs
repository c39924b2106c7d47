use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimCheckError {
    #[error("No claim provided - claim text is empty")]
    EmptyClaim,

    #[error("Completion provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid model reply: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClaimCheckError {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimCheckError::EmptyClaim => "validation",
            ClaimCheckError::Provider(_) => "provider",
            ClaimCheckError::Parse(_) => "parse",
            ClaimCheckError::Config(_) => "config",
            ClaimCheckError::InvalidArguments(_) => "arguments",
            ClaimCheckError::Io(_) => "io",
            ClaimCheckError::Serialization(_) => "serialization",
        }
    }
}

/// Every way a single completion call can fail. The orchestrator handles all
/// variants the same way; they only differ in what gets logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider response body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("Provider response is missing reply text at `{path}`")]
    MissingReplyField { path: &'static str },

    #[error("Provider call timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL can carry the credential as a query parameter.
        let err = err.without_url();
        if err.is_timeout() {
            ProviderError::Transport(format!("request timed out: {}", err))
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
