pub mod analyzer;
pub mod cli;
pub mod error;
pub mod models;

pub use error::{ClaimCheckError, ProviderError};

// Re-export commonly used types
pub use models::{
    AnalysisOutcome, AnalysisRequest, AnalysisResult, CancellableOutcome, ClaimText, Verdict,
};

pub use analyzer::{AnalysisOrchestrator, CompletionProvider, LlmConfig, ProviderKind, SchemaPolicy};

pub use cli::CliHandler;
