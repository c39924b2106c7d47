// Analyzer module - prompt construction, provider adapters and orchestration

pub mod chat_completion;
pub mod generative_text;
pub mod llm_client;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;

pub use chat_completion::ChatCompletionClient;
pub use generative_text::GenerativeTextClient;
pub use llm_client::{
    create_completion_provider, ApiKey, CompletionFuture, CompletionProvider, LlmConfig,
    ProviderKind,
};
pub use normalizer::{normalize_reply, SchemaPolicy};
pub use orchestrator::AnalysisOrchestrator;
pub use prompts::PromptTemplate;
