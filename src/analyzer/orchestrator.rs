use crate::analyzer::llm_client::{create_completion_provider, CompletionProvider, LlmConfig};
use crate::analyzer::normalizer::{normalize_reply, SchemaPolicy};
use crate::analyzer::prompts::PromptTemplate;
use crate::error::{ClaimCheckError, ProviderError};
use crate::models::{AnalysisOutcome, AnalysisResult, CancellableOutcome, ClaimText};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

/// Runs the claim-analysis pipeline: prompt, one provider call, reply
/// normalization. Holds no per-request state, so one instance can serve any
/// number of concurrent `analyze` calls.
pub struct AnalysisOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    policy: SchemaPolicy,
    timeout: Duration,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            policy: SchemaPolicy::default(),
            timeout: Duration::from_secs(crate::analyzer::llm_client::DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ClaimCheckError> {
        let provider = create_completion_provider(config)?;
        Ok(Self::new(provider).with_timeout(config.timeout()))
    }

    pub fn with_policy(mut self, policy: SchemaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn policy(&self) -> SchemaPolicy {
        self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Analyzes one claim. Never fails: every error becomes the canonical
    /// `Analysis Error` fallback for `claim`.
    ///
    /// Callers should not submit blank claims; if they do, no request is
    /// sent and the fallback is returned.
    pub async fn analyze(&self, claim: &str) -> AnalysisOutcome {
        match self.try_analyze(claim).await {
            Ok(result) => AnalysisOutcome::Success(result),
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider.provider_name(),
                    model = %self.provider.model_name(),
                    failure_kind = e.kind(),
                    error = %e,
                    "Claim analysis failed, returning fallback result"
                );
                AnalysisOutcome::failure(claim)
            }
        }
    }

    /// Like `analyze`, but resolves to `Aborted` if `token` is cancelled
    /// before the analysis finishes.
    pub async fn analyze_with_cancellation(
        &self,
        claim: &str,
        token: &CancellationToken,
    ) -> CancellableOutcome {
        if token.is_cancelled() {
            return CancellableOutcome::Aborted;
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::info!(
                    provider = %self.provider.provider_name(),
                    "Claim analysis aborted by caller"
                );
                CancellableOutcome::Aborted
            }
            outcome = self.analyze(claim) => CancellableOutcome::Finished(outcome),
        }
    }

    /// Analyzes independent claims, at most `max_concurrent` at a time.
    /// Outcomes are returned in input order.
    pub async fn analyze_batch(&self, claims: &[String], max_concurrent: usize) -> Vec<AnalysisOutcome> {
        let mut outcomes = Vec::with_capacity(claims.len());

        for chunk in claims.chunks(max_concurrent.max(1)) {
            let batch = join_all(chunk.iter().map(|claim| self.analyze(claim))).await;
            outcomes.extend(batch);
        }

        outcomes
    }

    async fn try_analyze(&self, claim: &str) -> Result<AnalysisResult, ClaimCheckError> {
        let claim_text = ClaimText::parse(claim)?;
        let request = PromptTemplate::build_claim_prompt(&claim_text);

        tracing::debug!(
            provider = %self.provider.provider_name(),
            model = %self.provider.model_name(),
            prompt_length = request.prompt_size(),
            "Sending claim to completion provider"
        );

        let start_time = Instant::now();
        let reply = timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| ProviderError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        tracing::info!(
            provider = %self.provider.provider_name(),
            model = %self.provider.model_name(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            reply_length = reply.len(),
            "Completion provider replied"
        );
        tracing::debug!(raw_reply = %reply, "Raw model reply");

        normalize_reply(&reply, claim, self.policy)
    }

    pub fn get_model_info(&self) -> String {
        format!(
            "Provider: {}, Model: {}, Timeout: {}s, Schema: {}",
            self.provider.provider_name(),
            self.provider.model_name(),
            self.timeout.as_secs(),
            self.policy.as_str()
        )
    }
}
