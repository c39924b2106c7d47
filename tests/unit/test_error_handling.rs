use claimcheck::analyzer::{create_completion_provider, ApiKey, LlmConfig, ProviderKind};
use claimcheck::error::{ClaimCheckError, ProviderError};
use claimcheck::models::{AnalysisOutcome, AnalysisResult, ClaimText};

#[test]
fn empty_claim_is_a_validation_error() {
    let err = ClaimText::parse(" \n ").unwrap_err();
    assert!(matches!(err, ClaimCheckError::EmptyClaim));
    assert_eq!(err.kind(), "validation");
}

#[test]
fn provider_creation_fails_for_invalid_config() {
    let config = LlmConfig::new(ProviderKind::ChatCompletion, ApiKey::new("k")).with_model(" ");
    assert!(matches!(create_completion_provider(&config), Err(ClaimCheckError::Config(_))));

    let config = LlmConfig::new(ProviderKind::GenerativeText, ApiKey::new("k")).with_timeout(600);
    assert!(matches!(create_completion_provider(&config), Err(ClaimCheckError::Config(_))));

    let config = LlmConfig::new(ProviderKind::GenerativeText, ApiKey::new("")).with_endpoint("");
    assert!(matches!(create_completion_provider(&config), Err(ClaimCheckError::Config(_))));
}

#[test]
fn unknown_provider_name_is_a_config_error() {
    let err = "anthropic".parse::<ProviderKind>().unwrap_err();
    assert_eq!(err.kind(), "config");
}

#[test]
fn provider_errors_keep_their_detail_in_messages() {
    let err: ClaimCheckError = ProviderError::Status {
        status: 429,
        body: "quota exceeded".to_string(),
    }
    .into();

    assert_eq!(err.kind(), "provider");
    assert!(err.to_string().contains("429"));
    assert!(err.to_string().contains("quota exceeded"));

    let err = ProviderError::Timeout { timeout_ms: 30_000 };
    assert!(err.to_string().contains("30000 ms"));
}

#[test]
fn every_failure_collapses_to_one_fallback() {
    let outcome = AnalysisOutcome::failure("Detox tea burns fat");

    assert!(outcome.is_failure());
    assert_eq!(outcome.result(), &AnalysisResult::analysis_error("Detox tea burns fat"));
    assert!(outcome.result().verdict.is_error());
}
