use claimcheck::analyzer::{AnalysisOrchestrator, ApiKey, LlmConfig, ProviderKind};
use claimcheck::models::{
    AnalysisOutcome, AnalysisResult, CancellableOutcome, Verdict, FALLBACK_EXPLANATION,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const GEMINI_PATH: &str = "/v1beta/models/gemini-pro:generateContent";
const MIRACLE_CLAIM: &str = "Miracle supplement loses 10 pounds in 3 days";

fn orchestrator_for(base_url: &str) -> AnalysisOrchestrator {
    let config = LlmConfig::new(ProviderKind::GenerativeText, ApiKey::new("test-key"))
        .with_endpoint(format!("{}{}", base_url, GEMINI_PATH))
        .without_system_proxy();
    AnalysisOrchestrator::from_config(&config).unwrap()
}

/// Accepts connections and never answers them.
async fn unresponsive_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    format!("http://{}", addr)
}

fn assert_canonical_failure(outcome: &AnalysisOutcome, claim: &str) {
    assert!(outcome.is_failure(), "outcome: {:?}", outcome);
    let result = outcome.result();
    assert_eq!(result.claim, claim);
    assert_eq!(result.verdict, Verdict::AnalysisError);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.explanation, FALLBACK_EXPLANATION);
    assert!(result.sources.is_empty());
    assert_eq!(result.red_flags, vec!["API Error".to_string()]);
}

#[tokio::test]
async fn test_network_error_yields_exact_fallback() {
    // Nothing listens on the discard port
    let outcome = orchestrator_for("http://127.0.0.1:9").analyze(MIRACLE_CLAIM).await;

    assert_canonical_failure(&outcome, MIRACLE_CLAIM);
    assert_eq!(outcome.into_result(), AnalysisResult::analysis_error(MIRACLE_CLAIM));
}

#[tokio::test]
async fn test_non_success_status_yields_fallback() {
    let mut server = Server::new_async().await;
    for status in [400, 429, 500, 503] {
        let mock = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(json!({ "error": { "code": status } }).to_string())
            .create_async()
            .await;

        let outcome = orchestrator_for(&server.url()).analyze(MIRACLE_CLAIM).await;
        assert_canonical_failure(&outcome, MIRACLE_CLAIM);

        mock.remove_async().await;
    }
}

#[tokio::test]
async fn test_unparseable_reply_yields_fallback() {
    let mut server = Server::new_async().await;
    let replies = [
        "not json",
        "[]",
        r#"{"verdict":"Likely False"}"#,
        r#"{"verdict":"Likely False","confidence":"high","explanation":"x"}"#,
    ];

    for reply in replies {
        let mock = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "candidates": [{ "content": { "parts": [{ "text": reply }] } }] }).to_string())
            .create_async()
            .await;

        let outcome = orchestrator_for(&server.url()).analyze("Claim").await;
        assert_canonical_failure(&outcome, "Claim");

        mock.remove_async().await;
    }
}

#[tokio::test]
async fn test_missing_reply_text_yields_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
        .create_async()
        .await;

    let outcome = orchestrator_for(&server.url()).analyze(MIRACLE_CLAIM).await;
    assert_canonical_failure(&outcome, MIRACLE_CLAIM);
}

#[tokio::test]
async fn test_hung_provider_times_out_into_fallback() {
    let endpoint = unresponsive_endpoint().await;
    let orchestrator = orchestrator_for(&endpoint).with_timeout(Duration::from_millis(200));

    let outcome = tokio::time::timeout(Duration::from_secs(5), orchestrator.analyze(MIRACLE_CLAIM))
        .await
        .expect("analysis should resolve at its own deadline");

    assert_canonical_failure(&outcome, MIRACLE_CLAIM);
}

#[tokio::test]
async fn test_cancellation_yields_aborted_not_failure() {
    let endpoint = unresponsive_endpoint().await;
    let orchestrator = orchestrator_for(&endpoint);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let outcome = orchestrator.analyze_with_cancellation(MIRACLE_CLAIM, &token).await;

    assert_eq!(outcome, CancellableOutcome::Aborted);
    assert!(outcome.finished().is_none());
}

#[tokio::test]
async fn test_already_cancelled_token_skips_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let outcome = orchestrator_for(&server.url())
        .analyze_with_cancellation(MIRACLE_CLAIM, &token)
        .await;

    assert!(outcome.is_aborted());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failures_in_a_batch_stay_in_place() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("good claim".to_string()))
        .with_status(200)
        .with_body(
            json!({ "candidates": [{ "content": { "parts": [{
                "text": r#"{"verdict":"Likely Accurate","confidence":90,"explanation":"ok"}"#
            }] } }] })
            .to_string(),
        )
        .create_async()
        .await;
    let _bad = server
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("bad claim".to_string()))
        .with_status(500)
        .create_async()
        .await;

    let claims = vec![
        "good claim one".to_string(),
        "bad claim".to_string(),
        "good claim two".to_string(),
    ];
    let outcomes = orchestrator_for(&server.url()).analyze_batch(&claims, 3).await;

    assert!(outcomes[0].is_success());
    assert_canonical_failure(&outcomes[1], "bad claim");
    assert!(outcomes[2].is_success());
}
