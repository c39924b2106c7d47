use claimcheck::analyzer::{normalize_reply, SchemaPolicy};
use claimcheck::error::ClaimCheckError;
use claimcheck::models::Verdict;

const CLAIM: &str = "Drinking water before meals can help with weight management";

#[test]
fn camel_case_red_flags_are_read() {
    let result = normalize_reply(
        r#"{"verdict":"Likely False","confidence":12,"explanation":"x","redFlags":["Miracle language"]}"#,
        CLAIM,
        SchemaPolicy::PassThrough,
    )
    .unwrap();

    assert_eq!(result.red_flags, vec!["Miracle language".to_string()]);
}

#[test]
fn snake_case_red_flags_are_not_the_schema() {
    let result = normalize_reply(
        r#"{"verdict":"Likely False","confidence":12,"explanation":"x","red_flags":["ignored"]}"#,
        CLAIM,
        SchemaPolicy::PassThrough,
    )
    .unwrap();

    assert!(result.red_flags.is_empty());
}

#[test]
fn unknown_verdict_label_survives_pass_through() {
    let result = normalize_reply(
        r#"{"verdict":"Partly True","confidence":55,"explanation":"x"}"#,
        CLAIM,
        SchemaPolicy::PassThrough,
    )
    .unwrap();

    assert!(!result.verdict.is_known());
    assert_eq!(result.verdict.to_string(), "Partly True");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["verdict"], "Partly True");
}

#[test]
fn hardened_policy_keeps_valid_replies_intact() {
    let raw = r#"{"verdict":"Needs More Context","confidence":40,"explanation":"Mixed evidence.","sources":["Cochrane"],"redFlags":[]}"#;

    let pass_through = normalize_reply(raw, CLAIM, SchemaPolicy::PassThrough).unwrap();
    let hardened = normalize_reply(raw, CLAIM, SchemaPolicy::Hardened).unwrap();

    assert_eq!(pass_through, hardened);
    assert_eq!(hardened.verdict, Verdict::NeedsMoreContext);
}

#[test]
fn hardened_policy_still_rejects_non_json() {
    let err = normalize_reply("I think it's true", CLAIM, SchemaPolicy::Hardened).unwrap_err();
    assert!(matches!(err, ClaimCheckError::Parse(_)));
    assert_eq!(err.kind(), "parse");
}
