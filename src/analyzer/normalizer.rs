use crate::error::ClaimCheckError;
use crate::models::{AnalysisResult, Verdict};
use serde::Deserialize;
use serde_json::{Number, Value};

/// How much the normalizer trusts the model's adherence to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaPolicy {
    /// Copy verdict, confidence and explanation through unchanged.
    #[default]
    PassThrough,
    /// Unwrap code fences, clamp confidence, map unknown verdicts, drop blank
    /// list entries and reject an empty explanation.
    Hardened,
}

impl SchemaPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaPolicy::PassThrough => "pass-through",
            SchemaPolicy::Hardened => "hardened",
        }
    }
}

/// The reply schema requested by the prompt. Unknown keys, including any
/// `claim` the model echoes back, are ignored.
#[derive(Debug, Deserialize)]
struct ModelReply {
    verdict: String,
    confidence: Number,
    explanation: String,
    #[serde(default)]
    sources: Option<Vec<String>>,
    #[serde(default, rename = "redFlags")]
    red_flags: Option<Vec<String>>,
}

/// Turns the model's raw reply text into a schema-complete result for `claim`.
pub fn normalize_reply(
    raw: &str,
    claim: &str,
    policy: SchemaPolicy,
) -> Result<AnalysisResult, ClaimCheckError> {
    let text = match policy {
        SchemaPolicy::PassThrough => raw,
        SchemaPolicy::Hardened => strip_code_fence(raw),
    };

    let value: Value = serde_json::from_str(text)
        .map_err(|e| ClaimCheckError::Parse(format!("reply is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ClaimCheckError::Parse(format!(
            "reply is a JSON {} rather than an object",
            json_type(&value)
        )));
    }

    let reply: ModelReply = serde_json::from_value(value).map_err(|e| {
        ClaimCheckError::Parse(format!("reply does not match the result schema: {}", e))
    })?;

    let confidence = confidence_value(&reply.confidence)?;

    let mut result = AnalysisResult::new(claim, Verdict::from(reply.verdict))
        .with_confidence(confidence)
        .with_explanation(reply.explanation)
        .with_sources(reply.sources.unwrap_or_default())
        .with_red_flags(reply.red_flags.unwrap_or_default());

    if policy == SchemaPolicy::Hardened {
        harden(&mut result)?;
    }

    Ok(result)
}

fn confidence_value(number: &Number) -> Result<i64, ClaimCheckError> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(value) if value.is_finite() => Ok(value.round() as i64),
        _ => Err(ClaimCheckError::Parse(format!(
            "confidence {} is not a usable number",
            number
        ))),
    }
}

fn harden(result: &mut AnalysisResult) -> Result<(), ClaimCheckError> {
    if let Verdict::Other(label) = &result.verdict {
        result.verdict = Verdict::match_known(label).unwrap_or(Verdict::NeedsMoreContext);
    }

    result.confidence = result.confidence.clamp(0, 100);

    let explanation = result.explanation.trim();
    if explanation.is_empty() {
        return Err(ClaimCheckError::Parse("explanation is empty".to_string()));
    }
    result.explanation = explanation.to_string();

    result.sources = clean_entries(std::mem::take(&mut result.sources));
    result.red_flags = clean_entries(std::mem::take(&mut result.red_flags));

    Ok(())
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Unwraps a reply of the form ```` ```json\n{...}\n``` ````.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };

    match inner.find('\n') {
        Some(idx) => inner[idx + 1..].trim(),
        None => inner.trim(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
