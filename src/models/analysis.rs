use serde::{Deserialize, Serialize};
use std::fmt;

/// Explanation attached to every fallback result.
pub const FALLBACK_EXPLANATION: &str =
    "Unable to analyze this claim at the moment. Please try again later.";

/// Red flag attached to every fallback result.
pub const FALLBACK_RED_FLAG: &str = "API Error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Fully rendered instruction text with the claim in its slot.
    pub instruction_prompt: String,
    pub claim: String,
}

impl AnalysisRequest {
    pub fn prompt(&self) -> &str {
        &self.instruction_prompt
    }

    pub fn prompt_size(&self) -> usize {
        self.instruction_prompt.len()
    }
}

/// Accuracy label. The model's field is an open string, so unknown labels
/// are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    LikelyAccurate,
    LikelyFalse,
    NeedsMoreContext,
    AnalysisError,
    Other(String),
}

impl Verdict {
    pub const KNOWN: [Verdict; 4] = [
        Verdict::LikelyAccurate,
        Verdict::LikelyFalse,
        Verdict::NeedsMoreContext,
        Verdict::AnalysisError,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Verdict::LikelyAccurate => "Likely Accurate",
            Verdict::LikelyFalse => "Likely False",
            Verdict::NeedsMoreContext => "Needs More Context",
            Verdict::AnalysisError => "Analysis Error",
            Verdict::Other(label) => label,
        }
    }

    /// Exact-label lookup; anything else becomes `Other`.
    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.as_str() == label)
            .cloned()
            .unwrap_or_else(|| Verdict::Other(label.to_string()))
    }

    /// Case- and whitespace-insensitive lookup of the known labels.
    pub fn match_known(label: &str) -> Option<Self> {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(&normalized))
            .cloned()
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Verdict::Other(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Verdict::AnalysisError)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        match Verdict::from_label(&label) {
            Verdict::Other(_) => Verdict::Other(label),
            known => known,
        }
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub claim: String,
    pub verdict: Verdict,
    pub confidence: i64,
    pub explanation: String,
    pub sources: Vec<String>,
    pub red_flags: Vec<String>,
}

impl AnalysisResult {
    pub fn new<S: Into<String>>(claim: S, verdict: Verdict) -> Self {
        Self {
            claim: claim.into(),
            verdict,
            confidence: 0,
            explanation: String::new(),
            sources: Vec::new(),
            red_flags: Vec::new(),
        }
    }

    /// The canonical result substituted for any failed analysis.
    pub fn analysis_error<S: Into<String>>(claim: S) -> Self {
        Self::new(claim, Verdict::AnalysisError)
            .with_explanation(FALLBACK_EXPLANATION)
            .with_red_flags(vec![FALLBACK_RED_FLAG.to_string()])
    }

    pub fn with_confidence(mut self, confidence: i64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_explanation<S: Into<String>>(mut self, explanation: S) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_red_flags(mut self, red_flags: Vec<String>) -> Self {
        self.red_flags = red_flags;
        self
    }

    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    /// Always the `AnalysisResult::analysis_error` shape.
    Failure(AnalysisResult),
}

impl AnalysisOutcome {
    pub fn failure<S: Into<String>>(claim: S) -> Self {
        AnalysisOutcome::Failure(AnalysisResult::analysis_error(claim))
    }

    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::Success(result) | AnalysisOutcome::Failure(result) => result,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Success(result) | AnalysisOutcome::Failure(result) => result,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisOutcome::Failure(_))
    }
}

/// Result of an analysis that may be cancelled while the provider call is in
/// flight. `Aborted` is neither a success nor a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellableOutcome {
    Finished(AnalysisOutcome),
    Aborted,
}

impl CancellableOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, CancellableOutcome::Aborted)
    }

    pub fn finished(self) -> Option<AnalysisOutcome> {
        match self {
            CancellableOutcome::Finished(outcome) => Some(outcome),
            CancellableOutcome::Aborted => None,
        }
    }
}
