pub mod analysis;
pub mod claim;

pub use analysis::{
    AnalysisOutcome, AnalysisRequest, AnalysisResult, CancellableOutcome, Verdict,
    FALLBACK_EXPLANATION, FALLBACK_RED_FLAG,
};
pub use claim::ClaimText;
