use crate::cli::args::Cli;
use crate::error::ClaimCheckError;
use crate::models::{AnalysisOutcome, AnalysisResult, Verdict};

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(use_colors: bool, verbose: bool) -> Self {
        Self { use_colors, verbose }
    }

    pub fn for_cli(cli: &Cli) -> Self {
        Self::new(cli.should_use_color(), cli.is_verbose())
    }

    pub fn format_outcome(&self, outcome: &AnalysisOutcome) -> String {
        let result = outcome.result();
        let mut output = String::new();

        output.push_str(&self.format_header(result));
        output.push_str("\n\n");

        output.push_str(&self.format_verdict(&result.verdict));
        output.push('\n');
        output.push_str(&format!("Confidence: {}%", result.confidence));
        output.push_str("\n\n");

        if !result.explanation.is_empty() {
            output.push_str(&self.format_section("Explanation", &result.explanation));
            output.push_str("\n\n");
        }

        if !result.sources.is_empty() {
            output.push_str(&self.format_section("Sources", &numbered(&result.sources)));
            output.push_str("\n\n");
        }

        if result.has_red_flags() {
            let flags = result
                .red_flags
                .iter()
                .map(|flag| format!("- {}", flag))
                .collect::<Vec<_>>()
                .join("\n");
            output.push_str(&self.format_section("Red Flags", &flags));
            output.push_str("\n\n");
        }

        if self.verbose {
            let status = if outcome.is_success() { "success" } else { "failure" };
            output.push_str(&format!("Outcome: {}\n", status));
        }

        output.trim_end().to_string()
    }

    fn format_header(&self, result: &AnalysisResult) -> String {
        if self.use_colors {
            format!(
                "\x1b[1m\x1b[36m═══ HEALTH CLAIM ANALYSIS ═══\x1b[0m\nClaim: \"{}\"",
                result.claim
            )
        } else {
            format!("=== HEALTH CLAIM ANALYSIS ===\nClaim: \"{}\"", result.claim)
        }
    }

    fn format_verdict(&self, verdict: &Verdict) -> String {
        let (color_code, emoji) = if self.use_colors {
            match verdict {
                Verdict::LikelyAccurate => ("\x1b[1m\x1b[32m", "✅ "),   // Bold green
                Verdict::LikelyFalse => ("\x1b[1m\x1b[31m", "❌ "),      // Bold red
                Verdict::NeedsMoreContext => ("\x1b[1m\x1b[33m", "🔍 "), // Bold yellow
                Verdict::AnalysisError | Verdict::Other(_) => ("\x1b[1m\x1b[35m", "⚠️ "), // Bold magenta
            }
        } else {
            ("", "")
        };

        let reset = if self.use_colors { "\x1b[0m" } else { "" };

        format!("{}{}Verdict: {}{}", color_code, emoji, verdict, reset)
    }

    fn format_section(&self, title: &str, content: &str) -> String {
        if self.use_colors {
            format!("\x1b[1m\x1b[37m{}\x1b[0m\n{}", title, content)
        } else {
            format!("{}\n{}\n{}", title, "─".repeat(title.chars().count()), content)
        }
    }

    /// One line per claim, used in batch mode.
    pub fn format_compact_summary(&self, outcome: &AnalysisOutcome) -> String {
        let result = outcome.result();
        format!(
            "{} ({}%) | {}",
            self.format_verdict(&result.verdict),
            result.confidence,
            result.claim
        )
    }

    pub fn format_json(&self, result: &AnalysisResult) -> Result<String, ClaimCheckError> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    pub fn format_json_batch(&self, outcomes: &[AnalysisOutcome]) -> Result<String, ClaimCheckError> {
        let results: Vec<&AnalysisResult> = outcomes.iter().map(AnalysisOutcome::result).collect();
        Ok(serde_json::to_string_pretty(&results)?)
    }

    pub fn format_error(&self, error: &ClaimCheckError) -> String {
        let (color_code, reset) = if self.use_colors {
            ("\x1b[1m\x1b[31m", "\x1b[0m")
        } else {
            ("", "")
        };

        format!("{}🚨 CLAIMCHECK ERROR{}\n\n{}", color_code, reset, error)
    }
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
