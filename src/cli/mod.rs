pub mod args;
pub mod reporter;

pub use args::Cli;
pub use reporter::ReportFormatter;

use crate::analyzer::AnalysisOrchestrator;
use crate::error::ClaimCheckError;
use crate::models::{AnalysisOutcome, CancellableOutcome};
use std::io::{self, Read};
use tokio_util::sync::CancellationToken;

/// Claims analyzed at the same time in batch mode.
pub const MAX_CONCURRENT_CLAIMS: usize = 4;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ANALYSIS_FAILED: i32 = 3;
pub const EXIT_ABORTED: i32 = 130;

pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(&self) -> Result<i32, ClaimCheckError> {
        let claims = match self.cli.claim_from_args() {
            Some(claim) => self.collect_claims(&claim)?,
            None => self.collect_claims(&self.read_stdin()?)?,
        };

        let config = self.cli.build_config(|name| std::env::var(name).ok())?;
        let orchestrator =
            AnalysisOrchestrator::from_config(&config)?.with_policy(self.cli.schema_policy());

        tracing::info!(
            claims = claims.len(),
            info = %orchestrator.get_model_info(),
            "Starting claim analysis"
        );

        let token = CancellationToken::new();
        let interrupt = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.cancel();
            }
        });

        let outcomes = if self.cli.batch {
            tokio::select! {
                outcomes = orchestrator.analyze_batch(&claims, MAX_CONCURRENT_CLAIMS) => Some(outcomes),
                _ = token.cancelled() => None,
            }
        } else {
            match orchestrator.analyze_with_cancellation(&claims[0], &token).await {
                CancellableOutcome::Finished(outcome) => Some(vec![outcome]),
                CancellableOutcome::Aborted => None,
            }
        };

        let Some(outcomes) = outcomes else {
            eprintln!("Analysis aborted");
            return Ok(EXIT_ABORTED);
        };

        println!("{}", self.render(&outcomes)?);

        Ok(exit_code_for(&outcomes))
    }

    /// Splits input into claims: one per non-blank line in batch mode, the
    /// whole text otherwise.
    pub fn collect_claims(&self, input: &str) -> Result<Vec<String>, ClaimCheckError> {
        let claims: Vec<String> = if self.cli.batch {
            input
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else if input.trim().is_empty() {
            Vec::new()
        } else {
            vec![input.trim().to_string()]
        };

        if claims.is_empty() {
            return Err(ClaimCheckError::EmptyClaim);
        }

        if self.cli.is_verbose() {
            eprintln!("📥 Read {} claim(s)", claims.len());
        }

        Ok(claims)
    }

    pub fn render(&self, outcomes: &[AnalysisOutcome]) -> Result<String, ClaimCheckError> {
        let formatter = ReportFormatter::for_cli(&self.cli);

        match (self.cli.json, self.cli.batch) {
            (true, true) => formatter.format_json_batch(outcomes),
            (true, false) => outcomes
                .iter()
                .map(|outcome| formatter.format_json(outcome.result()))
                .collect::<Result<Vec<_>, _>>()
                .map(|rendered| rendered.join("\n")),
            (false, true) => Ok(outcomes
                .iter()
                .map(|outcome| formatter.format_compact_summary(outcome))
                .collect::<Vec<_>>()
                .join("\n")),
            (false, false) => Ok(outcomes
                .iter()
                .map(|outcome| formatter.format_outcome(outcome))
                .collect::<Vec<_>>()
                .join("\n\n")),
        }
    }

    fn read_stdin(&self) -> Result<String, ClaimCheckError> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

pub fn exit_code_for(outcomes: &[AnalysisOutcome]) -> i32 {
    if outcomes.iter().any(AnalysisOutcome::is_failure) {
        EXIT_ANALYSIS_FAILED
    } else {
        EXIT_SUCCESS
    }
}
