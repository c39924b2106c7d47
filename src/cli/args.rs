use crate::analyzer::llm_client::{
    LlmConfig, ENV_ENDPOINT, ENV_MODEL, ENV_PROVIDER, ENV_TIMEOUT, MAX_TIMEOUT_SECONDS,
    MIN_TIMEOUT_SECONDS,
};
use crate::analyzer::SchemaPolicy;
use crate::error::ClaimCheckError;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "claimcheck")]
#[command(about = "Evaluate health claims with a hosted LLM")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Completion provider (gemini, openai). Overrides CLAIMCHECK_PROVIDER
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Full endpoint URL. Overrides CLAIMCHECK_ENDPOINT
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Model id for chat-completion providers. Overrides CLAIMCHECK_MODEL
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Maximum time for one analysis in seconds (5-300)
    #[arg(short = 't', long, value_parser = validate_timeout)]
    pub timeout: Option<u64>,

    /// Clamp confidence, map unknown verdicts and reject empty explanations
    #[arg(long)]
    pub strict: bool,

    /// Print results as JSON instead of a formatted report
    #[arg(long)]
    pub json: bool,

    /// Read one claim per stdin line and analyze them concurrently
    #[arg(long, conflicts_with = "claim")]
    pub batch: bool,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug output including raw model replies
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Claim to analyze. Read from stdin when omitted
    pub claim: Vec<String>,
}

impl Cli {
    /// The claim given on the command line, words joined with spaces.
    pub fn claim_from_args(&self) -> Option<String> {
        if self.claim.is_empty() {
            None
        } else {
            Some(self.claim.join(" "))
        }
    }

    /// Loads the provider configuration, letting flags take precedence over
    /// variables returned by `lookup`.
    pub fn build_config<F>(&self, lookup: F) -> Result<LlmConfig, ClaimCheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        LlmConfig::from_lookup(|name| {
            let flag = match name {
                ENV_PROVIDER => self.provider.clone(),
                ENV_ENDPOINT => self.endpoint.clone(),
                ENV_MODEL => self.model.clone(),
                ENV_TIMEOUT => self.timeout.map(|timeout| timeout.to_string()),
                _ => None,
            };
            flag.or_else(|| lookup(name))
        })
    }

    pub fn schema_policy(&self) -> SchemaPolicy {
        if self.strict {
            SchemaPolicy::Hardened
        } else {
            SchemaPolicy::PassThrough
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Log level for this crate when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    pub fn should_use_color(&self) -> bool {
        // Disable color if NO_COLOR environment variable is set
        std::env::var_os("NO_COLOR").is_none()
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&timeout) {
        Ok(timeout)
    } else {
        Err(format!(
            "Timeout must be between {} and {} seconds",
            MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS
        ))
    }
}
