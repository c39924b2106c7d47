use clap::Parser;
use claimcheck::{
    cli::{Cli, CliHandler, ReportFormatter},
    error::ClaimCheckError,
};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Usage errors exit with code 2, --help and --version with 0
    let cli = Cli::parse();

    init_tracing(&cli);

    let formatter = ReportFormatter::for_cli(&cli);
    let handler = CliHandler::new(cli);

    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e));
            match e {
                ClaimCheckError::EmptyClaim | ClaimCheckError::InvalidArguments(_) => 2,
                ClaimCheckError::Config(_) => 5,
                _ => 1,
            }
        }
    };

    process::exit(exit_code);
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,claimcheck={}", cli.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
