//! Bargains Application CLI

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;
mod config;
mod observability;

#[tokio::main]
pub async fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging is not initialised, so stderr is the only channel"
        )]
        {
            eprintln!("failed to initialise logging: {error}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");

            ExitCode::FAILURE
        }
    }
}
