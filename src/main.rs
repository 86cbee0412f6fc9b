//! HackMatch - find teammates for your next hackathon.

use clap::Parser;
use std::process::ExitCode;

use hackmatch::{logging, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Keep the guard alive so file logs are flushed on exit.
    let _guard = match logging::init() {
        Ok((guard, _)) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args = Commands::parse();

    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
