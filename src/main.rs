//! sip - search in project
//!
//! Command-line usage:
//!   sip [OPTIONS] <QUERY> [ROOTS]...
//!   sip --backends          - List backends and whether they are installed

use search_in_project::cli::run_cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run_cli().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
