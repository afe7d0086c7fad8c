//! Roster CLI - Terminal client for a shared task roster

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = roster_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
