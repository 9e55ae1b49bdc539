//! smctl - Service Manager command line client

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = smctl::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
