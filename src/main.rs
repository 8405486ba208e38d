//! relnotes - Release-notes reports from issue-tracker CSV exports

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = relnotes::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
