//! doc-hunt - Keep documentation in sync with source files

use std::process::ExitCode;

fn main() -> ExitCode {
    match doc_hunt::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
