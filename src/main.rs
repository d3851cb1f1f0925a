use colored::*;
use sysroot_matrix::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments and process the command
    match cli::run().await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            cli::exit_code_for_error(&e)
        }
    }
}
