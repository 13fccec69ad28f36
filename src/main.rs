//! # git-fleximod CLI
//!
//! This is the binary entry point for the `git-fleximod` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the selected action through the library.
//! - Translating errors into a message on stderr and a nonzero exit status.

mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let backtrace = cli.backtrace;

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if backtrace {
                eprintln!("error: {:?}", e);
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
