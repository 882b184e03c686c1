//! stylepack CLI entry point.
//!
//! Handles argument parsing, error display, and process exit codes. All
//! bundling logic lives in the library crate.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use stylepack::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
