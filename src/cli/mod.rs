//! Command-line interface for stylepack.
//!
//! The CLI is a thin collaborator around the library pipeline: it parses
//! arguments, initializes logging, runs package discovery and bundling, and
//! writes the results. All interesting behavior lives in the library modules;
//! each subcommand is its own module with its own argument structure and
//! execution logic.
//!
//! # Available Commands
//!
//! - `build` - Discover installed packages, bundle their CSS in dependency
//!   order, and copy their static assets
//!
//! # Examples
//!
//! ```bash
//! # Bundle everything under ./packages into bundle.css
//! stylepack build --packages packages --out bundle.css
//!
//! # Restrict to a whitelist, cache fragment resolution, use asset-url()
//! stylepack build --packages packages --out bundle.css \
//!     --whitelist delorean,focus,brakes,drums,calipers,mr-fusion \
//!     --cached --url-style helper
//! ```

mod build;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use build::BuildCommand;

/// Top-level CLI parser.
#[derive(Parser, Debug)]
#[command(name = "stylepack", version, about = "Dependency-ordered CSS bundler")]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Bundle package CSS and copy assets
    Build(BuildCommand),
}

impl Cli {
    /// Initialize logging and dispatch to the selected command.
    pub fn execute(self) -> Result<()> {
        self.init_logging();
        match self.command {
            Commands::Build(cmd) => cmd.execute(),
        }
    }

    /// Set up the tracing subscriber from the verbosity flags, falling back
    /// to `RUST_LOG` when neither is given.
    fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::from_default_env()
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
