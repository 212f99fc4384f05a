//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - call: invoke one strategy once and print the response
//! - test: fire concurrent requests through a strategy and print the report

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shieldr - strategies for shielding clients from upstream concurrency limits
#[derive(Parser, Debug)]
#[command(name = "shieldr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invoke one strategy once and print the response body
    Call {
        /// Strategy to invoke (baseline, cache-fallback, backoff, throttle)
        strategy: String,
    },

    /// Run concurrent requests through a strategy and report outcomes
    Test {
        /// Strategy to exercise; unrecognized names hit the upstream directly
        strategy: String,

        /// Number of concurrent requests to fire
        #[arg(short, long)]
        attempts: Option<usize>,
    },
}
