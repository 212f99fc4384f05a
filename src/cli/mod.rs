//! CLI module for shieldr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for invoking a single
//! strategy and for running the concurrent test harness.

pub mod commands;

pub use commands::Cli;
