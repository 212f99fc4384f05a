use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use shieldr::config::Config;
use shieldr::harness::{Harness, HarnessReport};
use shieldr::upstream::HttpUpstream;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shieldr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("shieldr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let upstream =
        Arc::new(HttpUpstream::new(&config.upstream).context("Failed to create upstream client")?);
    let harness = Harness::new(upstream, config.clone());

    match &cli.command {
        Commands::Call { strategy } => handle_call_command(&harness, strategy).await,
        Commands::Test { strategy, attempts } => {
            let attempts = attempts.unwrap_or(config.harness.attempts);
            handle_test_command(&harness, strategy, attempts).await
        }
    }
}

async fn handle_call_command(harness: &Harness, name: &str) -> Result<()> {
    info!("Calling strategy: {}", name);

    let Some(strategy) = harness.resolve(name) else {
        println!("{}", format!("Unknown strategy: {}", name).red());
        println!("Valid strategies: baseline, cache-fallback, backoff, throttle");
        return Ok(());
    };

    let result = strategy.invoke().await;
    if let Some(err) = &result.error {
        println!("{}", format!("Transport failure: {}", err).red());
    } else if result.success {
        println!("{}", result.body);
    } else {
        println!("{}", result.body.red());
    }

    Ok(())
}

async fn handle_test_command(harness: &Harness, name: &str, attempts: usize) -> Result<()> {
    info!("Testing strategy: {} with {} attempts", name, attempts);

    let report = harness.run(name, attempts).await;
    print_report(&report);

    Ok(())
}

fn print_report(report: &HarnessReport) {
    println!("Target: {}", report.target);
    println!("Number of Requests: {}", report.total);
    println!();

    for outcome in &report.results {
        let line = format!("Request {}: {}", outcome.index, outcome.body);
        if outcome.failed {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }

    println!();
    if report.failures > 0 {
        println!(
            "{}",
            format!("{} of {} requests failed", report.failures, report.total).red()
        );
    } else {
        println!("{}", format!("All {} requests succeeded", report.total).green());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
