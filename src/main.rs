//! Sumi-BLC main entry point
//!
//! This is the command-line interface for the Sumi-BLC broken link checker.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sumi_blc::config::{resolve_config, Config};
use sumi_blc::crawler::Coordinator;
use sumi_blc::output::{print_report, print_statistics, CrawlStatistics};
use tracing_subscriber::EnvFilter;

/// Sumi-BLC: a broken link checker
///
/// Sumi-BLC crawls a site breadth-first from a seed URL, checks every link it
/// finds, and lists the ones that do not resolve.
#[derive(Parser, Debug)]
#[command(name = "sumi-blc")]
#[command(version)]
#[command(about = "Scan a site for broken links", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to TOML configuration file (defaults to ./sumi-blc.toml)
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a site for broken links
    Scan {
        /// The URL to start crawling from
        #[arg(value_name = "SEED_URL")]
        seed_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let (config, config_hash) =
        resolve_config(cli.config.as_deref(), &cwd).context("Failed to load configuration")?;

    // The config file can raise verbosity to debug, never lower it
    let verbosity = if config.verbose {
        cli.verbose.max(1)
    } else {
        cli.verbose
    };
    setup_logging(verbosity);

    match config_hash {
        Some(hash) => tracing::info!("Configuration loaded successfully (hash: {})", hash),
        None => tracing::warn!("error reading config, using defaults"),
    }

    match cli.command {
        Commands::Scan { seed_url } => handle_scan(config, &seed_url, verbosity > 0).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("sumi_blc=warn"),
        1 => EnvFilter::new("sumi_blc=debug,warn"),
        _ => EnvFilter::new("sumi_blc=trace,info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the scan command: crawl, then report broken links
async fn handle_scan(config: Config, seed_url: &str, verbose: bool) -> Result<()> {
    tracing::info!(
        "Element table: {:?}, max concurrent checks: {}",
        config.crawler.element_table,
        config.crawler.max_concurrent_checks
    );

    let mut coordinator = Coordinator::new(config, seed_url)
        .with_context(|| format!("Cannot start crawl from '{}'", seed_url))?;

    let report = coordinator.run().await.context("Crawl failed")?;

    print_report(&report).context("Failed to write report")?;

    if verbose {
        println!();
        print_statistics(&CrawlStatistics::from_report(&report))
            .context("Failed to write statistics")?;
    }

    if report.has_broken_links() {
        tracing::info!("Found {} broken links", report.broken_links().count());
    }

    Ok(())
}
