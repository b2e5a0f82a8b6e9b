//! Listing-Harvester main entry point
//!
//! This is the command-line interface for the Listing-Harvester category crawler.

use anyhow::Context;
use clap::Parser;
use listing_harvester::config::{load_config_with_hash, Config};
use listing_harvester::crawler::{harvest, HarvestReport};
use listing_harvester::output::{open_sink, print_statistics, HarvestStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Listing-Harvester: an authenticated product listing crawler
///
/// Listing-Harvester signs in to a storefront, walks the paginated listing
/// of every configured category, keeps the products that pass the discount
/// policy and writes them to a CSV file or an SQLite database.
#[derive(Parser, Debug)]
#[command(name = "listing-harvester")]
#[command(version = "1.0.0")]
#[command(about = "An authenticated product listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Write records here instead of the configured output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.path));

    if cli.dry_run {
        handle_dry_run(&config, &output_path);
        return Ok(());
    }

    let report = handle_harvest(&config).await?;
    write_output(&config, &report, &output_path)?;

    if !cli.quiet {
        print_statistics(&HarvestStatistics::from_report(&report));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvester=info,warn"),
            1 => EnvFilter::new("listing_harvester=debug,info"),
            2 => EnvFilter::new("listing_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, output_path: &Path) {
    println!("=== Listing-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max products per category: {}",
        config.crawler.max_products_per_category
    );
    println!("  Discount threshold: {}%", config.crawler.discount_threshold);
    println!("  Wait timeout: {}ms", config.crawler.wait_timeout_ms);
    println!(
        "  Settle delays: {}ms (page), {}ms (next)",
        config.crawler.page_settle_ms, config.crawler.next_settle_ms
    );

    println!("\nSession:");
    println!("  Base URL: {}", config.session.base_url);
    match &config.session.cookies_file {
        Some(path) => println!("  Cookies file: {}", path),
        None => println!("  Cookies file: (none)"),
    }
    match &config.session.username {
        Some(username) => println!(
            "  Login fallback: {} (password from ${})",
            username, config.session.password_env
        ),
        None => println!("  Login fallback: (none)"),
    }

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Path: {}", output_path.display());

    println!("\nCategories ({}):", config.categories.len());
    for entry in &config.categories {
        println!("  - {}", entry.url);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would harvest up to {} products from {} categories",
        config.max_total_products(),
        config.categories.len()
    );
}

/// Runs the harvest; session failures end the run before any output
async fn handle_harvest(config: &Config) -> anyhow::Result<HarvestReport> {
    tracing::info!(
        "Harvesting {} categories (cap {} per category, threshold {}%)",
        config.categories.len(),
        config.crawler.max_products_per_category,
        config.crawler.discount_threshold
    );

    match harvest(config).await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

fn write_output(config: &Config, report: &HarvestReport, output_path: &Path) -> anyhow::Result<()> {
    let mut sink = open_sink(output_path, config.output.format)
        .with_context(|| format!("failed to open output {}", output_path.display()))?;

    sink.write(&report.records)
        .with_context(|| format!("failed to write records to {}", sink.destination()))?;

    tracing::info!(
        "Saved {} records to {}",
        report.records.len(),
        sink.destination()
    );
    Ok(())
}
