//! pdf-gather main entry point
//!
//! This is the command-line interface for the pdf-gather document downloader.

use clap::Parser;
use pdf_gather::config::{load_config_with_hash, validate, Config};
use pdf_gather::crawler::Coordinator;
use pdf_gather::output::{generate_markdown_report, print_statistics};
use pdf_gather::storage::{print_verify_report, verify_directory};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// pdf-gather: Download every PDF linked from a page
///
/// pdf-gather renders a listing page in Chrome, extracts every absolute PDF
/// link from the rendered markup and downloads each document into a local
/// directory, skipping files that are already present.
#[derive(Parser, Debug)]
#[command(name = "pdf-gather")]
#[command(version = "1.0.0")]
#[command(about = "Download every PDF linked from a page", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Page to scan for PDF links, overriding the configuration
    #[arg(long, value_name = "URL")]
    page_url: Option<String>,

    /// Directory to download into, overriding the configuration
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be gathered without touching the network
    #[arg(long, conflicts_with = "verify")]
    dry_run: bool,

    /// Check the PDFs already in the output directory and exit
    #[arg(long, conflicts_with = "dry_run")]
    verify: bool,

    /// With --verify, delete files that fail the structural check
    #[arg(long, requires = "verify")]
    remove_invalid: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.verify {
        handle_verify(&config, cli.remove_invalid)?;
    } else {
        handle_gather(config).await?;
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
            0 => EnvFilter::new("pdf_gather=info,warn"),
            1 => EnvFilter::new("pdf_gather=debug,info"),
            2 => EnvFilter::new("pdf_gather=trace,debug"),
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

/// Loads the config file (or defaults), applies CLI overrides and validates
fn load_effective_config(cli: &Cli) -> pdf_gather::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(page_url) = &cli.page_url {
        config.target.page_url = page_url.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.clone();
    }

    // Overrides are validated along with the file contents
    validate(&config)?;

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== pdf-gather Dry Run ===\n");

    println!("Target:");
    println!("  Page URL: {}", config.target.page_url);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Directory mode: {:o}", config.output.dir_mode);
    match &config.output.report_path {
        Some(path) => println!("  Report: {}", path.display()),
        None => println!("  Report: (none)"),
    }

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Window: {}x{}",
        config.browser.window_width, config.browser.window_height
    );
    println!("  Settle delay: {}s", config.browser.settle_delay_secs);
    println!("  Render timeout: {}s", config.browser.render_timeout_secs);
    println!("  Request timeout: {}s", config.browser.request_timeout_secs);
    match &config.browser.chrome_executable {
        Some(path) => println!("  Chrome: {}", path.display()),
        None => println!("  Chrome: (auto-detect)"),
    }
    println!("  No sandbox: {}", config.browser.no_sandbox);

    println!("\nDownload:");
    println!("  User agent: {}", config.download.user_agent);
    println!("  Timeout: {}s", config.download.timeout_secs);
    println!(
        "  Accepted content types: {}",
        config.download.accepted_content_types.join(", ")
    );

    println!("\n✓ Configuration is valid");
    println!("✓ Would gather PDFs from {}", config.target.page_url);
}

/// Handles the --verify mode: checks documents already on disk
fn handle_verify(config: &Config, remove_invalid: bool) -> pdf_gather::Result<()> {
    println!("=== Verifying PDF Library ===\n");
    println!("Directory: {}", config.output.directory.display());
    println!();

    let report = verify_directory(&config.output.directory, remove_invalid)?;
    print_verify_report(&report);

    Ok(())
}

/// Handles the main gather operation
async fn handle_gather(config: Config) -> pdf_gather::Result<()> {
    tracing::info!(
        "Gathering PDFs from {} into {}",
        config.target.page_url,
        config.output.directory.display()
    );

    let report_path = config.output.report_path.clone();

    let coordinator = match Coordinator::with_chrome(config) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!("Failed to initialize: {}", e);
            return Err(e);
        }
    };

    let stats = coordinator.run().await;
    print_statistics(&stats);

    if let Some(path) = report_path {
        tracing::info!("Writing markdown report...");
        generate_markdown_report(&stats, &path)?;
        println!("\n✓ Report written to: {}", path.display());
    }

    Ok(())
}
