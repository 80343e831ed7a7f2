//! Site-Prospector main entry point
//!
//! This is the command-line interface for the Site-Prospector contact harvester.

use anyhow::Context;
use clap::Parser;
use site_prospector::config::{load_config_with_hash, Config};
use site_prospector::crawler::Coordinator;
use site_prospector::extract::Pipeline;
use site_prospector::input::InputDataset;
use site_prospector::output::{print_report, print_status, CheckpointStatus};
use site_prospector::storage::open_store;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Prospector: a resumable website contact harvester
///
/// Site-Prospector visits the website of every row of a CSV file, extracts
/// emails, phone numbers, social links and business signals from the landing
/// page, and appends one output row per website. Progress is checkpointed so
/// each invocation continues where the previous one stopped.
#[derive(Parser, Debug)]
#[command(name = "site-prospector")]
#[command(version)]
#[command(about = "A resumable website contact harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Maximum number of rows to process in this session (overrides the config)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start over: discard the checkpoint and truncate the output file
    #[arg(long, conflicts_with_all = ["dry_run", "status"])]
    fresh: bool,

    /// Validate config and input, show what would be processed, and exit
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// Show checkpoint progress and exit
    #[arg(long, conflicts_with = "dry_run")]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.status {
        handle_status(&config)
    } else if cli.dry_run {
        handle_dry_run(&config)
    } else {
        let limit = cli.limit.map(|limit| limit as usize);
        handle_crawl(config, config_hash, limit, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_prospector=info,warn"),
            1 => EnvFilter::new("site_prospector=debug,info"),
            2 => EnvFilter::new("site_prospector=trace,debug"),
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

/// Handles the --status mode: shows checkpoint progress
fn handle_status(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.output.checkpoint_path());
    println!("Checkpoint: {}\n", store.path().display());

    let state = store
        .peek()
        .with_context(|| format!("cannot read checkpoint {}", store.path().display()))?;

    // Row count comes from the input the checkpoint was created with
    let input = state
        .as_ref()
        .map(|s| &s.settings.input)
        .unwrap_or(&config.input);
    let dataset = InputDataset::open(input, false)
        .with_context(|| format!("cannot read input {}", input.path))?;

    print_status(&CheckpointStatus::new(state.as_ref(), dataset.len()));
    Ok(())
}

/// Handles the --dry-run mode: validates everything and shows the plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Site-Prospector Dry Run ===\n");

    let dataset = InputDataset::open(&config.input, config.dedup.seeds_from_input())
        .with_context(|| format!("cannot read input {}", config.input.path))?;
    let pipeline = Pipeline::standard()?;
    let state = open_store(&config.output.checkpoint_path()).peek().ok().flatten();

    println!("Input:");
    println!("  File: {}", dataset.path().display());
    println!("  Rows: {}", dataset.len());
    println!("  Columns: {}", dataset.header().join(", "));
    if !dataset.overflow().is_empty() {
        println!(
            "  Rows wider than the header: {} (extra cells are not copied to the output)",
            dataset.overflow().len()
        );
    }

    println!("\nCrawler Configuration:");
    println!("  Session limit: {}", config.crawler.limit);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    match config.crawler.rate_limit() {
        Some(delay) => println!("  Pause between rows: {}ms", delay.as_millis()),
        None => println!("  Pause between rows: none"),
    }
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nExtraction ({} units):", pipeline.unit_names().len());
    for name in pipeline.unit_names() {
        println!("  - {}", name);
    }
    println!("  Output fields: {}", pipeline.headers().join(", "));

    println!("\nOutput:");
    println!("  Data: {}", config.output.data_path().display());
    println!("  Log: {}", config.output.log_path().display());
    println!("  Checkpoint: {}", config.output.checkpoint_path().display());

    let recorded = state.as_ref().map_or(0, |s| s.rows_recorded());
    let pending = dataset.len().saturating_sub(recorded);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would process {} of {} pending rows",
        pending.min(config.crawler.limit),
        pending
    );

    Ok(())
}

/// Handles the main crawl operation
///
/// The checkpoint is saved after the session whatever its outcome; a session
/// error is reported only once the save has run.
async fn handle_crawl(
    config: Config,
    config_hash: String,
    limit: Option<usize>,
    fresh: bool,
) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh session (ignoring previous state)");
    } else {
        tracing::info!("Starting session (will resume from checkpoint if present)");
    }

    let mut coordinator = Coordinator::new(config, Some(config_hash), fresh)
        .context("failed to initialize the crawl")?;
    let limit = limit.unwrap_or(coordinator.settings().crawler.limit);

    let result = tokio::select! {
        result = coordinator.run(limit) => result.map(Some),
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, saving checkpoint");
            Ok(None)
        }
    };

    coordinator.save().context("failed to save checkpoint")?;

    match result {
        Ok(Some(report)) => {
            print_report(&report);
            Ok(())
        }
        Ok(None) => {
            println!(
                "Interrupted after row {}",
                coordinator.state().last_completed_index
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Session failed: {}", e);
            Err(e).context("crawl session failed")
        }
    }
}
