//! People-Sweep main entry point
//!
//! This is the command-line interface for the People-Sweep directory crawler.

use anyhow::Context;
use clap::Parser;
use people_sweep::config::{load_config_with_hash, Config};
use people_sweep::crawler::{build_coordinator, SiteCoordinator};
use people_sweep::output::{load_statistics, print_statistics, SweepStatistics};
use people_sweep::table::{CsvTableStore, TableStore};
use people_sweep::{generate_worklist, SiteUrls, SweepError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Number of upcoming searches listed by --dry-run
const PLAN_PREVIEW: usize = 10;

/// People-Sweep: a resumable directory lookup crawler
///
/// People-Sweep searches a people directory for every last name in every zip
/// code, follows each match to its detail page and records the contact
/// numbers it finds. Progress is checkpointed after every search, so a run
/// can be stopped and resumed at any time.
#[derive(Parser, Debug)]
#[command(name = "people-sweep")]
#[command(version)]
#[command(about = "A resumable directory lookup crawler", long_about = None)]
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

    /// Stop after this many completed searches
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Validate config and tables and show the plan without crawling
    #[arg(long, conflicts_with_all = ["stats", "limit"])]
    dry_run: bool,

    /// Show statistics from the searches and results tables and exit
    #[arg(long, conflicts_with_all = ["dry_run", "limit"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config, cli.limit).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("people_sweep=info,warn"),
            1 => EnvFilter::new("people_sweep=debug,info"),
            2 => EnvFilter::new("people_sweep=trace,debug"),
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

/// Handles the --dry-run mode: loads every table and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let site = SiteUrls::new(&config.site.base_url)?;
    let store = CsvTableStore::new(config.tables.clone());

    let zip_codes = store.load_zip_codes()?;
    let last_names = store.load_last_names()?;
    let existing = store.load_worklist()?;
    let results = store.load_results()?;
    let worklist = generate_worklist(&zip_codes, &last_names, existing);

    println!("=== People-Sweep Dry Run ===\n");

    println!("Tables:");
    println!("  Cities: {} ({} zip codes)", config.tables.cities.display(), zip_codes.len());
    println!(
        "  Last names: {} ({} names)",
        config.tables.last_names.display(),
        last_names.len()
    );
    println!("  Searches: {}", config.tables.searches.display());
    println!("  Results: {} ({} rows)", config.tables.results.display(), results.len());

    println!("\nSite:");
    println!("  Base URL: {}", site.base());
    println!("  User agent: {}", config.loader.user_agent);
    println!("  Settle delay: {}ms", config.loader.settle_delay);

    let stats = SweepStatistics::from_tables(&worklist, &results);
    println!(
        "\nWorklist: {} searches, {} completed, {} pending",
        stats.total_searches, stats.completed_searches, stats.pending_searches
    );

    let upcoming: Vec<_> = worklist
        .iter()
        .rev()
        .take_while(|t| t.is_pending())
        .take(PLAN_PREVIEW)
        .collect();
    if !upcoming.is_empty() {
        println!("\nNext searches:");
        for task in upcoming {
            println!("  - {} ({})", task.key, site.index_url(&task.key, 1));
        }
    }

    println!("\n✓ Configuration and tables are valid");
    Ok(())
}

/// Handles the --stats mode: shows statistics from the checkpoint tables
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Searches: {}", config.tables.searches.display());
    println!("Results: {}\n", config.tables.results.display());

    let store = CsvTableStore::new(config.tables.clone());
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, limit: Option<usize>) -> anyhow::Result<()> {
    let mut coordinator = build_coordinator(config)?.with_search_limit(limit);

    loop {
        match coordinator.run().await {
            Ok(summary) => {
                tracing::info!(
                    "Run finished: {} searches, {} pages, {} new results",
                    summary.searches_completed,
                    summary.pages_fetched,
                    summary.results_added
                );
                log_statistics(&coordinator);
                return Ok(());
            }
            Err(SweepError::Checkpoint(e)) => {
                tracing::error!("Could not save progress: {}", e);
                if !confirm_retry()? {
                    return Err(SweepError::Checkpoint(e).into());
                }
                // run() writes the pending checkpoint before the next search
            }
            Err(e) => {
                tracing::error!("Crawl failed: {}", e);
                return Err(e.into());
            }
        }
    }
}

fn log_statistics(coordinator: &SiteCoordinator) {
    let stats = SweepStatistics::from_tables(coordinator.worklist(), coordinator.results());
    tracing::info!(
        "{} of {} searches completed ({:.1}%), {} results",
        stats.completed_searches,
        stats.total_searches,
        stats.completion_rate(),
        stats.results
    );
}

/// Asks the operator whether to retry a failed checkpoint
fn confirm_retry() -> io::Result<bool> {
    print!("Retry saving the tables? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
