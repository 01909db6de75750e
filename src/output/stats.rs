//! Statistics over the worklist and results tables
//!
//! This module provides functionality for summarizing crawl progress from the
//! in-memory tables or straight from the table store.

use crate::search::{ResultRecord, SearchTask};
use crate::table::TableStore;
use crate::SweepError;
use std::collections::HashSet;

/// Crawl progress summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStatistics {
    /// Total number of searches in the worklist
    pub total_searches: usize,

    /// Searches with a completion timestamp
    pub completed_searches: usize,

    /// Searches still waiting to be crawled
    pub pending_searches: usize,

    /// Number of result rows
    pub results: usize,

    /// Distinct zip codes across the worklist
    pub distinct_zip_codes: usize,

    /// Distinct last names across the worklist
    pub distinct_last_names: usize,

    /// Epoch milliseconds of the most recent completed search
    pub last_completed_at: Option<i64>,
}

impl SweepStatistics {
    /// Summarizes a worklist and its results
    pub fn from_tables(worklist: &[SearchTask], results: &[ResultRecord]) -> Self {
        let completed_searches = worklist.iter().filter(|t| !t.is_pending()).count();
        let zip_codes: HashSet<&str> = worklist.iter().map(|t| t.key.zip_code.as_str()).collect();
        let last_names: HashSet<&str> = worklist.iter().map(|t| t.key.last_name.as_str()).collect();

        Self {
            total_searches: worklist.len(),
            completed_searches,
            pending_searches: worklist.len() - completed_searches,
            results: results.len(),
            distinct_zip_codes: zip_codes.len(),
            distinct_last_names: last_names.len(),
            last_completed_at: worklist
                .iter()
                .filter(|t| !t.is_pending())
                .map(|t| t.completed_at)
                .max(),
        }
    }

    /// Share of completed searches, in percent
    pub fn completion_rate(&self) -> f64 {
        if self.total_searches == 0 {
            0.0
        } else {
            (self.completed_searches as f64 / self.total_searches as f64) * 100.0
        }
    }
}

/// Loads statistics from the persisted worklist and results
///
/// Only the checkpoint tables are read, so the figures reflect the last
/// completed checkpoint rather than the reference tables.
pub fn load_statistics(store: &dyn TableStore) -> Result<SweepStatistics, SweepError> {
    let worklist = store.load_worklist()?;
    let results = store.load_results()?;
    Ok(SweepStatistics::from_tables(&worklist, &results))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SweepStatistics) {
    println!("=== Sweep Statistics ===\n");

    println!("Searches:");
    println!("  Total: {}", stats.total_searches);
    println!(
        "  Completed: {} ({:.1}%)",
        stats.completed_searches,
        stats.completion_rate()
    );
    println!("  Pending: {}", stats.pending_searches);
    println!("  Zip codes: {}", stats.distinct_zip_codes);
    println!("  Last names: {}", stats.distinct_last_names);
    println!();

    println!("Results: {}", stats.results);

    if let Some(millis) = stats.last_completed_at {
        match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis) {
            Some(at) => println!("Last search completed at {}", at.to_rfc3339()),
            None => println!("Last search completed at {} (epoch ms)", millis),
        }
    }
}
