//! Output module for reporting crawl progress
//!
//! This module handles:
//! - Summarizing the worklist and results tables
//! - Printing statistics for `--stats`

pub mod stats;

pub use stats::{load_statistics, print_statistics, SweepStatistics};
