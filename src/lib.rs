//! People-Sweep: a resumable directory lookup crawler
//!
//! This crate walks a people-directory site for every combination of a last
//! name and a zip code, follows each listed match to its detail page, and
//! appends the contact numbers it finds to a results table. The worklist and
//! results are checkpointed after every completed search so a crawl can be
//! stopped and resumed at any time.

pub mod config;
pub mod crawler;
pub mod output;
pub mod search;
pub mod site;
pub mod table;

use thiserror::Error;

/// Main error type for People-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Table error: {0}")]
    Table(#[from] table::TableError),

    #[error("Unexpected {kind} page at {url}: the site is no longer sending expected data")]
    UnexpectedPage {
        kind: crawler::PageKind,
        url: String,
    },

    #[error("Failed to load {url}: {message}")]
    Load { url: String, message: String },

    #[error("Checkpoint failed: {0}")]
    Checkpoint(#[source] table::TableError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use search::{generate_worklist, ResultRecord, SearchKey, SearchTask};
pub use site::SiteUrls;
