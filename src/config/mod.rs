//! Configuration module for People-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use people_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Worklist lives in {}", config.tables.searches.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LoaderConfig, SiteConfig, TablesConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
