//! Table store trait and error types
//!
//! This module defines the trait interface for table backends and the
//! associated error types.

use crate::search::{ResultRecord, SearchTask};
use crate::table::TableKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("A column named \"{column}\" should be in the {table} file")]
    MissingColumn { table: TableKind, column: String },

    #[error("The {table} file is empty")]
    Empty { table: TableKind },

    #[error("Invalid {column} value '{value}' in the {table} file at line {line}")]
    InvalidValue {
        table: TableKind,
        line: u64,
        column: String,
        value: String,
    },

    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Trait for table backend implementations
///
/// The crawl reads the two reference tables once, reads the worklist and
/// results once at start-up, and afterwards only writes the latter two
/// through [`TableStore::checkpoint`].
pub trait TableStore {
    /// Loads the zip codes of the cities table, in file order
    fn load_zip_codes(&self) -> TableResult<Vec<String>>;

    /// Loads the last names table, in file order
    fn load_last_names(&self) -> TableResult<Vec<String>>;

    /// Loads the persisted search worklist
    fn load_worklist(&self) -> TableResult<Vec<SearchTask>>;

    /// Loads the persisted results log
    fn load_results(&self) -> TableResult<Vec<ResultRecord>>;

    /// Durably writes the worklist and the results log
    ///
    /// Either both tables are replaced or neither is. On error the caller's
    /// in-memory tables are untouched and the call may simply be repeated.
    fn checkpoint(&mut self, worklist: &[SearchTask], results: &[ResultRecord])
        -> TableResult<()>;
}
