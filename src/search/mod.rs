//! Search worklist and result records
//!
//! # Components
//!
//! - `SearchTask`: one `(last name, zip code)` lookup, pending or completed
//! - `ResultRecord`: one contact number found on a detail page
//! - `generate_worklist`: merges the reference tables into the worklist

mod generator;

pub use generator::{generate_worklist, worklist_order};

use crate::table::{columns, Row, TableError, TableKind};
use std::fmt;

/// Identity key of a search: at most one `SearchTask` exists per key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchKey {
    pub zip_code: String,
    pub last_name: String,
}

impl SearchKey {
    pub fn new(zip_code: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            zip_code: zip_code.into(),
            last_name: last_name.into(),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.last_name, self.zip_code)
    }
}

/// A worklist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTask {
    pub key: SearchKey,

    /// Completion time in epoch milliseconds, 0 while pending
    pub completed_at: i64,

    /// Columns of the loaded row outside the searches schema
    pub extra: Row,
}

impl SearchTask {
    /// Creates a pending search
    pub fn pending(key: SearchKey) -> Self {
        Self {
            key,
            completed_at: 0,
            extra: Row::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.completed_at == 0
    }

    /// Schema columns first, then any extra columns in their loaded order
    pub fn to_row(&self) -> Row {
        Row::new()
            .with(columns::TIMESTAMP, self.completed_at.to_string())
            .with(columns::ZIP_CODE, self.key.zip_code.as_str())
            .with(columns::LAST_NAME, self.key.last_name.as_str())
            .merged(&self.extra)
    }

    /// Reads a worklist row; `line` is only used for error reporting
    pub fn from_row(row: &Row, line: u64) -> Result<Self, TableError> {
        Ok(Self {
            key: SearchKey::new(
                row.get(columns::ZIP_CODE).unwrap_or(""),
                row.get(columns::LAST_NAME).unwrap_or(""),
            ),
            completed_at: parse_timestamp(TableKind::Searches, row, line)?,
            extra: row.without(TableKind::Searches.required_columns()),
        })
    }
}

/// A contact number found on a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub full_name: String,
    pub phone: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub last_name: String,

    /// Time the record was found, epoch milliseconds
    pub found_at: i64,

    /// Columns of the loaded row outside the results schema
    pub extra: Row,
}

impl ResultRecord {
    pub fn to_row(&self) -> Row {
        Row::new()
            .with(columns::TIMESTAMP, self.found_at.to_string())
            .with(columns::ZIP_CODE, self.zip_code.as_str())
            .with(columns::LAST_NAME, self.last_name.as_str())
            .with(columns::FULL_NAME, self.full_name.as_str())
            .with(columns::PHONE, self.phone.as_str())
            .with(columns::ADDRESS_1, self.address1.as_str())
            .with(columns::ADDRESS_2, self.address2.as_str())
            .with(columns::CITY, self.city.as_str())
            .with(columns::STATE, self.state.as_str())
            .merged(&self.extra)
    }

    pub fn from_row(row: &Row, line: u64) -> Result<Self, TableError> {
        let text = |column: &str| row.get(column).unwrap_or("").to_string();

        Ok(Self {
            full_name: text(columns::FULL_NAME),
            phone: text(columns::PHONE),
            address1: text(columns::ADDRESS_1),
            address2: text(columns::ADDRESS_2),
            city: text(columns::CITY),
            state: text(columns::STATE),
            zip_code: text(columns::ZIP_CODE),
            last_name: text(columns::LAST_NAME),
            found_at: parse_timestamp(TableKind::Results, row, line)?,
            extra: row.without(TableKind::Results.required_columns()),
        })
    }
}

/// Parses the `Timestamp` column; a blank value means 0
fn parse_timestamp(table: TableKind, row: &Row, line: u64) -> Result<i64, TableError> {
    let raw = row.get(columns::TIMESTAMP).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0);
    }

    raw.parse().map_err(|_| TableError::InvalidValue {
        table,
        line,
        column: columns::TIMESTAMP.to_string(),
        value: raw.to_string(),
    })
}
