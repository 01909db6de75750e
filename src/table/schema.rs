//! Table schema definitions
//!
//! This module names the columns of the four tables and checks a parsed table
//! against the columns it must carry.

use crate::table::traits::{TableError, TableResult};
use crate::table::{Table, TableKind};

/// Column names shared by the tables
pub mod columns {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const ZIP_CODE: &str = "Zip Code";
    pub const LAST_NAME: &str = "Last Name";
    pub const FULL_NAME: &str = "Full Name";
    pub const PHONE: &str = "Phone";
    pub const ADDRESS_1: &str = "Address 1";
    pub const ADDRESS_2: &str = "Address 2";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
}

use columns::*;

const CITIES_COLUMNS: &[&str] = &[ZIP_CODE];
const LAST_NAMES_COLUMNS: &[&str] = &[LAST_NAME];
const SEARCHES_COLUMNS: &[&str] = &[TIMESTAMP, ZIP_CODE, LAST_NAME];
const RESULTS_COLUMNS: &[&str] = &[
    TIMESTAMP, ZIP_CODE, LAST_NAME, FULL_NAME, PHONE, ADDRESS_1, ADDRESS_2, CITY, STATE,
];

impl TableKind {
    /// Columns every file of this table must have, in canonical order
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Cities => CITIES_COLUMNS,
            Self::LastNames => LAST_NAMES_COLUMNS,
            Self::Searches => SEARCHES_COLUMNS,
            Self::Results => RESULTS_COLUMNS,
        }
    }
}

/// Checks a parsed table against its schema
///
/// A table without data rows is rejected unless the table may be empty. A
/// header, whenever the file has one, must carry every required column.
pub fn validate_table(kind: TableKind, table: &Table) -> TableResult<()> {
    if table.is_empty() && !kind.can_be_empty() {
        return Err(TableError::Empty { table: kind });
    }

    if table.columns.is_empty() {
        return Ok(());
    }

    for column in kind.required_columns() {
        if !table.columns.iter().any(|c| c == column) {
            return Err(TableError::MissingColumn {
                table: kind,
                column: column.to_string(),
            });
        }
    }

    Ok(())
}
