//! Table module for persisting crawl inputs and progress
//!
//! This module handles the four flat tables the crawl works with:
//! - Reading and writing CSV with the quoting rules the tables use
//! - Table schemas (required columns, whether a table may be empty)
//! - Conversion between rows and typed worklist/result records
//! - Atomic checkpointing of the worklist and results

mod codec;
mod csv_store;
mod schema;
mod traits;

pub use codec::{parse_table, write_table};
pub use csv_store::CsvTableStore;
pub use schema::{columns, validate_table};
pub use traits::{TableError, TableResult, TableStore};

use std::fmt;

/// The four tables a crawl works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Cities,
    LastNames,
    Searches,
    Results,
}

impl TableKind {
    /// Human readable table name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cities => "cities",
            Self::LastNames => "last names",
            Self::Searches => "searches",
            Self::Results => "results",
        }
    }

    /// Whether a file with no data rows is acceptable for this table
    pub fn can_be_empty(&self) -> bool {
        matches!(self, Self::Searches | Self::Results)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single table row: column/value pairs in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `column`, if the row has it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `column` to `value`, appending the column if it is new
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Builder-style [`Row::set`]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Copy of the row without the given columns
    pub fn without(&self, columns: &[&str]) -> Row {
        Row {
            cells: self
                .cells
                .iter()
                .filter(|(name, _)| !columns.contains(&name.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Sets every cell of `other` on this row
    pub fn merged(mut self, other: &Row) -> Self {
        for (column, value) in &other.cells {
            self.set(column.as_str(), value.as_str());
        }
        self
    }

    /// Column names in row order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A parsed table: header columns plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header columns in file order (empty for an empty file)
    pub columns: Vec<String>,

    /// Data rows in file order
    pub rows: Vec<Row>,

    /// 1-based source line of each data row
    pub lines: Vec<u64>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over rows together with the line they started on
    pub fn rows_with_lines(&self) -> impl Iterator<Item = (u64, &Row)> {
        self.lines.iter().copied().zip(self.rows.iter())
    }
}
