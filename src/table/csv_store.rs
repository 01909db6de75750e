//! CSV file implementation of the table store
//!
//! Checkpoints write both tables to temporary files next to their targets
//! and only rename them into place once both writes have been synced.

use crate::config::TablesConfig;
use crate::search::{ResultRecord, SearchTask};
use crate::table::codec::{parse_table, write_table};
use crate::table::schema::{columns, validate_table};
use crate::table::traits::{TableError, TableResult, TableStore};
use crate::table::{Row, Table, TableKind};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Table store backed by four CSV files
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    paths: TablesConfig,
}

impl CsvTableStore {
    pub fn new(paths: TablesConfig) -> Self {
        Self { paths }
    }

    /// Path of the file backing `kind`
    pub fn path(&self, kind: TableKind) -> &Path {
        match kind {
            TableKind::Cities => &self.paths.cities,
            TableKind::LastNames => &self.paths.last_names,
            TableKind::Searches => &self.paths.searches,
            TableKind::Results => &self.paths.results,
        }
    }

    /// Reads, parses and validates one table
    ///
    /// A missing file is an empty table for tables that may be empty; it is
    /// created at the first checkpoint.
    pub fn load_table(&self, kind: TableKind) -> TableResult<Table> {
        let path = self.path(kind);

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound && kind.can_be_empty() => {
                tracing::info!(
                    "No {} file at {}, starting with an empty table",
                    kind,
                    path.display()
                );
                String::new()
            }
            Err(source) => {
                return Err(TableError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let table = parse_table(&text)?;
        validate_table(kind, &table)?;

        tracing::debug!(
            "Loaded {} {} rows from {}",
            table.rows.len(),
            kind,
            path.display()
        );
        Ok(table)
    }

    /// Reads one column of a reference table, skipping blank values
    fn load_reference_column(&self, kind: TableKind, column: &str) -> TableResult<Vec<String>> {
        let table = self.load_table(kind)?;
        let mut values = Vec::with_capacity(table.rows.len());

        for (line, row) in table.rows_with_lines() {
            let value = row.get(column).unwrap_or("").trim();
            if value.is_empty() {
                tracing::warn!("Skipping blank {} in the {} file at line {}", column, kind, line);
                continue;
            }
            values.push(value.to_string());
        }

        Ok(values)
    }
}

impl TableStore for CsvTableStore {
    fn load_zip_codes(&self) -> TableResult<Vec<String>> {
        self.load_reference_column(TableKind::Cities, columns::ZIP_CODE)
    }

    fn load_last_names(&self) -> TableResult<Vec<String>> {
        self.load_reference_column(TableKind::LastNames, columns::LAST_NAME)
    }

    fn load_worklist(&self) -> TableResult<Vec<SearchTask>> {
        let table = self.load_table(TableKind::Searches)?;
        table
            .rows_with_lines()
            .map(|(line, row)| SearchTask::from_row(row, line))
            .collect()
    }

    fn load_results(&self) -> TableResult<Vec<ResultRecord>> {
        let table = self.load_table(TableKind::Results)?;
        table
            .rows_with_lines()
            .map(|(line, row)| ResultRecord::from_row(row, line))
            .collect()
    }

    fn checkpoint(
        &mut self,
        worklist: &[SearchTask],
        results: &[ResultRecord],
    ) -> TableResult<()> {
        let search_rows: Vec<Row> = worklist.iter().map(SearchTask::to_row).collect();
        let result_rows: Vec<Row> = results.iter().map(ResultRecord::to_row).collect();

        // Stage both files before touching either target
        let staged_results = stage(&result_rows, TableKind::Results, self.path(TableKind::Results))?;
        let staged_searches =
            stage(&search_rows, TableKind::Searches, self.path(TableKind::Searches))?;

        // Results first: a crash between the renames redoes one search instead
        // of losing its results
        commit(staged_results, self.path(TableKind::Results))?;
        commit(staged_searches, self.path(TableKind::Searches))?;

        tracing::debug!(
            "Checkpointed {} searches and {} results",
            worklist.len(),
            results.len()
        );
        Ok(())
    }
}

/// Writes rows to a synced temporary file in the target's directory
fn stage(rows: &[Row], kind: TableKind, target: &Path) -> TableResult<NamedTempFile> {
    let dir = parent_dir(target);
    let io_err = |source| TableError::Io {
        path: target.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(&dir).map_err(io_err)?;
    write_table(rows, kind.required_columns(), &mut file)?;
    file.flush().map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;

    Ok(file)
}

fn commit(staged: NamedTempFile, target: &Path) -> TableResult<()> {
    staged.persist(target).map_err(|e| TableError::Persist {
        path: target.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
