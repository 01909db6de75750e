//! CSV encoding and decoding for tables
//!
//! Fields containing a comma, a quote, or a line break are quoted with
//! embedded quotes doubled. The output header is the union of the columns of
//! all rows, in the order they were first seen.

use crate::table::{Row, Table};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::io::Write;

/// Parses CSV text whose first record is a header row
///
/// Short records are padded with empty values; fields beyond the header are
/// dropped since they have no column name. Blank lines are skipped.
pub fn parse_table(text: &str) -> Result<Table, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table {
        columns,
        ..Table::default()
    };

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let mut row = Row::new();
        for (i, column) in table.columns.iter().enumerate() {
            row.set(column.as_str(), record.get(i).unwrap_or(""));
        }

        table.rows.push(row);
        table.lines.push(line);
    }

    Ok(table)
}

/// Writes rows as CSV
///
/// `fallback_columns` is used as the header when `rows` is empty so that an
/// empty table still round-trips with its schema.
pub fn write_table<W: Write>(
    rows: &[Row],
    fallback_columns: &[&str],
    writer: W,
) -> Result<(), csv::Error> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }
    if columns.is_empty() {
        columns.extend_from_slice(fallback_columns);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.get(c).unwrap_or("")))?;
    }
    writer.flush()?;

    Ok(())
}
