//! CSV loading into a table of named columns, plus lenient cell parsers

use std::io::Read;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};

/// A transaction export loaded as named columns of nullable string cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table from column names and rows.
    ///
    /// Column names are trimmed and lowercased. Empty cells become nulls and
    /// short rows are padded with nulls. Whitespace-only cells are kept.
    pub fn new<C, R>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        R: IntoIterator<Item = Vec<Option<String>>>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row.into_iter()
                    .map(|cell| cell.filter(|s| !s.is_empty()))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column in row order, or None if the column is absent
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_deref()))
    }

    /// A single cell (None when the column is absent or the cell is null)
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

/// Load a CSV export with a header row into a [`RawTable`]
pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<Option<String>> = record.iter().map(|v| Some(v.to_string())).collect();
        rows.push(row);
    }

    let table = RawTable::new(headers.iter(), rows);
    debug!(
        "Loaded {} rows with columns [{}]",
        table.row_count(),
        table.columns().join(", ")
    );
    Ok(table)
}

/// Load a CSV export and require the columns the pipeline cannot default
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<RawTable> {
    let table = read_table(reader)?;
    if !table.has_column("description") {
        return Err(Error::MissingColumn("description".into()));
    }
    Ok(table)
}

/// Parse a date string in various common formats
///
/// Returns None for anything unrecognized.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // `%Y` also accepts two-digit years, so a four-digit format must yield a
    // plausible year before the `%y` variants get their turn.
    let formats = [
        "%Y-%m-%d",  // 2024-01-15
        "%m/%d/%Y",  // 01/15/2024
        "%m/%d/%y",  // 01/15/24
        "%Y/%m/%d",  // 2024/01/15
        "%m-%d-%Y",  // 01-15-2024
        "%m-%d-%y",  // 01-15-24
        "%d/%m/%Y",  // 15/01/2024 (European)
        "%d/%m/%y",  // 15/01/24
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%b-%y",  // 15-Jan-24
        "%d %b %Y",  // 15 Jan 2024
        "%b %d, %Y", // Jan 15, 2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if plausible_year(date) {
                return Some(date);
            }
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if plausible_year(dt.date()) {
                return Some(dt.date());
            }
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn plausible_year(date: NaiveDate) -> bool {
    date.year() >= 1000
}

/// Parse an amount string, handling currency symbols and commas
///
/// Returns None when the value is not a finite number.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['₹', '$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
