//! The analysis pipeline: raw table → normalized records → summary

use std::io::Read;

use crate::aggregate::aggregate;
use crate::categorize::KeywordTable;
use crate::error::Result;
use crate::import::{read_transactions_csv, RawTable};
use crate::models::AnalysisSummary;
use crate::normalize::normalize;

/// Normalize and aggregate a table with the default keyword table
pub fn analyze(table: &RawTable) -> AnalysisSummary {
    analyze_with(table, &KeywordTable::default())
}

/// Normalize and aggregate a table with a custom keyword table
pub fn analyze_with(table: &RawTable, keywords: &KeywordTable) -> AnalysisSummary {
    aggregate(normalize(table, keywords), keywords)
}

/// Load a CSV export and run the pipeline over it
pub fn analyze_csv<R: Read>(reader: R) -> Result<AnalysisSummary> {
    let table = read_transactions_csv(reader)?;
    Ok(analyze(&table))
}
