//! Row normalization: raw table cells → typed, categorized transaction records
//!
//! Malformed cells never fail the pipeline; they degrade to defaults:
//! - bad or missing date → None, month "unknown"
//! - bad or missing amount → 0
//! - missing `type` column → "debit" for every row
//! - missing description → category `Other`

use chrono::NaiveDate;
use tracing::debug;

use crate::categorize::KeywordTable;
use crate::import::{parse_amount, parse_date, RawTable};
use crate::models::{TransactionRecord, DEFAULT_TRANSACTION_TYPE, UNKNOWN_MONTH};

/// "YYYY-MM" for a date, "unknown" without one
pub fn month_key(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_else(|| UNKNOWN_MONTH.to_string())
}

/// Normalize every row of the table into exactly one record, in input order
pub fn normalize(table: &RawTable, keywords: &KeywordTable) -> Vec<TransactionRecord> {
    let has_type = table.has_column("type");
    let mut unparsed_dates = 0usize;
    let mut unparsed_amounts = 0usize;

    let records: Vec<TransactionRecord> = (0..table.row_count())
        .map(|row| {
            let date = table.cell(row, "date").and_then(parse_date);
            if date.is_none() {
                unparsed_dates += 1;
            }

            let amount = match table.cell(row, "amount").and_then(parse_amount) {
                Some(v) => v.abs(),
                None => {
                    unparsed_amounts += 1;
                    0.0
                }
            };

            let tx_type = if has_type {
                table
                    .cell(row, "type")
                    .map(|t| t.trim().to_lowercase())
                    .unwrap_or_default()
            } else {
                DEFAULT_TRANSACTION_TYPE.to_string()
            };

            let description = table.cell(row, "description").map(str::to_string);
            let category = keywords.categorize(description.as_deref());

            TransactionRecord {
                date,
                amount,
                tx_type,
                description,
                category,
                month: month_key(date),
            }
        })
        .collect();

    debug!(
        "Normalized {} rows ({} without a date, {} without an amount)",
        records.len(),
        unparsed_dates,
        unparsed_amounts
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::read_table;
    use crate::models::Category;

    fn normalize_csv(csv: &str) -> Vec<TransactionRecord> {
        let table = read_table(csv.as_bytes()).unwrap();
        normalize(&table, &KeywordTable::default())
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(NaiveDate::from_ymd_opt(2024, 2, 29)), "2024-02");
        assert_eq!(month_key(None), "unknown");
    }

    #[test]
    fn test_normalize_full_row() {
        let records = normalize_csv(
            "date,description,amount,type\n2024-03-05,Swiggy dinner,-450.50,DEBIT\n",
        );
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(r.amount, 450.50);
        assert_eq!(r.tx_type, "debit");
        assert_eq!(r.description.as_deref(), Some("Swiggy dinner"));
        assert_eq!(r.category, Category::Food);
        assert_eq!(r.month, "2024-03");
    }

    #[test]
    fn test_bad_cells_degrade_without_dropping_rows() {
        let records = normalize_csv(
            "date,description,amount,type\n\
             not-a-date,Uber ride,abc,debit\n\
             ,,,\n\
             2024-01-10,Salary,50000,credit\n",
        );
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].date, None);
        assert_eq!(records[0].month, "unknown");
        assert_eq!(records[0].amount, 0.0);
        assert_eq!(records[0].category, Category::Transport);

        assert_eq!(records[1].description, None);
        assert_eq!(records[1].category, Category::Other);
        assert_eq!(records[1].tx_type, "");

        assert_eq!(records[2].amount, 50000.0);
        assert!(records[2].is_credit());
    }

    #[test]
    fn test_missing_optional_columns_use_defaults() {
        let records = normalize_csv("description\nNetflix\nRent March\n");
        assert_eq!(records.len(), 2);
        for r in &records {
            assert_eq!(r.tx_type, "debit");
            assert_eq!(r.amount, 0.0);
            assert_eq!(r.month, "unknown");
        }
        assert_eq!(records[0].category, Category::Subscription);
        assert_eq!(records[1].category, Category::Rent);
    }

    #[test]
    fn test_amounts_are_never_negative() {
        let records = normalize_csv(
            "description,amount\na,-10\nb,(20.5)\nc,\u{20b9}1\nd,-0\ne,nan\n",
        );
        let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![10.0, 20.5, 1.0, 0.0, 0.0]);
        assert!(amounts.iter().all(|a| *a >= 0.0 && !a.is_sign_negative()));
    }
}
