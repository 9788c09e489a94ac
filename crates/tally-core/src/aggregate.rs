//! Aggregation of normalized records into an [`AnalysisSummary`]

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::categorize::KeywordTable;
use crate::models::{AnalysisSummary, Category, Ranked, TransactionRecord};

/// Number of descriptions reported in `recurring`
pub const RECURRING_LIMIT: usize = 10;

/// Sum debit amounts per month, ascending by month key
pub fn monthly_spending(records: &[TransactionRecord]) -> BTreeMap<String, f64> {
    sum_by_month(records.iter().filter(|r| r.is_debit()))
}

/// Mean of the monthly credit totals, or None without any credit rows
pub fn estimated_monthly_income(records: &[TransactionRecord]) -> Option<f64> {
    let by_month = sum_by_month(records.iter().filter(|r| r.is_credit()));
    mean(by_month.values().copied())
}

/// Sum debit amounts per category, descending by total.
///
/// Categories without debit rows are omitted; equal totals keep keyword-table order.
pub fn category_totals(records: &[TransactionRecord], keywords: &KeywordTable) -> Ranked<Category, f64> {
    let mut totals: HashMap<Category, f64> = HashMap::new();
    for r in records.iter().filter(|r| r.is_debit()) {
        *totals.entry(r.category).or_insert(0.0) += r.amount;
    }

    let mut entries: Vec<(Category, f64)> = totals.into_iter().collect();
    entries.sort_by_key(|(c, _)| (keywords.rank(*c), *c as u8));
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ranked::new(entries)
}

/// The most frequent descriptions across all rows.
///
/// Counts descend; equal counts keep first-encountered order. Rows without a
/// description are not counted.
pub fn recurring_descriptions(records: &[TransactionRecord], limit: usize) -> Ranked<String, usize> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for desc in records.iter().filter_map(|r| r.description.as_deref()) {
        match index.get(desc) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(desc, order.len());
                order.push((desc.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(limit);
    Ranked::new(order)
}

/// Build the full summary, taking ownership of the records as `raw_rows`
pub fn aggregate(records: Vec<TransactionRecord>, keywords: &KeywordTable) -> AnalysisSummary {
    let monthly_spending = monthly_spending(&records);
    let avg_monthly_spending = mean(monthly_spending.values().copied()).unwrap_or(0.0);
    let estimated_monthly_income = estimated_monthly_income(&records);
    let category_totals = category_totals(&records, keywords);
    let recurring = recurring_descriptions(&records, RECURRING_LIMIT);

    debug!(
        rows = records.len(),
        months = monthly_spending.len(),
        categories = category_totals.len(),
        has_income = estimated_monthly_income.is_some(),
        "Aggregated transactions"
    );

    AnalysisSummary {
        monthly_spending,
        avg_monthly_spending,
        estimated_monthly_income,
        category_totals,
        recurring,
        raw_rows: records,
    }
}

fn sum_by_month<'a>(records: impl Iterator<Item = &'a TransactionRecord>) -> BTreeMap<String, f64> {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        *by_month.entry(r.month.clone()).or_insert(0.0) += r.amount;
    }
    by_month
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_MONTH;

    fn record(month: &str, amount: f64, tx_type: &str, desc: Option<&str>) -> TransactionRecord {
        let keywords = KeywordTable::default();
        TransactionRecord {
            date: None,
            amount,
            tx_type: tx_type.to_string(),
            description: desc.map(str::to_string),
            category: keywords.categorize(desc),
            month: month.to_string(),
        }
    }

    #[test]
    fn test_monthly_spending_sums_debits_in_month_order() {
        let records = vec![
            record("2024-02", 100.0, "debit", Some("Swiggy")),
            record("2024-01", 50.0, "debit", Some("Uber")),
            record("2024-02", 25.0, "card debit", Some("Zomato")),
            record("2024-01", 999.0, "credit", Some("Salary")),
            record(UNKNOWN_MONTH, 10.0, "debit", Some("Misc")),
        ];
        let spending = monthly_spending(&records);
        let keys: Vec<&str> = spending.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "unknown"]);
        assert_eq!(spending["2024-01"], 50.0);
        assert_eq!(spending["2024-02"], 125.0);
        assert_eq!(spending["unknown"], 10.0);
    }

    #[test]
    fn test_income_absent_without_credits() {
        let records = vec![record("2024-01", 50.0, "debit", Some("Uber"))];
        assert_eq!(estimated_monthly_income(&records), None);

        let records = vec![
            record("2024-01", 1000.0, "credit", Some("Salary")),
            record("2024-01", 500.0, "credit", Some("Bonus")),
            record("2024-02", 1000.0, "credit", Some("Salary")),
        ];
        assert_eq!(estimated_monthly_income(&records), Some(1250.0));
    }

    #[test]
    fn test_zero_credit_amounts_still_count_as_income_data() {
        let records = vec![record("2024-01", 0.0, "credit", Some("Refund"))];
        assert_eq!(estimated_monthly_income(&records), Some(0.0));
    }

    #[test]
    fn test_unclassified_type_is_excluded_from_sums() {
        let records = vec![
            record("2024-01", 70.0, "transfer", Some("Rent")),
            record("2024-01", 30.0, "debit", Some("Rent")),
        ];
        let summary = aggregate(records, &KeywordTable::default());
        assert_eq!(summary.monthly_spending["2024-01"], 30.0);
        assert_eq!(summary.estimated_monthly_income, None);
        assert_eq!(summary.category_totals.get(&Category::Rent), Some(&30.0));
        assert_eq!(summary.raw_rows.len(), 2);
        assert_eq!(summary.recurring.get(&"Rent".to_string()), Some(&2));
    }

    #[test]
    fn test_category_totals_descending() {
        let records = vec![
            record("2024-01", 40.0, "debit", Some("Netflix")),
            record("2024-01", 300.0, "debit", Some("Rent")),
            record("2024-01", 60.0, "debit", Some("Swiggy")),
            record("2024-01", 60.0, "debit", Some("Zomato")),
            record("2024-01", 5000.0, "credit", Some("Swiggy refund")),
        ];
        let totals = category_totals(&records, &KeywordTable::default());
        let entries: Vec<(Category, f64)> = totals.iter().cloned().collect();
        assert_eq!(
            entries,
            vec![
                (Category::Rent, 300.0),
                (Category::Food, 120.0),
                (Category::Subscription, 40.0),
            ]
        );
        let values: Vec<f64> = totals.values().copied().collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_category_ties_follow_table_order() {
        let records = vec![
            record("2024-01", 10.0, "debit", Some("Gift")),
            record("2024-01", 10.0, "debit", Some("Movie night")),
            record("2024-01", 10.0, "debit", Some("Coffee")),
        ];
        let totals = category_totals(&records, &KeywordTable::default());
        let keys: Vec<Category> = totals.keys().copied().collect();
        assert_eq!(
            keys,
            vec![Category::Food, Category::Entertainment, Category::Other]
        );
    }

    #[test]
    fn test_recurring_counts_and_ties() {
        let mut records = Vec::new();
        for desc in ["B", "A", "B", "C", "A", "B"] {
            records.push(record("2024-01", 1.0, "debit", Some(desc)));
        }
        records.push(record("2024-01", 1.0, "debit", None));
        let recurring = recurring_descriptions(&records, RECURRING_LIMIT);
        let entries: Vec<(String, usize)> = recurring.into_inner();
        assert_eq!(
            entries,
            vec![("B".to_string(), 3), ("A".to_string(), 2), ("C".to_string(), 1)]
        );
    }

    #[test]
    fn test_recurring_is_capped() {
        let records: Vec<TransactionRecord> = (0..15)
            .map(|i| record("2024-01", 1.0, "debit", Some(&format!("Merchant {}", i))))
            .collect();
        let recurring = recurring_descriptions(&records, RECURRING_LIMIT);
        assert_eq!(recurring.len(), 10);
        assert_eq!(recurring.top(1)[0].0, "Merchant 0");
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(Vec::new(), &KeywordTable::default());
        assert!(summary.monthly_spending.is_empty());
        assert_eq!(summary.avg_monthly_spending, 0.0);
        assert_eq!(summary.estimated_monthly_income, None);
        assert!(summary.category_totals.is_empty());
        assert!(summary.recurring.is_empty());
    }
}
