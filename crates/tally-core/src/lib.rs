//! Tally Core Library
//!
//! Transaction analysis for personal-finance CSV exports:
//! - CSV loading into a named-column table
//! - Row normalization with lenient date/amount parsing
//! - Keyword-based categorization
//! - Monthly spending/income aggregation
//! - Savings goal feasibility checks
//! - A versioned store for the latest published analysis

pub mod aggregate;
pub mod categorize;
pub mod error;
pub mod goal;
pub mod import;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod store;

pub use categorize::KeywordTable;
pub use error::{Error, Result};
pub use goal::check_goal;
pub use import::{read_table, read_transactions_csv, RawTable};
pub use models::{AnalysisSummary, Category, GoalRequest, GoalResult, Ranked, TransactionRecord};
pub use pipeline::{analyze, analyze_csv, analyze_with};
pub use store::{AnalysisStore, Snapshot};
