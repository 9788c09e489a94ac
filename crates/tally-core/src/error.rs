//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// No income figure could be resolved for a goal check
    #[error("monthly_income required.")]
    IncomeRequired,

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
