//! Expense tracker error types.

use thiserror::Error;

use crate::storage::StoreError;

/// Errors raised by expense validation, the ledger and budgets.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// A required text field was blank.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// Amounts must be positive.
    #[error("amount must be greater than 0, got {0}")]
    InvalidAmount(f64),

    /// Budgets must be positive.
    #[error("budget must be greater than 0, got {0}")]
    InvalidBudget(f64),

    /// Dates are written as YYYY-MM-DD.
    #[error("date must be in YYYY-MM-DD format, got '{0}'")]
    InvalidDate(String),

    /// Months are written as YYYY-MM.
    #[error("month must be in YYYY-MM format, got '{0}'")]
    InvalidMonth(String),

    /// Field separators and line breaks cannot be stored.
    #[error("{0} cannot contain '|' or line breaks")]
    ReservedCharacter(&'static str),

    /// No expense at the given ledger position.
    #[error("no expense number {0}")]
    NotFound(usize),

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for expense operations.
pub type Result<T> = std::result::Result<T, ExpenseError>;
