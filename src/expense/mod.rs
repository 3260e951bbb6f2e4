//! Expense tracking.
//!
//! - [`Expense`]: a dated expense classified as fixed or variable
//! - [`Ledger`]: the expense file with filtering and per-category totals
//! - [`BudgetBook`]: monthly budgets and budget status

pub mod budget;
pub mod error;
pub mod ledger;
pub mod model;

pub use budget::{BudgetBook, BudgetStatus};
pub use error::ExpenseError;
pub use ledger::{category_totals, total, ExpenseFilter, Ledger};
pub use model::{parse_date, Expense, ExpenseKind, YearMonth};
