//! Monthly budgets, persisted as `YYYY-MM|amount` lines.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{ExpenseError, Result};
use super::model::YearMonth;
use crate::storage::{self, StoreError};

/// How spending compares to a month's budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    /// No budget recorded for the month
    NotSet,
    Within { budget: f64, remaining: f64 },
    Over { budget: f64, over: f64 },
}

/// Budget per month.
#[derive(Debug)]
pub struct BudgetBook {
    path: PathBuf,
    budgets: BTreeMap<YearMonth, f64>,
}

impl BudgetBook {
    /// Loads budgets from `path`; a missing file has no budgets.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Malformed` naming the first bad line.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut budgets = BTreeMap::new();
        if let Some(contents) = storage::read_to_string_opt(&path)? {
            for (index, line) in contents.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let (month, amount) = parse_line(line).map_err(|message| StoreError::Malformed {
                    path: path.clone(),
                    line: index + 1,
                    message,
                })?;
                budgets.insert(month, amount);
            }
        }
        debug!("loaded {} budgets from {}", budgets.len(), path.display());
        Ok(Self { path, budgets })
    }

    /// Sets the budget for a month and persists.
    ///
    /// Budgets are unchanged if the write fails.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::InvalidBudget` unless `amount` is positive.
    pub fn set(&mut self, month: YearMonth, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExpenseError::InvalidBudget(amount));
        }
        let mut budgets = self.budgets.clone();
        budgets.insert(month, amount);
        write_lines(&self.path, &budgets)?;
        self.budgets = budgets;
        info!("budget for {month} set to {amount:.2}");
        Ok(())
    }

    pub fn get(&self, month: YearMonth) -> Option<f64> {
        self.budgets.get(&month).copied()
    }

    /// Compares `spent` to the month's budget.
    pub fn status(&self, month: YearMonth, spent: f64) -> BudgetStatus {
        match self.get(month) {
            None => BudgetStatus::NotSet,
            Some(budget) if spent <= budget => BudgetStatus::Within {
                budget,
                remaining: budget - spent,
            },
            Some(budget) => BudgetStatus::Over {
                budget,
                over: spent - budget,
            },
        }
    }

}

fn write_lines(path: &Path, budgets: &BTreeMap<YearMonth, f64>) -> Result<()> {
    let contents: String = budgets
        .iter()
        .map(|(month, amount)| format!("{month}|{amount}\n"))
        .collect();
    storage::write_string(path, &contents)?;
    Ok(())
}

fn parse_line(line: &str) -> std::result::Result<(YearMonth, f64), String> {
    let (month, amount) = line
        .split_once('|')
        .ok_or_else(|| format!("expected YYYY-MM|amount, got '{line}'"))?;
    let month: YearMonth = month.parse().map_err(|e: ExpenseError| e.to_string())?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid budget amount '{amount}'"))?;
    Ok((month, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn august() -> YearMonth {
        YearMonth::new(2024, 8).unwrap()
    }

    #[test]
    fn test_status_not_set() {
        let dir = tempfile::tempdir().unwrap();
        let book = BudgetBook::open(dir.path().join("budgets.txt")).unwrap();
        assert_eq!(book.status(august(), 10.0), BudgetStatus::NotSet);
    }

    #[test]
    fn test_status_within_and_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = BudgetBook::open(dir.path().join("budgets.txt")).unwrap();
        book.set(august(), 500.0).unwrap();

        assert_eq!(
            book.status(august(), 500.0),
            BudgetStatus::Within {
                budget: 500.0,
                remaining: 0.0
            }
        );
        assert_eq!(
            book.status(august(), 512.5),
            BudgetStatus::Over {
                budget: 500.0,
                over: 12.5
            }
        );
    }

    #[test]
    fn test_set_rejects_non_positive() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = BudgetBook::open(dir.path().join("budgets.txt")).unwrap();
        assert!(matches!(book.set(august(), 0.0), Err(ExpenseError::InvalidBudget(_))));
        assert!(book.get(august()).is_none());
    }

    #[test]
    fn test_failed_set_keeps_previous_budget() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("data");
        let mut book = BudgetBook::open(sub.join("budgets.txt")).unwrap();
        book.set(august(), 300.0).unwrap();
        std::fs::remove_dir_all(&sub).unwrap();
        std::fs::write(&sub, "not a directory").unwrap();

        assert!(book.set(august(), 900.0).is_err());
        assert_eq!(book.get(august()), Some(300.0));
    }

    #[test]
    fn test_persists_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budgets.txt");
        let mut book = BudgetBook::open(&path).unwrap();
        book.set(august(), 450.5).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2024-08|450.5\n");
        assert_eq!(BudgetBook::open(&path).unwrap().get(august()), Some(450.5));
    }

    #[test]
    fn test_malformed_budget_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budgets.txt");
        std::fs::write(&path, "2024-08|100\n2024-13|5\n").unwrap();

        match BudgetBook::open(&path) {
            Err(ExpenseError::Store(StoreError::Malformed { line, .. })) => assert_eq!(line, 2),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }
}
