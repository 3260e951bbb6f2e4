//! The expense ledger, persisted as one line per expense.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info};

use super::error::{ExpenseError, Result};
use super::model::Expense;
use crate::storage::{self, StoreError};

// ============================================================================
// ExpenseFilter
// ============================================================================

/// Selects expenses by year, month and category. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<String>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.year.is_none_or(|year| expense.date.year() == year)
            && self.month.is_none_or(|month| expense.date.month() == month)
            && self
                .category
                .as_deref()
                .is_none_or(|category| expense.category == category)
    }
}

/// An expense together with its 1-based position in the ledger.
pub type Numbered<'a> = (usize, &'a Expense);

// ============================================================================
// Ledger
// ============================================================================

/// All recorded expenses, ordered by date (oldest first).
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    expenses: Vec<Expense>,
}

impl Ledger {
    /// Loads the ledger from `path`; a missing file is an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Malformed` naming the first bad line.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let expenses = match storage::read_to_string_opt(&path)? {
            Some(contents) => parse_lines(&path, &contents)?,
            None => Vec::new(),
        };
        debug!("loaded {} expenses from {}", expenses.len(), path.display());
        Ok(Self { path, expenses })
    }

    /// Adds an expense after any others on the same date and persists.
    ///
    /// Returns the expense's ledger position. The ledger is unchanged if
    /// the write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    pub fn add(&mut self, expense: Expense) -> Result<usize> {
        let index = self.expenses.partition_point(|e| e.date <= expense.date);
        info!("adding expense '{}' on {}", expense.name, expense.date);
        let mut expenses = self.expenses.clone();
        expenses.insert(index, expense);
        write_lines(&self.path, &expenses)?;
        self.expenses = expenses;
        Ok(index + 1)
    }

    /// Removes the expense at a 1-based position and persists.
    ///
    /// The ledger is unchanged if the write fails.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotFound` for a position outside the ledger.
    pub fn remove_at(&mut self, position: usize) -> Result<Expense> {
        if position == 0 || position > self.expenses.len() {
            return Err(ExpenseError::NotFound(position));
        }
        let mut expenses = self.expenses.clone();
        let removed = expenses.remove(position - 1);
        write_lines(&self.path, &expenses)?;
        self.expenses = expenses;
        info!("removed expense '{}'", removed.name);
        Ok(removed)
    }

    /// Matching expenses with their positions, newest first.
    pub fn filter(&self, filter: &ExpenseFilter) -> Vec<Numbered<'_>> {
        let mut matched: Vec<Numbered<'_>> = self
            .expenses
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e))
            .map(|(i, e)| (i + 1, e))
            .collect();
        matched.sort_by(|a, b| b.1.date.cmp(&a.1.date));
        matched
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

}

fn write_lines(path: &Path, expenses: &[Expense]) -> Result<()> {
    let mut contents = String::new();
    for expense in expenses {
        contents.push_str(&expense.to_line());
        contents.push('\n');
    }
    storage::write_string(path, &contents)?;
    Ok(())
}

// ============================================================================
// Totals
// ============================================================================

/// Sum of all amounts.
pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> f64 {
    expenses.into_iter().map(|e| e.amount).sum()
}

/// Per-category sums, in the order each category first appears.
pub fn category_totals<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(category, _)| *category == expense.category) {
            Some((_, sum)) => *sum += expense.amount,
            None => totals.push((expense.category.clone(), expense.amount)),
        }
    }
    totals
}

fn parse_lines(path: &Path, contents: &str) -> Result<Vec<Expense>> {
    let mut expenses = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let expense = Expense::parse_line(line).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            line: index + 1,
            message: e.to_string(),
        })?;
        expenses.push(expense);
    }
    Ok(expenses)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::model::ExpenseKind;
    use chrono::NaiveDate;

    fn expense(date: &str, name: &str, amount: f64, category: &str) -> Expense {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Expense::new(date, name, amount, category, "Cash", "").unwrap()
    }

    fn ledger_in(dir: &tempfile::TempDir) -> Ledger {
        Ledger::open(dir.path().join("expenses.txt")).unwrap()
    }

    mod persistence_tests {
        use super::*;

        #[test]
        fn test_missing_file_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            assert!(ledger_in(&dir).is_empty());
        }

        #[test]
        fn test_add_persists_sorted_by_date() {
            let dir = tempfile::tempdir().unwrap();
            let mut ledger = ledger_in(&dir);

            assert_eq!(ledger.add(expense("2024-08-10", "Lunch", 12.0, "Food")).unwrap(), 1);
            assert_eq!(ledger.add(expense("2024-08-01", "Rent", 800.0, "Bills")).unwrap(), 1);
            assert_eq!(ledger.add(expense("2024-08-10", "Dinner", 20.0, "Food")).unwrap(), 3);

            let reloaded = ledger_in(&dir);
            let names: Vec<&str> = reloaded.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, ["Rent", "Lunch", "Dinner"]);
            assert_eq!(reloaded.iter().next().unwrap().kind, ExpenseKind::Fixed);
        }

        #[test]
        fn test_loads_legacy_and_blank_lines() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("expenses.txt");
            std::fs::write(
                &path,
                "2024-07-30|Books|40.0|Education|Card\n\nFIXED|2024-08-01|Rent|800|Bills|Bank|Aug\n",
            )
            .unwrap();

            let ledger = Ledger::open(&path).unwrap();

            assert_eq!(ledger.len(), 2);
            let kinds: Vec<ExpenseKind> = ledger.iter().map(|e| e.kind).collect();
            assert_eq!(kinds, [ExpenseKind::Unclassified, ExpenseKind::Fixed]);
        }

        #[test]
        fn test_malformed_line_reports_line_number() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("expenses.txt");
            std::fs::write(&path, "2024-07-30|Books|40.0|Education|Card\nbroken\n").unwrap();

            match Ledger::open(&path) {
                Err(ExpenseError::Store(StoreError::Malformed { line, .. })) => assert_eq!(line, 2),
                other => panic!("Expected Malformed, got {:?}", other),
            }
        }

        #[test]
        fn test_remove_at() {
            let dir = tempfile::tempdir().unwrap();
            let mut ledger = ledger_in(&dir);
            ledger.add(expense("2024-08-01", "Rent", 800.0, "Bills")).unwrap();
            ledger.add(expense("2024-08-02", "Tea", 3.0, "Food")).unwrap();

            assert!(matches!(ledger.remove_at(0), Err(ExpenseError::NotFound(0))));
            assert!(matches!(ledger.remove_at(3), Err(ExpenseError::NotFound(3))));

            let removed = ledger.remove_at(1).unwrap();
            assert_eq!(removed.name, "Rent");
            assert_eq!(ledger_in(&dir).len(), 1);
        }

        #[test]
        fn test_failed_add_leaves_ledger_unchanged() {
            let dir = tempfile::tempdir().unwrap();
            let blocked = dir.path().join("blocked");
            let mut ledger = Ledger::open(blocked.join("expenses.txt")).unwrap();
            std::fs::write(&blocked, "not a directory").unwrap();

            let result = ledger.add(expense("2024-08-01", "Rent", 800.0, "Bills"));

            assert!(matches!(result, Err(ExpenseError::Store(StoreError::Io { .. }))));
            assert!(ledger.is_empty());
        }

        #[test]
        fn test_failed_remove_leaves_ledger_unchanged() {
            let dir = tempfile::tempdir().unwrap();
            let sub = dir.path().join("data");
            let mut ledger = Ledger::open(sub.join("expenses.txt")).unwrap();
            ledger.add(expense("2024-08-01", "Rent", 800.0, "Bills")).unwrap();
            ledger.add(expense("2024-08-02", "Tea", 3.0, "Food")).unwrap();
            std::fs::remove_dir_all(&sub).unwrap();
            std::fs::write(&sub, "not a directory").unwrap();

            assert!(ledger.remove_at(1).is_err());

            let names: Vec<&str> = ledger.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, ["Rent", "Tea"]);
        }
    }

    mod filter_tests {
        use super::*;

        fn sample(dir: &tempfile::TempDir) -> Ledger {
            let mut ledger = ledger_in(dir);
            ledger.add(expense("2024-07-31", "Books", 40.0, "Education")).unwrap();
            ledger.add(expense("2024-08-01", "Rent", 800.0, "Bills")).unwrap();
            ledger.add(expense("2024-08-03", "Lunch", 12.5, "Food")).unwrap();
            ledger.add(expense("2024-08-05", "Dinner", 20.0, "Food")).unwrap();
            ledger
        }

        #[test]
        fn test_filter_by_month_newest_first() {
            let dir = tempfile::tempdir().unwrap();
            let ledger = sample(&dir);
            let filter = ExpenseFilter {
                year: Some(2024),
                month: Some(8),
                category: None,
            };

            let matched = ledger.filter(&filter);

            let positions: Vec<usize> = matched.iter().map(|(n, _)| *n).collect();
            assert_eq!(positions, [4, 3, 2]);
        }

        #[test]
        fn test_filter_by_category() {
            let dir = tempfile::tempdir().unwrap();
            let ledger = sample(&dir);
            let filter = ExpenseFilter {
                category: Some("Food".to_string()),
                ..Default::default()
            };

            let matched = ledger.filter(&filter);

            assert_eq!(matched.len(), 2);
            assert!((total(matched.iter().map(|(_, e)| *e)) - 32.5).abs() < 1e-9);
        }

        #[test]
        fn test_empty_filter_matches_all() {
            let dir = tempfile::tempdir().unwrap();
            assert_eq!(sample(&dir).filter(&ExpenseFilter::default()).len(), 4);
        }

        #[test]
        fn test_category_totals_first_seen_order() {
            let dir = tempfile::tempdir().unwrap();
            let ledger = sample(&dir);
            let matched = ledger.filter(&ExpenseFilter::default());

            let totals = category_totals(matched.iter().map(|(_, e)| *e));

            assert_eq!(
                totals,
                vec![
                    ("Food".to_string(), 32.5),
                    ("Bills".to_string(), 800.0),
                    ("Education".to_string(), 40.0),
                ]
            );
        }
    }
}
