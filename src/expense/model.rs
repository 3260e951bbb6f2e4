//! Expense model and its flat-file line format.
//!
//! One expense per line:
//!
//! ```text
//! FIXED|2024-08-01|Rent|800.0|Bills|Bank|August
//! VARIABLE|2024-08-03|Lunch|12.5|Food|Cash|
//! 2024-07-30|Books|40.0|Education|Card
//! ```
//!
//! Untagged lines are from before expenses were classified.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::error::{ExpenseError, Result};

const SEPARATOR: char = '|';
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category whose expenses are classified as fixed.
pub const FIXED_CATEGORY: &str = "Bills";

// ============================================================================
// ExpenseKind
// ============================================================================

/// Classification of an expense. Only the serialization tag differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseKind {
    Fixed,
    Variable,
    /// Loaded from a line without a tag
    Unclassified,
}

impl ExpenseKind {
    /// Kind assigned to a new expense in `category`.
    pub fn for_category(category: &str) -> Self {
        if category == FIXED_CATEGORY {
            ExpenseKind::Fixed
        } else {
            ExpenseKind::Variable
        }
    }

    /// Line prefix, if the kind has one.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            ExpenseKind::Fixed => Some("FIXED"),
            ExpenseKind::Variable => Some("VARIABLE"),
            ExpenseKind::Unclassified => None,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "FIXED" => Some(ExpenseKind::Fixed),
            "VARIABLE" => Some(ExpenseKind::Variable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::Fixed => "fixed",
            ExpenseKind::Variable => "variable",
            ExpenseKind::Unclassified => "unclassified",
        }
    }
}

// ============================================================================
// YearMonth
// ============================================================================

/// A calendar month, rendered `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// # Errors
    ///
    /// Returns `ExpenseError::InvalidMonth` unless `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ExpenseError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ExpenseError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

// ============================================================================
// Expense
// ============================================================================

/// A single validated expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub kind: ExpenseKind,
    pub date: NaiveDate,
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub account: String,
    pub note: String,
}

impl Expense {
    /// Creates an expense, classifying it by category.
    ///
    /// # Errors
    ///
    /// Returns an error if any field fails validation.
    pub fn new(
        date: NaiveDate,
        name: &str,
        amount: f64,
        category: &str,
        account: &str,
        note: &str,
    ) -> Result<Self> {
        let category = required("category", category)?;
        Self::with_kind(
            ExpenseKind::for_category(&category),
            date,
            name,
            amount,
            &category,
            account,
            note,
        )
    }

    /// Creates an expense of an explicit kind.
    ///
    /// # Errors
    ///
    /// Returns an error if any field fails validation.
    pub fn with_kind(
        kind: ExpenseKind,
        date: NaiveDate,
        name: &str,
        amount: f64,
        category: &str,
        account: &str,
        note: &str,
    ) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExpenseError::InvalidAmount(amount));
        }
        let note = note.trim();
        if note.contains(SEPARATOR) || note.contains(['\n', '\r']) {
            return Err(ExpenseError::ReservedCharacter("note"));
        }
        Ok(Self {
            kind,
            date,
            name: required("expense name", name)?,
            amount,
            category: required("category", category)?,
            account: required("account", account)?,
            note: note.to_string(),
        })
    }

    /// Renders the expense as one ledger line (without the newline).
    pub fn to_line(&self) -> String {
        let body = format!(
            "{}|{}|{}|{}|{}|{}",
            self.date.format(DATE_FORMAT),
            self.name,
            self.amount,
            self.category,
            self.account,
            self.note
        );
        match self.kind.tag() {
            Some(tag) => format!("{tag}|{body}"),
            None => body,
        }
    }

    /// Parses one ledger line.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut parts: Vec<&str> = line.trim_end_matches(['\n', '\r']).split(SEPARATOR).collect();
        let kind = match parts.first().copied().and_then(ExpenseKind::from_tag) {
            Some(kind) => {
                parts.remove(0);
                kind
            }
            None => ExpenseKind::Unclassified,
        };

        if parts.len() < 5 {
            return Err(ExpenseError::EmptyField("expense fields"));
        }
        let date = parse_date(parts[0])?;
        let amount: f64 = parts[2]
            .trim()
            .parse()
            .map_err(|_| ExpenseError::InvalidAmount(f64::NAN))?;
        let note = parts.get(5).copied().unwrap_or("");

        Self::with_kind(kind, date, parts[1], amount, parts[3], parts[4], note)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - RM{:.2}",
            self.kind.as_str().to_uppercase(),
            self.date.format(DATE_FORMAT),
            self.name,
            self.amount
        )
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidDate` for any other format.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ExpenseError::InvalidDate(s.to_string()))
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ExpenseError::EmptyField(field));
    }
    if value.contains(SEPARATOR) || value.contains(['\n', '\r']) {
        return Err(ExpenseError::ReservedCharacter(field));
    }
    Ok(value.to_string())
}

// ============================================================================
// Tests
// ============================================================================
