//! Command definitions for the study toolbox CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::gpa::Course;
use crate::types::PomodoroConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Study toolbox - Pomodoro timer, GPA calculator and expense tracker
#[derive(Parser, Debug)]
#[command(
    name = "toolbox",
    version,
    about = "Pomodoro timer, GPA calculator and expense tracker",
    long_about = "A small toolbox for students.\n\
                  Run focused Pomodoro sessions, keep GPA records and track monthly expenses.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the toolbox data files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Pomodoro timer and session history
    Timer {
        #[command(subcommand)]
        command: TimerCommands,
    },

    /// GPA records and grade scale
    Gpa {
        #[command(subcommand)]
        command: GpaCommands,
    },

    /// Expense ledger and monthly budgets
    Expense {
        #[command(subcommand)]
        command: ExpenseCommands,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Timer subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TimerCommands {
    /// Run an interactive Pomodoro session
    Run(RunArgs),

    /// Show the session history, newest first
    Records {
        /// Show at most this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show today's work and the all-time total
    Summary,

    /// Delete the whole session history
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

/// GPA subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum GpaCommands {
    /// Show or edit the grade scale
    Scale {
        #[command(subcommand)]
        command: ScaleCommands,
    },

    /// Create a new GPA record
    New {
        /// Record name (defaults to "Record <id>")
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all GPA records
    List,

    /// Show a record's courses and GPA
    Show {
        /// Record id
        id: u32,
    },

    /// Rename a record
    Rename {
        /// Record id
        id: u32,
        /// New name
        name: String,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: u32,
    },

    /// Replace a record's courses and compute its GPA
    Calc {
        /// Record id
        id: u32,
        /// Courses as GRADE:CREDITS, e.g. A-:3
        #[arg(required = true, value_name = "GRADE:CREDITS")]
        courses: Vec<Course>,
    },
}

/// Grade scale subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ScaleCommands {
    /// Show the grade scale
    Show,

    /// Add or update a grade
    Set {
        /// Grade label, e.g. B+
        grade: String,
        /// Grade points (0.0-4.0)
        points: f64,
    },

    /// Remove a grade
    Remove {
        /// Grade label
        grade: String,
    },

    /// Restore the default scale
    Reset,
}

/// Expense subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ExpenseCommands {
    /// Record an expense
    Add(AddExpenseArgs),

    /// List expenses, newest first
    List(FilterArgs),

    /// Show totals per category and the budget status
    Summary(FilterArgs),

    /// Delete an expense by its number
    Delete {
        /// Number shown by `expense list`
        number: usize,
    },

    /// Set the budget for a month
    Budget {
        /// Budget amount
        #[arg(value_parser = parse_amount)]
        amount: f64,

        /// Year (defaults to the current year)
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for `timer run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub work: u32,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub short_break: u32,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: u32,

    /// Work sessions before a long break (1-12)
    #[arg(
        long,
        default_value = "4",
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub sessions_per_long_break: u32,

    /// Disable notification sounds
    #[arg(long)]
    pub no_sound: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            work: 25,
            short_break: 5,
            long_break: 15,
            sessions_per_long_break: 4,
            no_sound: false,
        }
    }
}

impl RunArgs {
    /// Cycle configuration described by these arguments.
    pub fn config(&self) -> PomodoroConfig {
        PomodoroConfig::default()
            .with_work_minutes(self.work)
            .with_short_break_minutes(self.short_break)
            .with_long_break_minutes(self.long_break)
            .with_sessions_per_long_break(self.sessions_per_long_break)
    }
}

/// Arguments for `expense add`
#[derive(Args, Debug, Clone)]
pub struct AddExpenseArgs {
    /// What the money was spent on
    #[arg(short, long)]
    pub name: String,

    /// Amount spent
    #[arg(short, long, value_parser = parse_amount)]
    pub amount: f64,

    /// Category; "Bills" expenses are recorded as fixed
    #[arg(short, long)]
    pub category: String,

    /// Account paid from, e.g. Cash
    #[arg(long)]
    pub account: String,

    /// Date as YYYY-MM-DD (defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Optional note
    #[arg(long, default_value = "")]
    pub note: String,
}

/// Filters shared by `expense list` and `expense summary`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Year (defaults to the current year)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=9999))]
    pub year: Option<i32>,

    /// Month 1-12 (defaults to the current month)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Only this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Ignore year and month
    #[arg(long, conflicts_with_all = ["year", "month"])]
    pub all: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a positive, finite amount.
fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err("amount must be greater than 0".to_string());
    }
    Ok(amount)
}

/// Parses a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    crate::expense::parse_date(s).map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
