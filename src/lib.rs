//! Study Toolbox Library
//!
//! This library provides the core functionality for the study toolbox CLI.
//! It includes:
//! - Countdown engine and Pomodoro cycle with background ticking
//! - Session history for finished intervals
//! - GPA calculator with an editable grade scale
//! - Expense tracker with monthly budgets
//! - Sound notifications for finished intervals
//! - CLI command parsing and display utilities

pub mod cli;
pub mod expense;
pub mod gpa;
pub mod records;
pub mod sound;
pub mod storage;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{IntervalKind, PomodoroConfig, SessionKind, SessionRecord};

pub use timer::{
    Clock, CountdownEngine, CountdownEvent, CycleEvent, PomodoroCycle, SharedCycle, SystemClock,
    Ticker, TimerError,
};

pub use records::{MemoryRecords, RecordSink, RecordSummary, SessionStore};

pub use gpa::{Course, GpaBook, GpaError, GpaRecord, GradeScale};

pub use expense::{BudgetBook, BudgetStatus, Expense, ExpenseError, ExpenseKind, Ledger, YearMonth};

pub use sound::{MockSoundPlayer, SoundError, SoundPlayer, SoundSource};

pub use storage::{DataDir, StoreError};
