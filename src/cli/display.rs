//! Display utilities for the study toolbox CLI.
//!
//! This module provides formatted output for:
//! - Success and error messages
//! - Timer status, ticks and interval changes
//! - Session history and summaries
//! - GPA records and the grade scale
//! - Expense listings, category totals and budget status

use std::io::Write;

use crate::expense::{BudgetStatus, Expense};
use crate::gpa::{GpaRecord, GradeScale};
use crate::records::summary::{hours_minutes, RecordSummary};
use crate::timer::PomodoroCycle;
use crate::types::{IntervalKind, SessionRecord};

/// Currency prefix for amounts.
pub const CURRENCY: &str = "RM";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a one-line success message.
    pub fn show_success(message: &str) {
        println!("* {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    // ------------------------------------------------------------------------
    // Timer
    // ------------------------------------------------------------------------

    /// Shows the interactive session commands.
    pub fn show_session_help() {
        println!("Commands:");
        println!("  start            start or resume the countdown");
        println!("  pause            pause the countdown");
        println!("  reset            restore the current interval");
        println!("  skip             end the current interval now");
        println!("  custom <minutes> arm a custom work interval (1-999)");
        println!("  restart          start over from the first session");
        println!("  status           show the timer state");
        println!("  help             show this help");
        println!("  quit             leave the session");
    }

    /// Shows the current timer state.
    pub fn show_status(cycle: &PomodoroCycle) {
        let state = if cycle.is_running() { "running" } else { "paused" };
        println!("Pomodoro Timer Status");
        println!("─────────────────────");
        println!("Interval: {}", Self::interval_title(cycle.current_interval()));
        println!("State: {}", state);
        println!("Remaining: {}", Self::format_clock(cycle.remaining_seconds()));
        println!("Progress: {:.0}%", cycle.progress() * 100.0);
        println!("Session: {}", cycle.session_count());
    }

    /// Rewrites the countdown line in place.
    pub fn show_tick(interval: IntervalKind, remaining_seconds: u32) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(
            stdout,
            "\r{} {}  ",
            Self::interval_title(interval),
            Self::format_clock(remaining_seconds)
        );
        let _ = stdout.flush();
    }

    /// Announces the end of an interval and the one now armed.
    pub fn show_interval_finished(
        finished: IntervalKind,
        completed: bool,
        actual_seconds: u32,
        next: IntervalKind,
        next_seconds: u32,
        session_count: u32,
    ) {
        println!();
        let verb = if completed { "complete" } else { "skipped" };
        match finished {
            IntervalKind::Work => println!(
                "* Session {} {} ({})",
                session_count,
                verb,
                Self::format_duration(actual_seconds)
            ),
            _ => println!("* Break {} ({})", verb, Self::format_duration(actual_seconds)),
        }
        match next {
            IntervalKind::Work => println!("  Ready to work? Next: work ({} minutes)", next_seconds / 60),
            _ => println!(
                "  Time for a {} ({} minutes)",
                Self::interval_title(next).to_lowercase(),
                next_seconds / 60
            ),
        }
        println!("  Type 'start' to begin.");
    }

    /// Shows session records, newest first.
    pub fn show_records(records: &[SessionRecord], limit: Option<usize>) {
        if records.is_empty() {
            println!("No sessions recorded yet");
            return;
        }
        println!(
            "{:<10}  {:<5}  {:<14}  {:<9}  {:<8}  {:<8}",
            "Date", "Type", "Duration", "Completed", "Start", "End"
        );
        let shown = limit.unwrap_or(records.len());
        for record in records.iter().rev().take(shown) {
            println!(
                "{:<10}  {:<5}  {:<14}  {:<9}  {:<8}  {:<8}",
                record.date.format("%Y-%m-%d"),
                record.kind.as_str(),
                Self::format_duration(record.actual_seconds),
                if record.completed { "Yes" } else { "No" },
                record.start_time.format("%H:%M:%S"),
                record.end_time.format("%H:%M:%S"),
            );
        }
    }

    /// Shows today's work and the all-time total.
    pub fn show_record_summary(summary: &RecordSummary) {
        let (day_hours, day_minutes) = hours_minutes(summary.day_work_seconds);
        let (hours, minutes) = hours_minutes(summary.total_completed_seconds);
        println!(
            "Today: {} work session(s), {}hrs {}min total",
            summary.day_work_sessions, day_hours, day_minutes
        );
        println!("Total time: {}hrs {}min", hours, minutes);
    }

    // ------------------------------------------------------------------------
    // GPA
    // ------------------------------------------------------------------------

    /// Shows the grade scale, highest points first.
    pub fn show_scale(scale: &GradeScale) {
        println!("{:<6}  {}", "Grade", "Points");
        for (grade, points) in scale.sorted() {
            println!("{:<6}  {:.2}", grade, points);
        }
    }

    /// Shows one line per GPA record.
    pub fn show_gpa_records<'a>(records: impl IntoIterator<Item = (u32, &'a GpaRecord)>) {
        let mut any = false;
        for (id, record) in records {
            any = true;
            println!(
                "{:>3}  {:<24}  {:>2} course(s)  GPA {:.2}",
                id,
                record.name,
                record.courses.len(),
                record.gpa
            );
        }
        if !any {
            println!("No GPA records yet");
        }
    }

    /// Shows a record's courses and GPA.
    pub fn show_gpa_record(id: u32, record: &GpaRecord) {
        println!("#{} {}", id, record.name);
        if record.courses.is_empty() {
            println!("  no courses yet");
        }
        for course in &record.courses {
            println!("  {:<4}  {} credit(s)", course.grade, course.credits);
        }
        println!("  Total credits: {}", record.total_credits());
        println!("  GPA: {:.2}", record.gpa);
    }

    // ------------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------------

    /// Shows numbered expenses.
    pub fn show_expenses(expenses: &[(usize, &Expense)]) {
        if expenses.is_empty() {
            println!("No expenses found");
            return;
        }
        println!(
            "{:>4}  {:<9}  {:<10}  {:<20}  {:>12}  {:<14}  {:<10}  {}",
            "No", "Kind", "Date", "Name", "Amount", "Category", "Account", "Note"
        );
        for (number, expense) in expenses {
            println!(
                "{:>4}  {:<9}  {:<10}  {:<20}  {:>12}  {:<14}  {:<10}  {}",
                number,
                expense.kind.as_str(),
                expense.date.format("%Y-%m-%d"),
                expense.name,
                Self::format_money(expense.amount),
                expense.category,
                expense.account,
                expense.note
            );
        }
    }

    /// Shows per-category totals and the overall total.
    pub fn show_expense_totals(label: &str, totals: &[(String, f64)], total: f64) {
        println!("Expense Summary ({})", label);
        for (category, amount) in totals {
            println!("  {:<14}  {}", category, Self::format_money(*amount));
        }
        println!("Total ({}): {}", label, Self::format_money(total));
    }

    /// Shows how spending compares to the month's budget.
    pub fn show_budget_status(month: &str, status: &BudgetStatus) {
        match status {
            BudgetStatus::NotSet => println!("No budget set for {}", month),
            BudgetStatus::Within { budget, remaining } => println!(
                "Budget: {} | Remaining: {}",
                Self::format_money(*budget),
                Self::format_money(*remaining)
            ),
            BudgetStatus::Over { budget, over } => println!(
                "Budget: {} | Over by {}",
                Self::format_money(*budget),
                Self::format_money(*over)
            ),
        }
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    /// Formats seconds as `MM:SS`.
    pub fn format_clock(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Formats seconds as `Xmin Ysec`.
    pub fn format_duration(total_seconds: u32) -> String {
        format!("{}min {}sec", total_seconds / 60, total_seconds % 60)
    }

    /// Formats an amount with the currency prefix and two decimals.
    pub fn format_money(amount: f64) -> String {
        format!("{}{:.2}", CURRENCY, amount)
    }

    /// Heading for an interval kind.
    pub fn interval_title(interval: IntervalKind) -> &'static str {
        match interval {
            IntervalKind::Work => "WORK SESSION",
            IntervalKind::ShortBreak => "SHORT BREAK",
            IntervalKind::LongBreak => "LONG BREAK",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
