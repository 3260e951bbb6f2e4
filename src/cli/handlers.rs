//! Command handlers for the timer, GPA and expense tools.
//!
//! Each handler opens the files it needs from the [`DataDir`], performs one
//! operation and prints the result.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use super::commands::{
    AddExpenseArgs, ExpenseCommands, FilterArgs, GpaCommands, RunArgs, ScaleCommands,
    TimerCommands,
};
use super::display::Display;
use super::session::{run_session, spawn_stdin_reader};
use crate::expense::{self, BudgetBook, Expense, ExpenseFilter, Ledger, YearMonth};
use crate::gpa::{GpaBook, GradeScale};
use crate::records::{RecordSink, RecordSummary, SessionStore};
use crate::sound::try_create_player;
use crate::storage::DataDir;
use crate::timer::{PomodoroCycle, SystemClock};

// ============================================================================
// Timer
// ============================================================================

/// Handles `timer` subcommands.
pub async fn timer(data: &DataDir, command: TimerCommands) -> Result<()> {
    match command {
        TimerCommands::Run(args) => run_timer(data, &args).await,
        TimerCommands::Records { limit } => {
            let store = open_sessions(data)?;
            Display::show_records(store.records(), limit);
            Ok(())
        }
        TimerCommands::Summary => {
            let store = open_sessions(data)?;
            let summary = RecordSummary::compute(store.records(), Local::now().date_naive());
            Display::show_record_summary(&summary);
            Ok(())
        }
        TimerCommands::Clear { yes } => {
            if !yes {
                bail!("this deletes every session record; pass --yes to confirm");
            }
            let mut store = open_sessions(data)?;
            store.clear().context("failed to clear session records")?;
            Display::show_success("all session records cleared");
            Ok(())
        }
    }
}

async fn run_timer(data: &DataDir, args: &RunArgs) -> Result<()> {
    let store = open_sessions(data)?;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let cycle = PomodoroCycle::new(args.config(), Arc::new(SystemClock), Box::new(store), event_tx)
        .context("invalid timer configuration")?;
    let player = try_create_player(args.no_sound);

    info!("starting interactive timer session");
    run_session(
        Arc::new(Mutex::new(cycle)),
        event_rx,
        spawn_stdin_reader(),
        player.as_ref(),
    )
    .await;
    Ok(())
}

fn open_sessions(data: &DataDir) -> Result<SessionStore> {
    SessionStore::open(data.session_records()).context("failed to load session records")
}

// ============================================================================
// GPA
// ============================================================================

/// Handles `gpa` subcommands.
pub fn gpa(data: &DataDir, command: GpaCommands) -> Result<()> {
    match command {
        GpaCommands::Scale { command } => gpa_scale(data, command),
        GpaCommands::New { name } => {
            let mut book = open_book(data)?;
            let id = book.create(name.as_deref())?;
            let record = book.get(id)?;
            Display::show_success(&format!("created record #{} '{}'", id, record.name));
            Ok(())
        }
        GpaCommands::List => {
            Display::show_gpa_records(open_book(data)?.iter());
            Ok(())
        }
        GpaCommands::Show { id } => {
            let book = open_book(data)?;
            Display::show_gpa_record(id, book.get(id)?);
            Ok(())
        }
        GpaCommands::Rename { id, name } => {
            open_book(data)?.rename(id, &name)?;
            Display::show_success(&format!("record #{} renamed", id));
            Ok(())
        }
        GpaCommands::Delete { id } => {
            let removed = open_book(data)?.delete(id)?;
            Display::show_success(&format!("deleted record #{} '{}'", id, removed.name));
            Ok(())
        }
        GpaCommands::Calc { id, courses } => {
            let scale = open_scale(data)?;
            let mut book = open_book(data)?;
            book.update_courses(id, courses, &scale)?;
            Display::show_gpa_record(id, book.get(id)?);
            Ok(())
        }
    }
}

fn gpa_scale(data: &DataDir, command: ScaleCommands) -> Result<()> {
    let path = data.grade_scale();
    let mut scale = open_scale(data)?;
    match command {
        ScaleCommands::Show => {
            Display::show_scale(&scale);
            return Ok(());
        }
        ScaleCommands::Set { grade, points } => {
            scale.set(&grade, points)?;
            Display::show_success(&format!("{} = {:.2}", grade.trim().to_uppercase(), points));
        }
        ScaleCommands::Remove { grade } => {
            scale.remove(&grade)?;
            Display::show_success(&format!("removed grade {}", grade.trim().to_uppercase()));
        }
        ScaleCommands::Reset => {
            scale.reset();
            Display::show_success("grade scale restored to default");
        }
    }
    scale.save(&path)?;
    Ok(())
}

fn open_book(data: &DataDir) -> Result<GpaBook> {
    GpaBook::open(data.gpa_records()).context("failed to load GPA records")
}

fn open_scale(data: &DataDir) -> Result<GradeScale> {
    GradeScale::load(&data.grade_scale()).context("failed to load grade scale")
}

// ============================================================================
// Expenses
// ============================================================================

/// Handles `expense` subcommands.
pub fn expense(data: &DataDir, command: ExpenseCommands) -> Result<()> {
    let today = Local::now().date_naive();
    match command {
        ExpenseCommands::Add(args) => add_expense(data, args, today),
        ExpenseCommands::List(filter) => {
            let ledger = open_ledger(data)?;
            Display::show_expenses(&ledger.filter(&resolve_filter(&filter, today)));
            Ok(())
        }
        ExpenseCommands::Summary(filter) => summarize(data, &filter, today),
        ExpenseCommands::Delete { number } => {
            let removed = open_ledger(data)?.remove_at(number)?;
            Display::show_success(&format!("deleted expense {}", removed));
            Ok(())
        }
        ExpenseCommands::Budget {
            amount,
            year,
            month,
        } => {
            let month = YearMonth::new(
                year.unwrap_or_else(|| today.year()),
                month.unwrap_or_else(|| today.month()),
            )?;
            let mut budgets = open_budgets(data)?;
            budgets.set(month, amount)?;
            Display::show_success(&format!(
                "budget set to {} for {}",
                Display::format_money(amount),
                month
            ));

            let ledger = open_ledger(data)?;
            let spent = expense::total(ledger.iter().filter(|e| month.contains(e.date)));
            Display::show_budget_status(&month.to_string(), &budgets.status(month, spent));
            Ok(())
        }
    }
}

fn add_expense(data: &DataDir, args: AddExpenseArgs, today: NaiveDate) -> Result<()> {
    let expense = Expense::new(
        args.date.unwrap_or(today),
        &args.name,
        args.amount,
        &args.category,
        &args.account,
        &args.note,
    )?;
    let message = format!("added {}", expense);
    let number = open_ledger(data)?.add(expense)?;
    Display::show_success(&format!("{} as number {}", message, number));
    Ok(())
}

fn summarize(data: &DataDir, args: &FilterArgs, today: NaiveDate) -> Result<()> {
    let filter = resolve_filter(args, today);
    let ledger = open_ledger(data)?;
    let matched = ledger.filter(&filter);
    let expenses: Vec<&Expense> = matched.iter().map(|(_, e)| *e).collect();

    let label = filter_label(&filter);
    let total = expense::total(expenses.iter().copied());
    Display::show_expense_totals(
        &label,
        &expense::category_totals(expenses.iter().copied()),
        total,
    );

    if let (Some(year), Some(month)) = (filter.year, filter.month) {
        let month = YearMonth::new(year, month)?;
        let budgets = open_budgets(data)?;
        Display::show_budget_status(&month.to_string(), &budgets.status(month, total));
    }
    Ok(())
}

/// Year and month default to today's unless `--all` is given.
fn resolve_filter(args: &FilterArgs, today: NaiveDate) -> ExpenseFilter {
    if args.all {
        return ExpenseFilter {
            category: args.category.clone(),
            ..ExpenseFilter::default()
        };
    }
    ExpenseFilter {
        year: Some(args.year.unwrap_or_else(|| today.year())),
        month: Some(args.month.unwrap_or_else(|| today.month())),
        category: args.category.clone(),
    }
}

fn filter_label(filter: &ExpenseFilter) -> String {
    let period = match (filter.year, filter.month) {
        (Some(year), Some(month)) => format!("{:04}-{:02}", year, month),
        (Some(year), None) => format!("{:04}", year),
        _ => "all time".to_string(),
    };
    match &filter.category {
        Some(category) => format!("{}, {}", category, period),
        None => period,
    }
}

fn open_ledger(data: &DataDir) -> Result<Ledger> {
    Ledger::open(data.expenses()).context("failed to load expenses")
}

fn open_budgets(data: &DataDir) -> Result<BudgetBook> {
    BudgetBook::open(data.budgets()).context("failed to load budgets")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
    }

    #[test]
    fn test_resolve_filter_defaults_to_current_month() {
        let filter = resolve_filter(&FilterArgs::default(), today());
        assert_eq!(filter.year, Some(2024));
        assert_eq!(filter.month, Some(8));
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_resolve_filter_all_keeps_category() {
        let args = FilterArgs {
            category: Some("Food".to_string()),
            all: true,
            ..FilterArgs::default()
        };
        let filter = resolve_filter(&args, today());
        assert_eq!(filter.year, None);
        assert_eq!(filter.month, None);
        assert_eq!(filter.category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_filter_label() {
        let filter = resolve_filter(&FilterArgs::default(), today());
        assert_eq!(filter_label(&filter), "2024-08");

        let filter = ExpenseFilter {
            category: Some("Food".to_string()),
            ..ExpenseFilter::default()
        };
        assert_eq!(filter_label(&filter), "Food, all time");
    }

    #[test]
    fn test_gpa_flow_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path());

        gpa(&data, GpaCommands::New { name: None }).unwrap();
        gpa(
            &data,
            GpaCommands::Calc {
                id: 1,
                courses: vec!["A:3".parse().unwrap(), "B:1".parse().unwrap()],
            },
        )
        .unwrap();

        let book = GpaBook::open(data.gpa_records()).unwrap();
        assert!((book.get(1).unwrap().gpa - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_timer_clear_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let result = runtime.block_on(timer(&data, TimerCommands::Clear { yes: false }));

        assert!(result.is_err());
        assert!(!data.session_records().exists());
    }
}
