//! CLI module for the study toolbox.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `handlers`: One handler per tool, backed by the data directory
//! - `session`: Interactive Pomodoro session loop
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod handlers;
pub mod session;

pub use commands::{Cli, Commands, ExpenseCommands, GpaCommands, RunArgs, TimerCommands};
pub use display::Display;
pub use session::{run_session, SessionCommand};
