//! Interactive Pomodoro session.
//!
//! The foreground loop owns all output. It reads one command per line and
//! prints the events the cycle sends over its channel; the ticking task
//! only ever touches the shared cycle.
//!
//! Stdin is read on a plain thread: a blocking read cannot be cancelled, and
//! a runtime waiting on one would not shut down after `quit`.

use std::io::BufRead;
use std::str::FromStr;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::display::Display;
use crate::sound::{SoundPlayer, SoundSource};
use crate::timer::{CycleEvent, SharedCycle, Ticker, TimerError};

/// Longest custom work interval, in minutes.
pub const MAX_CUSTOM_MINUTES: u32 = 999;

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed during an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    Skip,
    /// Arm a custom work interval of this many minutes
    Custom(u32),
    Restart,
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();

        let parsed = match command.as_str() {
            "start" | "resume" => Self::Start,
            "pause" => Self::Pause,
            "reset" => Self::Reset,
            "skip" => Self::Skip,
            "custom" => Self::Custom(parse_custom_minutes(argument)?),
            "restart" => Self::Restart,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}', type 'help'")),
        };
        if !matches!(parsed, Self::Custom(_)) && argument.is_some() {
            return Err(format!("'{command}' takes no arguments"));
        }
        Ok(parsed)
    }
}

fn parse_custom_minutes(argument: Option<&str>) -> Result<u32, String> {
    let argument = argument.ok_or("please enter a number of minutes, e.g. 'custom 30'")?;
    let minutes: i64 = argument
        .parse()
        .map_err(|_| format!("'{argument}' is not a valid number of minutes"))?;
    if minutes <= 0 {
        return Err("please enter a positive number of minutes".to_string());
    }
    if minutes > i64::from(MAX_CUSTOM_MINUTES) {
        return Err(format!("please enter at most {MAX_CUSTOM_MINUTES} minutes"));
    }
    u32::try_from(minutes).map_err(|e| e.to_string())
}

// ============================================================================
// Session
// ============================================================================

/// Forwards stdin lines to the returned receiver until end of input.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Runs the interactive loop until `quit` or until `input` closes.
pub async fn run_session(
    cycle: SharedCycle,
    mut events: mpsc::UnboundedReceiver<CycleEvent>,
    mut input: mpsc::UnboundedReceiver<String>,
    player: &dyn SoundPlayer,
) {
    let mut ticker = Ticker::new(cycle.clone());

    Display::show_status(&*cycle.lock().await);
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                handle_event(event, player);
            }
            line = input.recv() => {
                let Some(line) = line else {
                    debug!("input closed, ending session");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => handle_command(&cycle, &mut ticker, command).await,
                    Err(message) => Display::show_error(&message),
                }
            }
        }
    }

    ticker.abort();
    cycle.lock().await.pause();
    while let Ok(event) = events.try_recv() {
        handle_event(event, player);
    }
}

async fn handle_command(cycle: &SharedCycle, ticker: &mut Ticker, command: SessionCommand) {
    match command {
        SessionCommand::Start => {
            if cycle.lock().await.is_running() {
                Display::show_error("timer is already running");
                return;
            }
            ticker.start().await;
            let cycle = cycle.lock().await;
            Display::show_success(&format!(
                "{} started ({} remaining)",
                Display::interval_title(cycle.current_interval()),
                Display::format_clock(cycle.remaining_seconds())
            ));
        }
        SessionCommand::Pause => {
            ticker.abort();
            let mut cycle = cycle.lock().await;
            cycle.pause();
            Display::show_success(&format!(
                "paused ({} remaining)",
                Display::format_clock(cycle.remaining_seconds())
            ));
        }
        SessionCommand::Reset => {
            ticker.abort();
            let mut cycle = cycle.lock().await;
            cycle.reset();
            Display::show_success(&format!(
                "{} reset to {}",
                Display::interval_title(cycle.current_interval()),
                Display::format_clock(cycle.remaining_seconds())
            ));
        }
        SessionCommand::Skip => {
            ticker.abort();
            if let Err(e) = cycle.lock().await.skip() {
                Display::show_error(&e.to_string());
            }
        }
        SessionCommand::Custom(minutes) => {
            let mut cycle = cycle.lock().await;
            match cycle.set_custom_duration(i64::from(minutes) * 60) {
                Ok(()) => Display::show_success(&format!(
                    "timer set to {} minute(s), type 'start' to begin",
                    minutes
                )),
                Err(TimerError::TimerRunning) => {
                    Display::show_error("please pause the timer before setting a new time")
                }
                Err(e) => Display::show_error(&e.to_string()),
            }
        }
        SessionCommand::Restart => {
            ticker.abort();
            match cycle.lock().await.restart() {
                Ok(()) => Display::show_success("restarted from the first work session"),
                Err(e) => Display::show_error(&e.to_string()),
            }
        }
        SessionCommand::Status => Display::show_status(&*cycle.lock().await),
        SessionCommand::Help => Display::show_session_help(),
        SessionCommand::Quit => {}
    }
}

fn handle_event(event: CycleEvent, player: &dyn SoundPlayer) {
    match event {
        CycleEvent::Tick {
            interval,
            remaining_seconds,
        } => Display::show_tick(interval, remaining_seconds),
        CycleEvent::IntervalFinished {
            finished,
            completed,
            actual_seconds,
            next,
            next_seconds,
            session_count,
            ..
        } => {
            Display::show_interval_finished(
                finished,
                completed,
                actual_seconds,
                next,
                next_seconds,
                session_count,
            );
            if completed && !player.is_disabled() {
                if let Err(e) = player.play(&SoundSource::for_finished(finished)) {
                    warn!("Failed to play sound: {} ({})", e, e.suggestion());
                }
            }
        }
        CycleEvent::RecordFailed { message } => {
            Display::show_error(&format!("session not saved: {}", message));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
