//! Timer error types.

use thiserror::Error;

/// Errors raised by the countdown engine and the Pomodoro cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A countdown was armed with a non-positive (or oversized) duration.
    #[error("timer duration must be a positive number of seconds, got {0}")]
    InvalidDuration(i64),

    /// The operation needs the timer to be idle.
    #[error("the timer is running; pause it before setting a new duration")]
    TimerRunning,

    /// The cycle configuration failed validation.
    #[error("invalid timer configuration: {0}")]
    InvalidConfig(String),
}
