//! Core data types for the study toolbox.
//!
//! This module defines the data structures shared between the timer,
//! the record store and the CLI:
//! - Pomodoro configuration with validation
//! - Interval and session kinds
//! - Session records emitted when an interval finishes

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Configuration for the Pomodoro cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    /// Work duration in minutes (1-120)
    pub work_minutes: u32,
    /// Short break duration in minutes (1-60)
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
    /// Number of completed work sessions between long breaks (1-12)
    pub sessions_per_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_per_long_break: 4,
        }
    }
}

impl PomodoroConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break cadence.
    pub fn with_sessions_per_long_break(mut self, sessions: u32) -> Self {
        self.sessions_per_long_break = sessions;
        self
    }

    /// Work duration in seconds.
    pub fn work_seconds(&self) -> u32 {
        self.work_minutes * 60
    }

    /// Short break duration in seconds.
    pub fn short_break_seconds(&self) -> u32 {
        self.short_break_minutes * 60
    }

    /// Long break duration in seconds.
    pub fn long_break_seconds(&self) -> u32 {
        self.long_break_minutes * 60
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_minutes < 1 || self.work_minutes > 120 {
            return Err("work duration must be between 1 and 120 minutes".to_string());
        }
        if self.short_break_minutes < 1 || self.short_break_minutes > 60 {
            return Err("short break must be between 1 and 60 minutes".to_string());
        }
        if self.long_break_minutes < 1 || self.long_break_minutes > 60 {
            return Err("long break must be between 1 and 60 minutes".to_string());
        }
        if self.sessions_per_long_break < 1 || self.sessions_per_long_break > 12 {
            return Err("sessions per long break must be between 1 and 12".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// SessionKind / IntervalKind
// ============================================================================

/// Kind of a finished interval as stored in the session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::Break => "Break",
        }
    }
}

/// Kind of the interval currently armed on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// Focused work interval
    Work,
    /// Break after an ordinary work session
    ShortBreak,
    /// Break after every Nth work session
    LongBreak,
}

impl IntervalKind {
    /// Returns the string representation of the interval kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Work => "work",
            IntervalKind::ShortBreak => "short_break",
            IntervalKind::LongBreak => "long_break",
        }
    }

    /// Returns true for either break kind.
    pub fn is_break(&self) -> bool {
        !matches!(self, IntervalKind::Work)
    }

    /// Collapses the interval kind to the kind recorded in the history.
    pub fn session_kind(&self) -> SessionKind {
        if self.is_break() {
            SessionKind::Break
        } else {
            SessionKind::Work
        }
    }
}

// ============================================================================
// SessionRecord
// ============================================================================

/// One finished (or skipped) interval.
///
/// Records are immutable once created; the store only appends or clears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Day the interval was started
    pub date: NaiveDate,
    /// Wall-clock time the interval was started
    pub start_time: NaiveTime,
    /// Wall-clock time the interval finished
    pub end_time: NaiveTime,
    /// Work or break
    pub kind: SessionKind,
    /// Seconds actually counted down
    pub actual_seconds: u32,
    /// Seconds the interval was armed with
    pub planned_seconds: u32,
    /// True iff the countdown reached zero
    pub completed: bool,
}

impl SessionRecord {
    /// Builds a record from the start and end timestamps of an interval.
    pub fn new(
        kind: SessionKind,
        started_at: DateTime<Local>,
        finished_at: DateTime<Local>,
        planned_seconds: u32,
        actual_seconds: u32,
        completed: bool,
    ) -> Self {
        Self {
            date: started_at.date_naive(),
            start_time: whole_seconds(started_at.time()),
            end_time: whole_seconds(finished_at.time()),
            kind,
            actual_seconds,
            planned_seconds,
            completed,
        }
    }

    /// Returns true if this is a completed work session.
    pub fn is_completed_work(&self) -> bool {
        self.completed && self.kind == SessionKind::Work
    }
}

fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ------------------------------------------------------------------------
    // PomodoroConfig Tests
    // ------------------------------------------------------------------------

    mod pomodoro_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = PomodoroConfig::default();
            assert_eq!(config.work_minutes, 25);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_minutes, 15);
            assert_eq!(config.sessions_per_long_break, 4);
        }

        #[test]
        fn test_builder_pattern() {
            let config = PomodoroConfig::default()
                .with_work_minutes(50)
                .with_short_break_minutes(10)
                .with_long_break_minutes(30)
                .with_sessions_per_long_break(3);

            assert_eq!(config.work_seconds(), 3000);
            assert_eq!(config.short_break_seconds(), 600);
            assert_eq!(config.long_break_seconds(), 1800);
            assert_eq!(config.sessions_per_long_break, 3);
        }

        #[test]
        fn test_validate_boundary_values() {
            let config = PomodoroConfig {
                work_minutes: 1,
                short_break_minutes: 1,
                long_break_minutes: 1,
                sessions_per_long_break: 1,
            };
            assert!(config.validate().is_ok());

            let config = PomodoroConfig {
                work_minutes: 120,
                short_break_minutes: 60,
                long_break_minutes: 60,
                sessions_per_long_break: 12,
            };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_out_of_range() {
            let cases = [
                PomodoroConfig::default().with_work_minutes(0),
                PomodoroConfig::default().with_work_minutes(121),
                PomodoroConfig::default().with_short_break_minutes(0),
                PomodoroConfig::default().with_long_break_minutes(61),
                PomodoroConfig::default().with_sessions_per_long_break(0),
            ];
            for config in cases {
                assert!(config.validate().is_err(), "{:?} should be rejected", config);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Kind Tests
    // ------------------------------------------------------------------------

    mod kind_tests {
        use super::*;

        #[test]
        fn test_interval_kind_is_break() {
            assert!(!IntervalKind::Work.is_break());
            assert!(IntervalKind::ShortBreak.is_break());
            assert!(IntervalKind::LongBreak.is_break());
        }

        #[test]
        fn test_interval_kind_to_session_kind() {
            assert_eq!(IntervalKind::Work.session_kind(), SessionKind::Work);
            assert_eq!(IntervalKind::LongBreak.session_kind(), SessionKind::Break);
        }

        #[test]
        fn test_interval_kind_serializes_snake_case() {
            let json = serde_json::to_string(&IntervalKind::LongBreak).unwrap();
            assert_eq!(json, "\"long_break\"");
        }
    }

    // ------------------------------------------------------------------------
    // SessionRecord Tests
    // ------------------------------------------------------------------------

    mod session_record_tests {
        use super::*;

        #[test]
        fn test_new_derives_date_and_times() {
            let started = Local.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap();
            let finished = Local.with_ymd_and_hms(2024, 3, 9, 9, 25, 0).unwrap();

            let record = SessionRecord::new(SessionKind::Work, started, finished, 1500, 1500, true);

            assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
            assert_eq!(record.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
            assert_eq!(record.end_time, NaiveTime::from_hms_opt(9, 25, 0).unwrap());
            assert!(record.is_completed_work());
        }

        #[test]
        fn test_incomplete_break_is_not_completed_work() {
            let now = Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
            let record = SessionRecord::new(SessionKind::Break, now, now, 300, 10, false);
            assert!(!record.is_completed_work());
        }

        #[test]
        fn test_json_shape() {
            let now = Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 15).unwrap();
            let record = SessionRecord::new(SessionKind::Break, now, now, 300, 300, true);

            let json = serde_json::to_value(&record).unwrap();
            assert_eq!(json["date"], "2024-03-09");
            assert_eq!(json["start_time"], "12:30:15");
            assert_eq!(json["kind"], "Break");
            assert_eq!(json["completed"], true);
        }
    }
}
