//! Countdown engine.
//!
//! A pollable countdown state machine:
//! - `arm` sets the duration (the only fallible operation)
//! - `start` / `pause` / `reset` switch between idle and running
//! - `tick` decrements by one second while running
//! - `skip` forces completion regardless of the remaining time
//!
//! Expiry is transient: reaching zero produces the completion and leaves the
//! engine idle in the same step.
//!
//! The engine holds no presentation references and performs no I/O. It is
//! not internally synchronized; callers sharing it across tasks wrap it in a
//! mutex.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, trace};

use super::clock::Clock;
use super::error::TimerError;

// ============================================================================
// CountdownEvent / Completion
// ============================================================================

/// Summary of an interval at the moment it finished or was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// When the engine last transitioned to running
    pub started_at: DateTime<Local>,
    /// When the interval finished
    pub finished_at: DateTime<Local>,
    /// Duration the interval was armed with
    pub planned_seconds: u32,
    /// Seconds counted down before finishing
    pub actual_seconds: u32,
    /// True iff the countdown reached zero
    pub completed: bool,
}

/// Notifications produced by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed and the engine is still running
    Tick {
        /// Remaining seconds after the decrement
        remaining_seconds: u32,
    },
    /// The countdown reached zero
    Finished(Completion),
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// Countdown state machine with whole-second ticks.
pub struct CountdownEngine {
    remaining_seconds: u32,
    original_seconds: u32,
    running: bool,
    started_at: Option<DateTime<Local>>,
    clock: Arc<dyn Clock>,
}

impl CountdownEngine {
    /// Creates an unarmed, idle engine.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            remaining_seconds: 0,
            original_seconds: 0,
            running: false,
            started_at: None,
            clock,
        }
    }

    /// Arms the countdown with a new duration.
    ///
    /// Valid in any state. If the engine is running it keeps running against
    /// the new target; pausing first is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` if `seconds <= 0` (or does not
    /// fit in the engine's range). The state is left unchanged.
    pub fn arm(&mut self, seconds: i64) -> Result<(), TimerError> {
        let armed = u32::try_from(seconds)
            .ok()
            .filter(|s| *s > 0)
            .ok_or(TimerError::InvalidDuration(seconds))?;

        self.remaining_seconds = armed;
        self.original_seconds = armed;
        if !self.running {
            self.started_at = None;
        }
        debug!(seconds = armed, running = self.running, "countdown armed");
        Ok(())
    }

    /// Starts counting down. No-op if already running or nothing remains.
    ///
    /// Every transition to running, including a resume, stamps `started_at`.
    pub fn start(&mut self) {
        if self.running || self.remaining_seconds == 0 {
            return;
        }
        self.running = true;
        self.started_at = Some(self.clock.now());
        debug!(remaining = self.remaining_seconds, "countdown started");
    }

    /// Pauses the countdown, preserving the remaining time.
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            debug!(remaining = self.remaining_seconds, "countdown paused");
        }
    }

    /// Stops the countdown and restores the last armed duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = self.original_seconds;
        self.started_at = None;
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `None` while idle: ticks are never queued for later.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if !self.running {
            trace!("tick ignored while idle");
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Some(CountdownEvent::Tick {
                remaining_seconds: self.remaining_seconds,
            });
        }

        self.running = false;
        debug!("countdown expired");
        Some(CountdownEvent::Finished(self.completion()))
    }

    /// Forces completion of the current interval.
    ///
    /// The completion reports `completed == false` unless the countdown had
    /// already reached zero.
    pub fn skip(&mut self) -> Completion {
        self.pause();
        debug!(remaining = self.remaining_seconds, "countdown skipped");
        self.completion()
    }

    fn completion(&self) -> Completion {
        let finished_at = self.clock.now();
        Completion {
            started_at: self.started_at.unwrap_or(finished_at),
            finished_at,
            planned_seconds: self.original_seconds,
            actual_seconds: self.original_seconds.saturating_sub(self.remaining_seconds),
            completed: self.remaining_seconds == 0,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn original_seconds(&self) -> u32 {
        self.original_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time of the last transition to running, if any.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }
}

impl fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("remaining_seconds", &self.remaining_seconds)
            .field("original_seconds", &self.original_seconds)
            .field("running", &self.running)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::ManualClock;
    use chrono::TimeZone;

    fn create_engine() -> (CountdownEngine, Arc<ManualClock>) {
        let start = Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        (CountdownEngine::new(clock.clone()), clock)
    }

    fn tick_n(engine: &mut CountdownEngine, n: usize) -> Vec<CountdownEvent> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    // ------------------------------------------------------------------------
    // Arm Tests
    // ------------------------------------------------------------------------

    mod arm_tests {
        use super::*;

        #[test]
        fn test_new_engine_is_unarmed() {
            let (engine, _clock) = create_engine();
            assert_eq!(engine.remaining_seconds(), 0);
            assert_eq!(engine.original_seconds(), 0);
            assert!(!engine.is_running());
            assert!(engine.started_at().is_none());
        }

        #[test]
        fn test_arm_then_reset_restores_duration() {
            for seconds in [1, 59, 1500, 86_400] {
                let (mut engine, _clock) = create_engine();
                engine.arm(seconds).unwrap();
                engine.reset();
                assert_eq!(engine.remaining_seconds() as i64, seconds);
                assert_eq!(engine.original_seconds() as i64, seconds);
            }
        }

        #[test]
        fn test_arm_rejects_non_positive() {
            let (mut engine, _clock) = create_engine();
            engine.arm(60).unwrap();

            assert_eq!(engine.arm(0), Err(TimerError::InvalidDuration(0)));
            assert_eq!(engine.arm(-5), Err(TimerError::InvalidDuration(-5)));

            assert_eq!(engine.remaining_seconds(), 60);
            assert_eq!(engine.original_seconds(), 60);
        }

        #[test]
        fn test_arm_rejects_oversized() {
            let (mut engine, _clock) = create_engine();
            let too_big = i64::from(u32::MAX) + 1;
            assert_eq!(engine.arm(too_big), Err(TimerError::InvalidDuration(too_big)));
            assert_eq!(engine.original_seconds(), 0);
        }

        #[test]
        fn test_arm_while_running_keeps_running() {
            let (mut engine, _clock) = create_engine();
            engine.arm(10).unwrap();
            engine.start();

            engine.arm(3).unwrap();

            assert!(engine.is_running());
            assert_eq!(engine.remaining_seconds(), 3);
            let events = tick_n(&mut engine, 3);
            assert!(matches!(events.last(), Some(CountdownEvent::Finished(_))));
        }
    }

    // ------------------------------------------------------------------------
    // Start / Pause / Reset Tests
    // ------------------------------------------------------------------------

    mod control_tests {
        use super::*;

        #[test]
        fn test_start_with_nothing_remaining_is_noop() {
            let (mut engine, _clock) = create_engine();
            engine.start();
            assert!(!engine.is_running());
            assert!(engine.started_at().is_none());
        }

        #[test]
        fn test_start_records_started_at() {
            let (mut engine, clock) = create_engine();
            engine.arm(5).unwrap();
            engine.start();
            assert_eq!(engine.started_at(), Some(clock.now()));
            assert!(engine.is_running());
        }

        #[test]
        fn test_start_while_running_keeps_timestamp() {
            let (mut engine, clock) = create_engine();
            engine.arm(5).unwrap();
            engine.start();
            let first = engine.started_at();

            clock.advance_seconds(2);
            engine.start();

            assert_eq!(engine.started_at(), first);
        }

        #[test]
        fn test_resume_restamps_started_at() {
            let (mut engine, clock) = create_engine();
            engine.arm(60).unwrap();
            engine.start();
            engine.pause();

            clock.advance_seconds(600);
            engine.start();
            assert_eq!(engine.started_at(), Some(clock.now()));

            engine.pause();
            engine.arm(30).unwrap();
            assert!(engine.started_at().is_none());
        }

        #[test]
        fn test_completion_after_resume_uses_last_start() {
            let (mut engine, clock) = create_engine();
            engine.arm(3).unwrap();
            engine.start();
            tick_n(&mut engine, 1);
            engine.pause();

            clock.advance_seconds(300);
            let resumed = clock.now();
            engine.start();
            let events = tick_n(&mut engine, 2);

            match events.last() {
                Some(CountdownEvent::Finished(c)) => {
                    assert_eq!(c.started_at, resumed);
                    assert_eq!(c.actual_seconds, 3);
                }
                other => panic!("Expected Finished, got {:?}", other),
            }
        }

        #[test]
        fn test_pause_when_idle_is_noop() {
            let (mut engine, _clock) = create_engine();
            engine.arm(5).unwrap();
            engine.pause();
            assert_eq!(engine.remaining_seconds(), 5);
            assert!(!engine.is_running());
        }

        #[test]
        fn test_reset_discards_progress() {
            let (mut engine, _clock) = create_engine();
            engine.arm(10).unwrap();
            engine.start();
            tick_n(&mut engine, 4);

            engine.reset();

            assert!(!engine.is_running());
            assert_eq!(engine.remaining_seconds(), 10);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_three_ticks_finish_once() {
            let (mut engine, _clock) = create_engine();
            engine.arm(3).unwrap();
            engine.start();

            let events = tick_n(&mut engine, 3);

            assert_eq!(
                events[..2],
                [
                    CountdownEvent::Tick { remaining_seconds: 2 },
                    CountdownEvent::Tick { remaining_seconds: 1 },
                ]
            );
            let finished: Vec<_> = events
                .iter()
                .filter_map(|e| match e {
                    CountdownEvent::Finished(c) => Some(c),
                    _ => None,
                })
                .collect();
            assert_eq!(finished.len(), 1);
            assert!(finished[0].completed);
            assert_eq!(finished[0].actual_seconds, 3);
            assert_eq!(engine.remaining_seconds(), 0);
            assert!(!engine.is_running());
        }

        #[test]
        fn test_ticks_after_expiry_are_ignored() {
            let (mut engine, _clock) = create_engine();
            engine.arm(1).unwrap();
            engine.start();
            tick_n(&mut engine, 1);

            assert!(engine.tick().is_none());
            assert_eq!(engine.remaining_seconds(), 0);
        }

        #[test]
        fn test_pause_suspends_ticks() {
            let (mut engine, _clock) = create_engine();
            engine.arm(3).unwrap();
            engine.start();
            tick_n(&mut engine, 2);

            engine.pause();
            let ignored = tick_n(&mut engine, 5);
            assert!(ignored.is_empty());
            assert_eq!(engine.remaining_seconds(), 1);

            engine.start();
            let events = tick_n(&mut engine, 1);
            assert!(matches!(events[0], CountdownEvent::Finished(ref c) if c.completed));
            assert_eq!(engine.remaining_seconds(), 0);
        }

        #[test]
        fn test_completion_uses_clock() {
            let (mut engine, clock) = create_engine();
            engine.arm(2).unwrap();
            engine.start();
            let started = clock.now();

            clock.advance_seconds(2);
            let events = tick_n(&mut engine, 2);

            match events.last() {
                Some(CountdownEvent::Finished(c)) => {
                    assert_eq!(c.started_at, started);
                    assert_eq!(c.finished_at, clock.now());
                }
                other => panic!("Expected Finished, got {:?}", other),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Skip Tests
    // ------------------------------------------------------------------------

    mod skip_tests {
        use super::*;

        #[test]
        fn test_skip_before_expiry_is_incomplete() {
            let (mut engine, _clock) = create_engine();
            engine.arm(25 * 60).unwrap();
            engine.start();
            tick_n(&mut engine, 1490);
            assert_eq!(engine.remaining_seconds(), 10);

            let completion = engine.skip();

            assert!(!completion.completed);
            assert_eq!(completion.actual_seconds, 1500 - 10);
            assert_eq!(completion.planned_seconds, 1500);
            assert!(!engine.is_running());
        }

        #[test]
        fn test_skip_never_started_uses_finish_time() {
            let (mut engine, clock) = create_engine();
            engine.arm(60).unwrap();

            let completion = engine.skip();

            assert_eq!(completion.started_at, clock.now());
            assert_eq!(completion.actual_seconds, 0);
            assert!(!completion.completed);
        }

        #[test]
        fn test_skip_after_expiry_is_complete() {
            let (mut engine, _clock) = create_engine();
            engine.arm(1).unwrap();
            engine.start();
            tick_n(&mut engine, 1);

            assert!(engine.skip().completed);
        }
    }
}
