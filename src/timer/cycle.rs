//! Pomodoro cycle policy.
//!
//! Layers work/break scheduling on top of [`CountdownEngine`]:
//! - Work finished: count the session, arm a short or long break
//! - Break finished: arm the next work interval
//! - Every finished or skipped interval is appended to the record sink
//! - The presentation layer is notified over an unbounded channel

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::clock::Clock;
use super::engine::{Completion, CountdownEngine, CountdownEvent};
use super::error::TimerError;
use crate::records::RecordSink;
use crate::types::{IntervalKind, PomodoroConfig, SessionRecord};

// ============================================================================
// CycleEvent
// ============================================================================

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// One second elapsed
    Tick {
        /// Interval that was counting down when the tick happened
        interval: IntervalKind,
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// An interval finished (naturally or by skip) and the next one is armed
    IntervalFinished {
        /// Kind of the interval that just ended
        finished: IntervalKind,
        /// Whether it reached zero
        completed: bool,
        /// Seconds counted down
        actual_seconds: u32,
        /// Seconds it was armed with
        planned_seconds: u32,
        /// Kind of the newly armed interval
        next: IntervalKind,
        /// Duration of the newly armed interval
        next_seconds: u32,
        /// Completed work sessions so far
        session_count: u32,
    },
    /// The finished interval could not be written to the history
    RecordFailed {
        /// Human-readable reason
        message: String,
    },
}

// ============================================================================
// PomodoroCycle
// ============================================================================

/// Work/break cycling over a countdown engine.
pub struct PomodoroCycle {
    engine: CountdownEngine,
    config: PomodoroConfig,
    session_count: u32,
    is_break: bool,
    records: Box<dyn RecordSink>,
    event_tx: mpsc::UnboundedSender<CycleEvent>,
}

impl PomodoroCycle {
    /// Creates an idle cycle armed for a work interval.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidConfig` if the configuration is invalid.
    pub fn new(
        config: PomodoroConfig,
        clock: Arc<dyn Clock>,
        records: Box<dyn RecordSink>,
        event_tx: mpsc::UnboundedSender<CycleEvent>,
    ) -> Result<Self, TimerError> {
        config.validate().map_err(TimerError::InvalidConfig)?;

        let mut engine = CountdownEngine::new(clock);
        engine.arm(i64::from(config.work_seconds()))?;

        Ok(Self {
            engine,
            config,
            session_count: 0,
            is_break: false,
            records,
            event_tx,
        })
    }

    pub fn start(&mut self) {
        self.engine.start();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    /// Restores the current interval's armed duration.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Advances the countdown by one second.
    ///
    /// # Errors
    ///
    /// Returns an error only if the next interval could not be armed.
    pub fn tick(&mut self) -> Result<(), TimerError> {
        match self.engine.tick() {
            None => Ok(()),
            Some(CountdownEvent::Tick { remaining_seconds }) => {
                self.notify(CycleEvent::Tick {
                    interval: self.current_interval(),
                    remaining_seconds,
                });
                Ok(())
            }
            Some(CountdownEvent::Finished(completion)) => self.finish(completion),
        }
    }

    /// Ends the current interval immediately.
    ///
    /// # Errors
    ///
    /// Returns an error only if the next interval could not be armed.
    pub fn skip(&mut self) -> Result<(), TimerError> {
        let completion = self.engine.skip();
        self.finish(completion)
    }

    /// Re-arms with a custom duration, starting a fresh work interval.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::TimerRunning` while running and
    /// `TimerError::InvalidDuration` for a non-positive duration.
    pub fn set_custom_duration(&mut self, seconds: i64) -> Result<(), TimerError> {
        if self.engine.is_running() {
            return Err(TimerError::TimerRunning);
        }
        self.engine.arm(seconds)?;
        self.is_break = false;
        info!(seconds, "custom work interval armed");
        Ok(())
    }

    /// Stops the timer and starts over from the first work session.
    ///
    /// # Errors
    ///
    /// Returns an error only if the work interval could not be armed.
    pub fn restart(&mut self) -> Result<(), TimerError> {
        self.engine.pause();
        self.session_count = 0;
        self.is_break = false;
        self.engine.arm(i64::from(self.config.work_seconds()))
    }

    fn finish(&mut self, completion: Completion) -> Result<(), TimerError> {
        let finished = self.current_interval();

        let record = SessionRecord::new(
            finished.session_kind(),
            completion.started_at,
            completion.finished_at,
            completion.planned_seconds,
            completion.actual_seconds,
            completion.completed,
        );
        if let Err(e) = self.records.append(record) {
            error!("failed to record session: {}", e);
            self.notify(CycleEvent::RecordFailed {
                message: e.to_string(),
            });
        }

        if self.is_break {
            self.is_break = false;
            self.engine.arm(i64::from(self.config.work_seconds()))?;
        } else {
            self.session_count += 1;
            self.is_break = true;
            let seconds = if self.long_break_due() {
                self.config.long_break_seconds()
            } else {
                self.config.short_break_seconds()
            };
            self.engine.arm(i64::from(seconds))?;
        }

        let next = self.current_interval();
        info!(
            finished = finished.as_str(),
            next = next.as_str(),
            completed = completion.completed,
            session_count = self.session_count,
            "interval finished"
        );
        self.notify(CycleEvent::IntervalFinished {
            finished,
            completed: completion.completed,
            actual_seconds: completion.actual_seconds,
            planned_seconds: completion.planned_seconds,
            next,
            next_seconds: self.engine.original_seconds(),
            session_count: self.session_count,
        });
        Ok(())
    }

    fn long_break_due(&self) -> bool {
        self.session_count > 0 && self.session_count % self.config.sessions_per_long_break == 0
    }

    fn notify(&self, event: CycleEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("presentation channel closed, dropping event");
        }
    }

    /// Kind of the interval currently armed.
    pub fn current_interval(&self) -> IntervalKind {
        if !self.is_break {
            IntervalKind::Work
        } else if self.long_break_due() {
            IntervalKind::LongBreak
        } else {
            IntervalKind::ShortBreak
        }
    }

    /// Elapsed fraction of the armed interval, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let original = self.engine.original_seconds();
        if original == 0 {
            return 0.0;
        }
        f64::from(original - self.engine.remaining_seconds()) / f64::from(original)
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn is_break(&self) -> bool {
        self.is_break
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.engine.remaining_seconds()
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    /// Records written so far, oldest first.
    pub fn records(&self) -> &[SessionRecord] {
        self.records.records()
    }
}

// ============================================================================
// Tests
// ============================================================================
