//! Background ticking for a shared Pomodoro cycle.
//!
//! The ticking task wakes once per period, checks the running flag before
//! each decrement and exits as soon as the flag is clear (pause or expiry).
//! Missed wakeups are skipped, never replayed.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::cycle::PomodoroCycle;

/// A cycle shared between the foreground session and the ticking task.
pub type SharedCycle = Arc<Mutex<PomodoroCycle>>;

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Spawns a task that ticks `cycle` every `period` while it is running.
///
/// The first tick happens one full period after spawning.
pub fn spawn_ticker(cycle: SharedCycle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let mut cycle = cycle.lock().await;
            if !cycle.is_running() {
                debug!("ticker stopping: timer no longer running");
                break;
            }
            if let Err(e) = cycle.tick() {
                warn!("tick failed: {}", e);
            }
            if !cycle.is_running() {
                debug!("ticker stopping: interval finished");
                break;
            }
        }
    })
}

/// Owns the ticking task for one cycle.
///
/// Starting again replaces any previous task, so two tickers never drive
/// the same engine.
pub struct Ticker {
    cycle: SharedCycle,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(cycle: SharedCycle) -> Self {
        Self::with_period(cycle, TICK_PERIOD)
    }

    pub fn with_period(cycle: SharedCycle, period: Duration) -> Self {
        Self {
            cycle,
            period,
            handle: None,
        }
    }

    /// Starts the cycle and its ticking task.
    ///
    /// Does nothing beyond `PomodoroCycle::start` if the cycle cannot run
    /// (nothing remaining).
    pub async fn start(&mut self) {
        self.abort();

        let running = {
            let mut cycle = self.cycle.lock().await;
            cycle.start();
            cycle.is_running()
        };
        if running {
            self.handle = Some(spawn_ticker(self.cycle.clone(), self.period));
        }
    }

    /// Cancels the ticking task without touching the cycle.
    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MemoryRecords;
    use crate::timer::clock::SystemClock;
    use crate::timer::cycle::CycleEvent;
    use crate::types::PomodoroConfig;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    const FAST: Duration = Duration::from_millis(20);

    fn task_alive(ticker: &Ticker) -> bool {
        ticker.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn create_shared(
        work_seconds: i64,
    ) -> (SharedCycle, mpsc::UnboundedReceiver<CycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut cycle = PomodoroCycle::new(
            PomodoroConfig::default(),
            Arc::new(SystemClock),
            Box::new(MemoryRecords::new()),
            tx,
        )
        .unwrap();
        cycle.set_custom_duration(work_seconds).unwrap();
        (Arc::new(Mutex::new(cycle)), rx)
    }

    #[tokio::test]
    async fn test_ticker_runs_interval_to_completion() {
        let (cycle, mut rx) = create_shared(3);
        let mut ticker = Ticker::with_period(cycle.clone(), FAST);

        ticker.start().await;

        let finished = timeout(Duration::from_secs(2), async {
            loop {
                match rx.recv().await {
                    Some(event @ CycleEvent::IntervalFinished { .. }) => return event,
                    Some(_) => continue,
                    None => panic!("channel closed"),
                }
            }
        })
        .await
        .expect("interval should finish");

        assert!(matches!(
            finished,
            CycleEvent::IntervalFinished { completed: true, session_count: 1, .. }
        ));
        let guard = cycle.lock().await;
        assert!(!guard.is_running());
        assert!(guard.is_break());
        assert_eq!(guard.records().len(), 1);
    }

    #[tokio::test]
    async fn test_ticker_exits_after_pause() {
        let (cycle, _rx) = create_shared(1000);
        let mut ticker = Ticker::with_period(cycle.clone(), FAST);

        ticker.start().await;
        sleep(FAST * 3).await;
        cycle.lock().await.pause();
        let remaining = cycle.lock().await.remaining_seconds();

        sleep(FAST * 5).await;

        assert!(!task_alive(&ticker));
        assert_eq!(cycle.lock().await.remaining_seconds(), remaining);
        assert!(remaining < 1000);
    }

    #[tokio::test]
    async fn test_abort_stops_ticking() {
        let (cycle, _rx) = create_shared(1000);
        let mut ticker = Ticker::with_period(cycle.clone(), FAST);

        ticker.start().await;
        assert!(task_alive(&ticker));
        ticker.abort();
        assert!(!task_alive(&ticker));

        sleep(FAST * 3).await;
        let guard = cycle.lock().await;
        assert!(guard.is_running());
        assert_eq!(guard.remaining_seconds(), 1000);
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_task() {
        let (cycle, _rx) = create_shared(1000);
        let mut ticker = Ticker::with_period(cycle.clone(), FAST);

        ticker.start().await;
        cycle.lock().await.pause();
        ticker.start().await;

        sleep(FAST * 5 + FAST / 2).await;
        ticker.abort();

        let elapsed = 1000 - cycle.lock().await.remaining_seconds();
        assert!(elapsed <= 6, "expected a single ticker, counted {} ticks", elapsed);
    }
}
