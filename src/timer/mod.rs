//! Pomodoro timer.
//!
//! - `engine`: countdown state machine
//! - `cycle`: work/break policy layered on the engine
//! - `ticker`: background ticking task
//! - `clock`: timestamp sources for session records

pub mod clock;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cycle::{CycleEvent, PomodoroCycle};
pub use engine::{Completion, CountdownEngine, CountdownEvent};
pub use error::TimerError;
pub use ticker::{spawn_ticker, SharedCycle, Ticker, TICK_PERIOD};
