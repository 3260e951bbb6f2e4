//! Sound notifications for the Pomodoro timer.
//!
//! - [`SoundPlayer`]: the playback interface used by the timer session
//! - [`BellSoundPlayer`]: terminal bell, always available
//! - `RodioSoundPlayer`: sine tones via rodio (`audio` feature)
//! - [`MockSoundPlayer`]: records calls for tests
//!
//! # Usage
//!
//! ```rust,no_run
//! use toolbox::sound::{try_create_player, SoundSource};
//! use toolbox::types::IntervalKind;
//!
//! let player = try_create_player(false);
//! if let Err(e) = player.play(&SoundSource::for_finished(IntervalKind::Work)) {
//!     eprintln!("Could not play sound: {}", e);
//! }
//! ```

mod error;
mod player;
mod source;

pub use error::SoundError;
#[cfg(feature = "audio")]
pub use player::RodioSoundPlayer;
pub use player::{try_create_player, BellSoundPlayer};
pub use source::SoundSource;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a sound without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        if let Ok(mut calls) = self.play_calls.lock() {
            calls.push(*source);
        }
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}
