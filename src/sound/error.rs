//! Sound system error types.
//!
//! Sound failures never stop the timer; callers log them and carry on.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Writing the terminal bell failed.
    #[error("failed to ring terminal bell: {0}")]
    Terminal(#[from] std::io::Error),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio device or run with --no-sound",
            Self::StreamError(_) => "check the system audio settings",
            Self::Terminal(_) => "run the timer in an interactive terminal",
            Self::PlaybackError(_) => "run with --no-sound to silence notifications",
        }
    }
}
