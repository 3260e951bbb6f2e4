//! Sound player implementations.
//!
//! [`BellSoundPlayer`] rings the terminal bell and works everywhere.
//! With the `audio` feature, `RodioSoundPlayer` plays sine tones through
//! rodio. [`try_create_player`] picks the best player that can be created.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

// ============================================================================
// BellSoundPlayer
// ============================================================================

/// Rings the terminal bell on stdout for every sound.
#[derive(Debug, Default)]
pub struct BellSoundPlayer {
    disabled: AtomicBool,
}

impl BellSoundPlayer {
    #[must_use]
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled: AtomicBool::new(disabled),
        }
    }
}

impl SoundPlayer for BellSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.is_disabled() {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }
        debug!("Ringing bell for {} sound", source.name());
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }
}

// ============================================================================
// RodioSoundPlayer
// ============================================================================

#[cfg(feature = "audio")]
pub use rodio_player::RodioSoundPlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use std::sync::atomic::{AtomicBool, Ordering};

    use rodio::source::SineWave;
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::debug;

    use super::super::error::SoundError;
    use super::super::source::SoundSource;
    use super::super::SoundPlayer;

    const TONE_VOLUME: f32 = 0.2;

    /// Plays notification tones through the default audio device.
    ///
    /// Playback is non-blocking; tones continue after `play` returns.
    pub struct RodioSoundPlayer {
        /// The audio output stream (must be kept alive for playback).
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
        disabled: AtomicBool,
    }

    impl RodioSoundPlayer {
        /// # Errors
        ///
        /// Returns `SoundError::DeviceNotAvailable` if no audio output device
        /// is available.
        pub fn new(disabled: bool) -> Result<Self, SoundError> {
            let (stream, stream_handle) = OutputStream::try_default()
                .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

            debug!("Audio output stream initialized");

            Ok(Self {
                _stream: stream,
                stream_handle,
                disabled: AtomicBool::new(disabled),
            })
        }
    }

    impl SoundPlayer for RodioSoundPlayer {
        fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
            if self.is_disabled() {
                debug!("Sound playback disabled, skipping");
                return Ok(());
            }
            let frequency = match source {
                SoundSource::Tone { frequency_hz, .. } => *frequency_hz as f32,
                SoundSource::Bell => 440.0,
            };
            let sink = Sink::try_new(&self.stream_handle)
                .map_err(|e| SoundError::StreamError(e.to_string()))?;

            sink.append(
                SineWave::new(frequency)
                    .take_duration(source.duration().max(std::time::Duration::from_millis(200)))
                    .amplify(TONE_VOLUME),
            );
            sink.detach();

            debug!("Tone playback started (detached)");
            Ok(())
        }

        fn is_disabled(&self) -> bool {
            self.disabled.load(Ordering::Relaxed)
        }
    }

    impl std::fmt::Debug for RodioSoundPlayer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RodioSoundPlayer")
                .field("disabled", &self.disabled.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }
}

// ============================================================================
// Player selection
// ============================================================================

/// Creates the best available player.
///
/// Uses rodio when built with the `audio` feature and a device is present,
/// the terminal bell otherwise.
#[must_use]
pub fn try_create_player(disabled: bool) -> Box<dyn SoundPlayer> {
    #[cfg(feature = "audio")]
    {
        match RodioSoundPlayer::new(disabled) {
            Ok(player) => return Box::new(player),
            Err(e) => tracing::warn!("Audio not available, using terminal bell: {}", e),
        }
    }
    Box::new(BellSoundPlayer::new(disabled))
}
