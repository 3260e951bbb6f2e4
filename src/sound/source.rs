//! Notification sounds.

use std::time::Duration;

use crate::types::IntervalKind;

/// A notification sound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoundSource {
    /// The terminal bell character.
    #[default]
    Bell,
    /// A sine tone, played when an audio device is available.
    Tone {
        frequency_hz: u32,
        duration_ms: u64,
    },
}

impl SoundSource {
    /// Sound for the end of a work interval.
    pub const WORK_DONE: Self = Self::Tone {
        frequency_hz: 880,
        duration_ms: 600,
    };

    /// Sound for the end of a break.
    pub const BREAK_DONE: Self = Self::Tone {
        frequency_hz: 660,
        duration_ms: 400,
    };

    /// Sound announcing that `finished` has ended.
    #[must_use]
    pub fn for_finished(finished: IntervalKind) -> Self {
        if finished.is_break() {
            Self::BREAK_DONE
        } else {
            Self::WORK_DONE
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bell => "bell",
            Self::Tone { .. } => "tone",
        }
    }

    /// Playback length; the bell has none.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self {
            Self::Bell => Duration::ZERO,
            Self::Tone { duration_ms, .. } => Duration::from_millis(*duration_ms),
        }
    }
}
