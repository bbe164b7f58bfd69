use std::{io, path::PathBuf, time::Duration};

use crate::fix::FixState;

/// Indicator that can be switched on for a short period.
pub trait FeedbackSink {
    /// Switch the indicator on for `duration`, then off again.
    async fn pulse(&mut self, duration: Duration) -> io::Result<()>;
}

/// Sink for setups without an indicator.
#[derive(Debug, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    async fn pulse(&mut self, _duration: Duration) -> io::Result<()> {
        Ok(())
    }
}

/// LED exposed through the kernel LED class.
///
/// Points at the `brightness` attribute, for example
/// `/sys/class/leds/ACT/brightness` on a Raspberry Pi.
#[derive(Debug)]
pub struct LedSink {
    path: PathBuf,
}

impl LedSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedbackSink for LedSink {
    async fn pulse(&mut self, duration: Duration) -> io::Result<()> {
        tokio::fs::write(&self.path, b"1").await?;
        tokio::time::sleep(duration).await;
        tokio::fs::write(&self.path, b"0").await
    }
}

/// Timing of the blink patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    /// Time the indicator is lit per pulse.
    pub pulse: Duration,
    /// Pause between the pulses of a double blink.
    pub gap: Duration,
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(10),
            gap: Duration::from_millis(90),
        }
    }
}

/// Blink pattern signalling the fix quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPattern {
    /// No time, no position.
    Dark,
    /// Time known, position invalid.
    Double,
    /// Position valid.
    Single,
}

impl From<FixState> for BlinkPattern {
    fn from(state: FixState) -> Self {
        if state.position_valid {
            Self::Single
        } else if state.time_valid {
            Self::Double
        } else {
            Self::Dark
        }
    }
}

impl BlinkPattern {
    /// Play the pattern on the sink.
    pub async fn play<S: FeedbackSink>(self, sink: &mut S, timing: &BlinkTiming) -> io::Result<()> {
        match self {
            Self::Dark => Ok(()),
            Self::Single => sink.pulse(timing.pulse).await,
            Self::Double => {
                sink.pulse(timing.pulse).await?;
                tokio::time::sleep(timing.gap).await;
                sink.pulse(timing.pulse).await
            }
        }
    }
}
