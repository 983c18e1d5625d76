//! Tone selection and the start-up chime.

use crate::config::ChimeConfig;
use crate::time::TimeDuration;

/// Result category of a press, mapped to a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneCategory {
    /// The LED was caught.
    Success,
    /// The press missed.
    Failure,
}

impl ToneCategory {
    /// Default pitch for the category.
    pub const fn frequency_hz(self) -> u32 {
        match self {
            ToneCategory::Success => 8000,
            ToneCategory::Failure => 700,
        }
    }
}

/// A repeated linear frequency sweep.
///
/// The sweep runs from `from_hz` to `to_hz` over `sweep_ms`, then jumps back
/// and repeats until `sweeps` passes have played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chime {
    from_hz: u32,
    to_hz: u32,
    sweep_ms: u64,
    sweeps: u32,
}

impl Chime {
    pub fn new(config: &ChimeConfig) -> Self {
        Self {
            from_hz: config.from_hz,
            to_hz: config.to_hz,
            sweep_ms: config.sweep_ms,
            sweeps: config.sweeps,
        }
    }

    /// Total playing time.
    pub fn total_duration<D: TimeDuration>(&self) -> D {
        D::from_millis(self.sweep_ms.saturating_mul(self.sweeps as u64))
    }

    /// Frequency at `elapsed` since the chime began, `None` once finished.
    pub fn frequency_at<D: TimeDuration>(&self, elapsed: D) -> Option<u32> {
        if self.sweep_ms == 0 {
            return None;
        }

        let elapsed_ms = elapsed.as_millis();
        if elapsed_ms >= self.total_duration::<D>().as_millis() {
            return None;
        }

        let in_sweep = elapsed_ms % self.sweep_ms;
        let progress = (in_sweep as f32) / (self.sweep_ms as f32);
        let from = self.from_hz as f32;
        let to = self.to_hz as f32;

        Some((from + (to - from) * progress) as u32)
    }
}
