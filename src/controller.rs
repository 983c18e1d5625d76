//! Press resolution, scoring and audio feedback.
//!
//! [`GameController`] owns the score together with the display and speaker. Each
//! press is resolved against the LED's commanded state, and produces exactly one
//! display update and one tone request. Peripheral failures are reported back in
//! the [`PressReport`] and never undo the score change.

use crate::config::GameConfig;
use crate::game::ServiceTiming;
use crate::led::LedCell;
use crate::peripheral::{AudioOutput, DisplayOutput, Fault, LedOutput, Peripheral, PeripheralError};
use crate::time::{TimeInstant, deadline_after, remaining_until};
use crate::tone::{Chime, ToneCategory};

/// How a press was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// The LED was lit.
    Catch,
    /// The LED was dark.
    Miss,
}

impl PressOutcome {
    /// The tone played for this outcome.
    pub fn tone(self) -> ToneCategory {
        match self {
            PressOutcome::Catch => ToneCategory::Success,
            PressOutcome::Miss => ToneCategory::Failure,
        }
    }
}

/// Everything a single press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressReport {
    pub outcome: PressOutcome,
    /// Score after the press.
    pub score: i32,
    /// Result of forcing the LED off, `None` on a miss.
    pub led_write: Option<Result<(), PeripheralError>>,
    pub display: Result<(), PeripheralError>,
    pub tone: Result<(), PeripheralError>,
}

impl PressReport {
    /// Failures that occurred while handling the press.
    pub fn faults(&self) -> impl Iterator<Item = Fault> {
        let led = match self.led_write {
            Some(Err(error)) => Some(Fault::new(Peripheral::Led, error)),
            _ => None,
        };
        let display = self.display.err().map(|e| Fault::new(Peripheral::Display, e));
        let tone = self.tone.err().map(|e| Fault::new(Peripheral::Audio, e));

        led.into_iter().chain(display).chain(tone)
    }
}

/// Start-up chime progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChimeState<I> {
    Idle,
    Waiting { start_at: I },
    Playing { started: I, last_hz: Option<u32> },
}

/// Resolves presses and drives the score display and speaker.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `D` - Display implementation type
/// * `A` - Audio implementation type
pub struct GameController<I: TimeInstant, D: DisplayOutput, A: AudioOutput> {
    display: D,
    audio: A,
    score: i32,
    tone_hold_ms: u64,
    tone_stop_at: Option<I>,
    chime: Option<Chime>,
    chime_ready_ms: u64,
    chime_state: ChimeState<I>,
}

impl<I: TimeInstant, D: DisplayOutput, A: AudioOutput> GameController<I, D, A> {
    /// Creates a controller with a score of zero. No output is written.
    pub fn new(display: D, audio: A, config: &GameConfig) -> Self {
        let chime_config = config.chime();

        Self {
            display,
            audio,
            score: 0,
            tone_hold_ms: config.tone_hold_ms(),
            tone_stop_at: None,
            chime: chime_config.as_ref().map(Chime::new),
            chime_ready_ms: chime_config.map_or(0, |c| c.ready_delay_ms),
            chime_state: ChimeState::Idle,
        }
    }

    /// Resolves a press against the LED's current state.
    ///
    /// On a catch the LED is forced off, which makes the blink scheduler
    /// swallow its next pending fire.
    pub fn handle_press<L: LedOutput>(&mut self, led: &mut LedCell<L>, now: I) -> PressReport {
        let (outcome, led_write) = if led.is_on() {
            self.score = self.score.saturating_add(1);
            (PressOutcome::Catch, led.force_off())
        } else {
            self.score = self.score.saturating_sub(1);
            (PressOutcome::Miss, None)
        };
        info!("press: {} -> score {}", outcome, self.score);

        // The press tone takes the speaker over from the chime
        self.chime_state = ChimeState::Idle;

        let display = self.display.show_score(self.score);
        let tone = self.audio.play_tone(outcome.tone());
        self.tone_stop_at = Some(deadline_after(now, self.tone_hold_ms));

        PressReport {
            outcome,
            score: self.score,
            led_write,
            display,
            tone,
        }
    }

    /// Writes the current score to the display.
    pub fn refresh_display(&mut self) -> Result<(), PeripheralError> {
        self.display.show_score(self.score)
    }

    /// Schedules the start-up chime after the speaker-ready delay.
    ///
    /// Does nothing if the chime is disabled.
    pub fn schedule_chime(&mut self, now: I) {
        if self.chime.is_some() {
            self.chime_state = ChimeState::Waiting {
                start_at: deadline_after(now, self.chime_ready_ms),
            };
        }
    }

    /// Stops a due tone and advances the chime.
    ///
    /// Returns the result of the audio command issued, if any.
    pub fn service(&mut self, now: I) -> Option<Result<(), PeripheralError>> {
        if let Some(stop_at) = self.tone_stop_at {
            if stop_at <= now {
                self.tone_stop_at = None;
                trace!("tone: stop");
                return Some(self.audio.stop());
            }
        }

        self.service_chime(now)
    }

    fn service_chime(&mut self, now: I) -> Option<Result<(), PeripheralError>> {
        let chime = self.chime?;

        match self.chime_state {
            ChimeState::Idle => None,
            ChimeState::Waiting { start_at } if start_at <= now => {
                self.chime_state = ChimeState::Playing {
                    started: now,
                    last_hz: None,
                };
                self.service_chime(now)
            }
            ChimeState::Waiting { .. } => None,
            ChimeState::Playing { started, last_hz } => {
                match chime.frequency_at(now.duration_since(started)) {
                    Some(hz) if last_hz == Some(hz) => None,
                    Some(hz) => {
                        self.chime_state = ChimeState::Playing {
                            started,
                            last_hz: Some(hz),
                        };
                        Some(self.audio.play_frequency(hz))
                    }
                    None => {
                        self.chime_state = ChimeState::Idle;
                        debug!("chime: done");
                        Some(self.audio.stop())
                    }
                }
            }
        }
    }

    /// When the audio side next needs servicing, `None` if it is idle.
    pub fn next_service(&self, now: I) -> Option<ServiceTiming<I::Duration>> {
        let chime = match self.chime_state {
            ChimeState::Idle => None,
            ChimeState::Waiting { start_at } => {
                Some(ServiceTiming::Delay(remaining_until(now, start_at)))
            }
            ChimeState::Playing { .. } => Some(ServiceTiming::Continuous),
        };
        let stop = self
            .tone_stop_at
            .map(|stop_at| ServiceTiming::Delay(remaining_until(now, stop_at)));

        match (chime, stop) {
            (Some(a), Some(b)) => Some(a.sooner(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancels pending audio and silences the speaker.
    pub fn silence(&mut self) -> Result<(), PeripheralError> {
        self.tone_stop_at = None;
        self.chime_state = ChimeState::Idle;
        self.audio.stop()
    }

    /// Blanks the display.
    pub fn clear_display(&mut self) -> Result<(), PeripheralError> {
        self.display.clear()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Returns true while the start-up chime is waiting or playing.
    pub fn is_chiming(&self) -> bool {
        self.chime_state != ChimeState::Idle
    }

    /// Shared access to the display driver.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Shared access to the audio driver.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Mutable access to the display driver.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Mutable access to the audio driver.
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
