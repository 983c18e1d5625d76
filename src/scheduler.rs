//! Self-rescheduling blink cycle.
//!
//! Provides [`BlinkScheduler`], which toggles the LED through an `Off -> On -> Off`
//! cycle. The lit phase has a fixed length; the dark phase is randomized. The
//! scheduler is deadline-based: call [`BlinkScheduler::service`] whenever the
//! delay it reported has elapsed.

use crate::config::GameConfig;
use crate::led::LedCell;
use crate::peripheral::{LedOutput, PeripheralError};
use crate::time::{TimeDuration, TimeInstant, deadline_after, remaining_until};
use rand::{Rng, RngCore};

/// The logical phase of the blink cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    On,
    Off,
}

impl BlinkPhase {
    fn from_level(on: bool) -> Self {
        if on { BlinkPhase::On } else { BlinkPhase::Off }
    }
}

/// What a single scheduler fire did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionKind {
    /// A normal transition into the given phase.
    Entered(BlinkPhase),
    /// A forced-off was acknowledged; the LED was already dark and stays so.
    SuppressedAck,
}

/// Report of a scheduler fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTransition<D> {
    pub kind: TransitionKind,
    /// Result of the physical write, `None` if no write was needed.
    pub write: Option<Result<(), PeripheralError>>,
    /// Delay until the next fire.
    pub next_delay: D,
}

impl<D> BlinkTransition<D> {
    /// The phase the LED is in after this fire.
    pub fn phase(&self) -> BlinkPhase {
        match self.kind {
            TransitionKind::Entered(phase) => phase,
            TransitionKind::SuppressedAck => BlinkPhase::Off,
        }
    }
}

/// Drives the LED's on/off cycle with phase-dependent delays.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `R` - Random source for the dark-phase delay
pub struct BlinkScheduler<I: TimeInstant, R: RngCore> {
    rng: R,
    on_duration_ms: u64,
    off_min_ms: u64,
    off_span_ms: u64,
    deadline: Option<I>,
}

impl<I: TimeInstant, R: RngCore> BlinkScheduler<I, R> {
    /// Creates a stopped scheduler.
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            rng,
            on_duration_ms: config.on_duration_ms(),
            off_min_ms: config.off_min_ms(),
            off_span_ms: config.off_span_ms(),
            deadline: None,
        }
    }

    /// Drives the LED low and arms the first `Off -> On` delay.
    pub fn start<L: LedOutput>(&mut self, led: &mut LedCell<L>, now: I) -> BlinkTransition<I::Duration> {
        led.reset_suppression();
        let write = led.command(false);
        self.arm(BlinkPhase::Off, now, TransitionKind::Entered(BlinkPhase::Off), Some(write))
    }

    /// Fires if the pending deadline has passed.
    pub fn service<L: LedOutput>(
        &mut self,
        led: &mut LedCell<L>,
        now: I,
    ) -> Option<BlinkTransition<I::Duration>> {
        match self.deadline {
            Some(deadline) if deadline <= now => Some(self.fire(led, now)),
            _ => None,
        }
    }

    /// Performs one transition immediately and rearms.
    ///
    /// A pending forced-off acknowledgement is consumed instead of toggling:
    /// the LED stays dark and the dark-phase delay is armed.
    pub fn fire<L: LedOutput>(&mut self, led: &mut LedCell<L>, now: I) -> BlinkTransition<I::Duration> {
        if led.take_pending_ack() {
            trace!("blink: forced-off acknowledged");
            return self.arm(BlinkPhase::Off, now, TransitionKind::SuppressedAck, None);
        }

        let phase = BlinkPhase::from_level(!led.is_on());
        let write = led.command(phase == BlinkPhase::On);
        self.arm(phase, now, TransitionKind::Entered(phase), Some(write))
    }

    /// Cancels the pending fire.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time until the next fire, `None` if stopped.
    pub fn time_until_fire(&self, now: I) -> Option<I::Duration> {
        self.deadline.map(|deadline| remaining_until(now, deadline))
    }

    pub fn deadline(&self) -> Option<I> {
        self.deadline
    }

    /// Draws the delay for the phase just entered.
    fn delay_for(&mut self, phase: BlinkPhase) -> u64 {
        match phase {
            BlinkPhase::On => self.on_duration_ms,
            BlinkPhase::Off => self
                .off_min_ms
                .saturating_add(self.rng.gen_range(0..self.off_span_ms)),
        }
    }

    fn arm(
        &mut self,
        phase: BlinkPhase,
        now: I,
        kind: TransitionKind,
        write: Option<Result<(), PeripheralError>>,
    ) -> BlinkTransition<I::Duration> {
        let delay_ms = self.delay_for(phase);
        self.deadline = Some(deadline_after(now, delay_ms));
        debug!("blink: {} for {} ms", phase, delay_ms);

        BlinkTransition {
            kind,
            write,
            next_delay: I::Duration::from_millis(delay_ms),
        }
    }
}
