//! The reaction game: blink cycle, press handling and fault bookkeeping.
//!
//! [`ReactionGame`] owns every piece of mutable game state. Timer fires
//! ([`ReactionGame::service`]) and presses ([`ReactionGame::handle_press`]) both
//! take `&mut self`, so each runs to completion before the other can observe
//! the LED or the score.

use crate::config::GameConfig;
use crate::controller::{GameController, PressReport};
use crate::led::LedCell;
use crate::peripheral::{AudioOutput, DisplayOutput, Fault, InputSource, LedOutput, Peripheral};
use crate::scheduler::{BlinkPhase, BlinkScheduler, BlinkTransition};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use heapless::Deque;
use rand::RngCore;

/// Number of faults kept in the fault log. Older faults are dropped.
pub const FAULT_LOG_CAPACITY: usize = 8;

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameState {
    /// Created, not started. LED assumed off.
    Idle,
    /// Blink cycle running, presses are scored.
    Running,
    /// Shut down. LED off, timer cancelled.
    Stopped,
}

/// When the game needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// An animation (the start-up chime) is in progress. Service again at the
    /// configured frame interval.
    Continuous,

    /// Service again after the specified delay.
    Delay(D),
}

impl<D: TimeDuration> ServiceTiming<D> {
    /// Combines two timings into the one that needs service first.
    pub fn sooner(self, other: Self) -> Self {
        match (self, other) {
            (ServiceTiming::Delay(a), ServiceTiming::Delay(b)) => {
                if a.as_millis() <= b.as_millis() {
                    ServiceTiming::Delay(a)
                } else {
                    ServiceTiming::Delay(b)
                }
            }
            _ => ServiceTiming::Continuous,
        }
    }

    /// The concrete wait, resolving `Continuous` to `frame`.
    pub fn wait(self, frame: D) -> D {
        match self {
            ServiceTiming::Continuous => frame,
            ServiceTiming::Delay(delay) => delay,
        }
    }
}

/// Events the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameEvent {
    /// A debounced button press.
    ButtonPress,
    /// A timer wake-up.
    Tick,
    /// Tear the game down.
    Shutdown,
}

/// Errors that can occur during game operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: GameState,
    },
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but game is {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// A single-player "catch the LED" reaction game.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `L` - LED implementation type
/// * `D` - Display implementation type
/// * `A` - Audio implementation type
/// * `R` - Random source for blink timing
pub struct ReactionGame<'t, I, T, L, D, A, R>
where
    I: TimeInstant,
    T: TimeSource<I>,
    L: LedOutput,
    D: DisplayOutput,
    A: AudioOutput,
    R: RngCore,
{
    time_source: &'t T,
    config: GameConfig,
    state: GameState,
    led: LedCell<L>,
    scheduler: BlinkScheduler<I, R>,
    controller: GameController<I, D, A>,
    faults: Deque<Fault, FAULT_LOG_CAPACITY>,
    fault_count: u32,
}

impl<'t, I, T, L, D, A, R> ReactionGame<'t, I, T, L, D, A, R>
where
    I: TimeInstant,
    T: TimeSource<I>,
    L: LedOutput,
    D: DisplayOutput,
    A: AudioOutput,
    R: RngCore,
{
    /// Creates an idle game. Nothing is written to the peripherals until
    /// [`start`](Self::start).
    pub fn new(
        led: L,
        display: D,
        audio: A,
        rng: R,
        time_source: &'t T,
        config: GameConfig,
    ) -> Self {
        Self {
            time_source,
            config,
            state: GameState::Idle,
            led: LedCell::new(led),
            scheduler: BlinkScheduler::new(&config, rng),
            controller: GameController::new(display, audio, &config),
            faults: Deque::new(),
            fault_count: 0,
        }
    }

    /// Starts the game: shows a score of zero, drives the LED low, arms the
    /// blink cycle and schedules the start-up chime.
    ///
    /// Must be called from `Idle` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, GameError> {
        if self.state != GameState::Idle {
            return Err(GameError::InvalidState {
                expected: "Idle",
                actual: self.state,
            });
        }

        let now = self.time_source.now();
        info!("game: start");

        if let Err(error) = self.controller.refresh_display() {
            self.record_fault(Fault::new(Peripheral::Display, error));
        }
        let transition = self.scheduler.start(&mut self.led, now);
        self.record_transition(&transition);
        self.controller.schedule_chime(now);

        self.state = GameState::Running;
        Ok(self.next_timing(now))
    }

    /// Services the blink cycle and the audio side.
    ///
    /// Must be called from `Running` state.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Continuous)` - chime playing, service at the frame interval
    /// - `Ok(ServiceTiming::Delay(duration))` - service after this delay
    /// - `Err` - Invalid state
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, GameError> {
        self.require_running()?;

        let now = self.time_source.now();

        if let Some(transition) = self.scheduler.service(&mut self.led, now) {
            self.record_transition(&transition);
        }
        if let Some(Err(error)) = self.controller.service(now) {
            self.record_fault(Fault::new(Peripheral::Audio, error));
        }

        Ok(self.next_timing(now))
    }

    /// Resolves a button press against the LED.
    ///
    /// The press is resolved before any overdue blink fire, so a press that
    /// races the end of the lit phase counts as a catch.
    ///
    /// Must be called from `Running` state.
    pub fn handle_press(&mut self) -> Result<PressReport, GameError> {
        self.require_running()?;

        let now = self.time_source.now();
        let report = self.controller.handle_press(&mut self.led, now);
        for fault in report.faults() {
            self.record_fault(fault);
        }

        Ok(report)
    }

    /// Drains pending presses from an input source.
    ///
    /// Returns the number of presses handled.
    pub fn poll_input<S: InputSource>(&mut self, input: &mut S) -> Result<u32, GameError> {
        self.require_running()?;

        let mut handled: u32 = 0;
        while input.next_press().is_some() {
            self.handle_press()?;
            handled = handled.saturating_add(1);
        }
        Ok(handled)
    }

    /// Dispatches a game event.
    ///
    /// # Returns
    /// * `Ok(Some(timing))` - when to service next
    /// * `Ok(None)` - the game was shut down
    /// * `Err` - operation failed (invalid state)
    pub fn handle_event(
        &mut self,
        event: GameEvent,
    ) -> Result<Option<ServiceTiming<I::Duration>>, GameError> {
        match event {
            GameEvent::ButtonPress => {
                self.handle_press()?;
                self.service().map(Some)
            }
            GameEvent::Tick => self.service().map(Some),
            GameEvent::Shutdown => {
                self.shutdown();
                Ok(None)
            }
        }
    }

    /// Cancels the blink timer, turns the LED off, silences the speaker and
    /// blanks the display.
    ///
    /// Can be called from any state. Calling it again is harmless.
    pub fn shutdown(&mut self) {
        if self.state == GameState::Stopped {
            return;
        }
        info!("game: shutdown, final score {}", self.controller.score());

        self.scheduler.stop();
        if let Err(error) = self.led.command(false) {
            self.record_fault(Fault::new(Peripheral::Led, error));
        }
        self.led.reset_suppression();
        if let Err(error) = self.controller.silence() {
            self.record_fault(Fault::new(Peripheral::Audio, error));
        }
        if let Err(error) = self.controller.clear_display() {
            self.record_fault(Fault::new(Peripheral::Display, error));
        }

        self.state = GameState::Stopped;
    }

    /// Returns the current state of the game.
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> i32 {
        self.controller.score()
    }

    /// Last commanded LED state.
    pub fn is_led_on(&self) -> bool {
        self.led.is_on()
    }

    /// The blink phase the game believes the LED is in.
    pub fn phase(&self) -> BlinkPhase {
        if self.led.is_on() {
            BlinkPhase::On
        } else {
            BlinkPhase::Off
        }
    }

    /// Time until the next blink fire, `None` unless running.
    pub fn time_until_blink(&self) -> Option<I::Duration> {
        self.scheduler.time_until_fire(self.time_source.now())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Recent faults, oldest first.
    pub fn faults(&self) -> impl Iterator<Item = &Fault> {
        self.faults.iter()
    }

    /// Removes and returns the oldest recorded fault.
    pub fn take_fault(&mut self) -> Option<Fault> {
        self.faults.pop_front()
    }

    /// Total faults since creation, including ones dropped from the log.
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    /// Shared access to the LED driver.
    pub fn led(&self) -> &L {
        self.led.led()
    }

    /// Shared access to the display driver.
    pub fn display(&self) -> &D {
        self.controller.display()
    }

    /// Shared access to the audio driver.
    pub fn audio(&self) -> &A {
        self.controller.audio()
    }

    /// Mutable access to the LED driver.
    pub fn led_mut(&mut self) -> &mut L {
        self.led.led_mut()
    }

    /// Mutable access to the display driver.
    pub fn display_mut(&mut self) -> &mut D {
        self.controller.display_mut()
    }

    /// Mutable access to the audio driver.
    pub fn audio_mut(&mut self) -> &mut A {
        self.controller.audio_mut()
    }

    fn require_running(&self) -> Result<(), GameError> {
        if self.state != GameState::Running {
            return Err(GameError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        }
        Ok(())
    }

    fn next_timing(&self, now: I) -> ServiceTiming<I::Duration> {
        let blink = self
            .scheduler
            .time_until_fire(now)
            .map(ServiceTiming::Delay);
        let audio = self.controller.next_service(now);
        let frame = self.config.frame_interval_ms();

        match (blink, audio) {
            // A blink fire due within the frame must not wait for it
            (Some(ServiceTiming::Delay(d)), Some(ServiceTiming::Continuous))
                if d.as_millis() < frame =>
            {
                ServiceTiming::Delay(d)
            }
            (Some(a), Some(b)) => a.sooner(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => ServiceTiming::Delay(I::Duration::from_millis(frame)),
        }
    }

    fn record_transition(&mut self, transition: &BlinkTransition<I::Duration>) {
        if let Some(Err(error)) = transition.write {
            self.record_fault(Fault::new(Peripheral::Led, error));
        }
    }

    fn record_fault(&mut self, fault: Fault) {
        warn!("fault: {} {}", fault.peripheral, fault.error);

        if self.faults.is_full() {
            self.faults.pop_front();
        }
        let _ = self.faults.push_back(fault);
        self.fault_count = self.fault_count.saturating_add(1);
    }
}
