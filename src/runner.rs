//! Async event loop for a [`ReactionGame`].
//!
//! The loop services the game, then waits for whichever comes first: the
//! service delay, a button press, or a shutdown request. Presses are queued in
//! a bounded [`Channel`] so none are lost between wakes; shutdown arrives
//! through a [`Signal`]. The button task and the game never share state
//! directly.

use crate::game::{GameError, GameState, ReactionGame};
use crate::peripheral::{AudioOutput, ButtonPressEvent, DisplayOutput, LedOutput};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use embassy_futures::select::{Either3, select3};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use rand::RngCore;

/// Queues feeding a running game.
///
/// `N` is the number of presses that can be buffered while the game task is
/// busy. Presses beyond that are dropped by [`press`](Self::press).
pub struct GameSignals<M: RawMutex, const N: usize> {
    /// Debounced presses from the input task, in order.
    pub presses: Channel<M, ButtonPressEvent, N>,
    /// Cancellation token. Signalling it ends [`run`].
    pub shutdown: Signal<M, ()>,
}

impl<M: RawMutex, const N: usize> GameSignals<M, N> {
    pub const fn new() -> Self {
        Self {
            presses: Channel::new(),
            shutdown: Signal::new(),
        }
    }

    /// Queues a button press for the game.
    ///
    /// Returns false if the queue is full and the press was dropped.
    pub fn press(&self) -> bool {
        match self.presses.try_send(ButtonPressEvent) {
            Ok(()) => true,
            Err(_) => {
                warn!("runner: press queue full, press dropped");
                false
            }
        }
    }

    /// Asks the game loop to shut down.
    pub fn request_shutdown(&self) {
        self.shutdown.signal(());
    }
}

impl<M: RawMutex, const N: usize> Default for GameSignals<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the game until shutdown is signalled.
///
/// Starts the game if it is still idle. On return the game is `Stopped`: the
/// blink timer is cancelled and the LED is off. A shutdown that is already
/// pending takes priority over pending presses; otherwise every queued press
/// is handled, one at a time, in arrival order.
pub async fn run<I, T, L, D, A, R, M, Y, const N: usize>(
    game: &mut ReactionGame<'_, I, T, L, D, A, R>,
    delay: &mut Y,
    signals: &GameSignals<M, N>,
) -> Result<(), GameError>
where
    I: TimeInstant,
    T: TimeSource<I>,
    L: LedOutput,
    D: DisplayOutput,
    A: AudioOutput,
    R: RngCore,
    M: RawMutex,
    Y: DelayNs,
{
    if game.state() == GameState::Idle {
        game.start()?;
    }
    let frame = I::Duration::from_millis(game.config().frame_interval_ms());

    loop {
        if signals.shutdown.try_take().is_some() {
            break;
        }
        while signals.presses.try_receive().is_ok() {
            game.handle_press()?;
        }

        let wait = game.service()?.wait(frame);
        let wait_ms = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX);

        match select3(
            delay.delay_ms(wait_ms),
            signals.presses.receive(),
            signals.shutdown.wait(),
        )
        .await
        {
            Either3::First(()) => {}
            Either3::Second(ButtonPressEvent) => {
                game.handle_press()?;
            }
            Either3::Third(()) => break,
        }
    }

    game.shutdown();
    Ok(())
}
