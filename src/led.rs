//! The shared LED state cell.
//!
//! Both the blink scheduler and the game controller act on the LED. They do so
//! through a single [`LedCell`] that is only reachable through `&mut`, so a
//! scheduler toggle and a press resolution can never interleave.

use crate::peripheral::{LedOutput, PeripheralError};

/// Whether the next scheduler fire must be swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Suppression {
    /// Normal operation.
    Active,
    /// The LED was forced off out of band; the next fire is a no-op.
    ForcedOffPendingAck,
}

/// Owns the LED driver together with its last commanded state.
pub struct LedCell<L: LedOutput> {
    led: L,
    on: bool,
    suppression: Suppression,
}

impl<L: LedOutput> LedCell<L> {
    /// Wraps an LED driver. No write is performed; the LED is assumed off.
    pub fn new(led: L) -> Self {
        Self {
            led,
            on: false,
            suppression: Suppression::Active,
        }
    }

    /// Commands the LED and performs exactly one physical write.
    ///
    /// The logical state follows the command even if the write fails.
    pub fn command(&mut self, on: bool) -> Result<(), PeripheralError> {
        self.on = on;
        self.led.set_on(on)
    }

    /// Forces a lit LED off and arms the suppression flag.
    ///
    /// Returns `None` without writing if the LED is already off.
    pub fn force_off(&mut self) -> Option<Result<(), PeripheralError>> {
        if !self.on {
            return None;
        }
        self.suppression = Suppression::ForcedOffPendingAck;
        Some(self.command(false))
    }

    /// Consumes a pending forced-off acknowledgement.
    pub fn take_pending_ack(&mut self) -> bool {
        let pending = self.suppression == Suppression::ForcedOffPendingAck;
        self.suppression = Suppression::Active;
        pending
    }

    /// Last commanded state.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Current suppression flag.
    pub fn suppression(&self) -> Suppression {
        self.suppression
    }

    /// Drops any pending acknowledgement. Used when the blink cycle restarts.
    pub(crate) fn reset_suppression(&mut self) {
        self.suppression = Suppression::Active;
    }

    /// Shared access to the wrapped LED driver.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Mutable access to the wrapped LED driver.
    pub fn led_mut(&mut self) -> &mut L {
        &mut self.led
    }
}
