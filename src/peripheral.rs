//! Narrow interfaces to the game's peripherals.
//!
//! The core never touches hardware directly. Implement these traits for your
//! LED pin, numeric display, speaker and button driver.

use crate::tone::ToneCategory;

/// I/O failure reported by a peripheral driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralError {
    /// The bus or pin write/read failed.
    Io,
    /// The peripheral did not respond in time.
    Timeout,
    /// The peripheral is not available (closed, unplugged, not initialized).
    Unavailable,
}

impl core::fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PeripheralError::Io => write!(f, "peripheral I/O failed"),
            PeripheralError::Timeout => write!(f, "peripheral timed out"),
            PeripheralError::Unavailable => write!(f, "peripheral unavailable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PeripheralError {}

/// Which output a fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    Led,
    Display,
    Audio,
}

/// A recorded, non-fatal peripheral failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fault {
    pub peripheral: Peripheral,
    pub error: PeripheralError,
}

impl Fault {
    /// Creates a fault record.
    pub fn new(peripheral: Peripheral, error: PeripheralError) -> Self {
        Self { peripheral, error }
    }
}

/// The indicator LED.
///
/// The core keeps the logical on/off state itself, so the driver only has to
/// drive the pin. Read-back goes through [`LedCell::is_on`](crate::LedCell::is_on).
pub trait LedOutput {
    /// Drives the LED to the given level.
    fn set_on(&mut self, on: bool) -> Result<(), PeripheralError>;
}

/// The numeric score display.
pub trait DisplayOutput {
    /// Shows a signed score.
    fn show_score(&mut self, score: i32) -> Result<(), PeripheralError>;

    /// Blanks the display. Called on shutdown.
    fn clear(&mut self) -> Result<(), PeripheralError> {
        Ok(())
    }
}

/// The tone output (buzzer / PWM speaker).
pub trait AudioOutput {
    /// Starts a tone at the given frequency, replacing any tone in progress.
    fn play_frequency(&mut self, hz: u32) -> Result<(), PeripheralError>;

    /// Silences the output. Stopping an already silent output must succeed.
    fn stop(&mut self) -> Result<(), PeripheralError>;

    /// Plays the tone for a result category.
    ///
    /// Defaults to the category's pitch; override to synthesize something richer.
    fn play_tone(&mut self, category: ToneCategory) -> Result<(), PeripheralError> {
        self.play_frequency(category.frequency_hz())
    }
}

/// A single debounced button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPressEvent;

/// Source of button press notifications.
///
/// Debouncing and edge detection are the implementor's job; every returned
/// event must correspond to exactly one physical press.
pub trait InputSource {
    /// Returns the next pending press, if any.
    fn next_press(&mut self) -> Option<ButtonPressEvent>;
}
