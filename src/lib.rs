#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ReactionGame`**: Owns the game state and serializes timer fires and button presses
//! - **`BlinkScheduler`**: Toggles the LED, 500 ms lit and a random 200-2500 ms dark
//! - **`GameController`**: Resolves presses, keeps the score, drives display and speaker
//! - **`LedCell`**: The LED's commanded state plus the forced-off suppression flag
//! - **`LedOutput` / `DisplayOutput` / `AudioOutput` / `InputSource`**: Traits to implement for your hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`GameConfig`**: Validated timing configuration
//! - **`run`**: Async loop driving a game from press and shutdown signals
//!
//! Peripheral failures never stop the game. They are logged, collected as
//! [`Fault`]s and otherwise ignored.

#[macro_use]
mod fmt;

pub mod time;
pub mod config;
pub mod peripheral;
pub mod led;
pub mod scheduler;
pub mod tone;
pub mod controller;
pub mod game;
pub mod runner;

pub use config::{ChimeConfig, ConfigError, GameConfig, GameConfigBuilder};
pub use controller::{GameController, PressOutcome, PressReport};
pub use game::{FAULT_LOG_CAPACITY, GameError, GameEvent, GameState, ReactionGame, ServiceTiming};
pub use led::{LedCell, Suppression};
pub use peripheral::{
    AudioOutput, ButtonPressEvent, DisplayOutput, Fault, InputSource, LedOutput, Peripheral,
    PeripheralError,
};
pub use runner::{GameSignals, run};
pub use scheduler::{BlinkPhase, BlinkScheduler, BlinkTransition, TransitionKind};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use tone::{Chime, ToneCategory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_compile() {
        let _ = BlinkPhase::On;
        let _ = BlinkPhase::Off;
        let _ = ToneCategory::Success;
        let _ = GameEvent::Shutdown;
    }
}
