//! Shared test infrastructure for blink-catch integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use blink_catch::{
    AudioOutput, ButtonPressEvent, DisplayOutput, GameConfig, InputSource, LedOutput,
    PeripheralError, TimeDuration, TimeInstant, TimeSource,
};
use core::cell::Cell;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }

    pub fn millis(&self) -> u64 {
        self.current_time.get().0
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock LED
// ============================================================================

/// Mock LED that records every write
pub struct MockLed {
    level: bool,
    history: heapless::Vec<bool, 128>,
    pub writes: u32,
    pub fail: bool,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            level: false,
            history: heapless::Vec::new(),
            writes: 0,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Physical level after the last successful write
    pub fn level(&self) -> bool {
        self.level
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }
}

impl LedOutput for MockLed {
    fn set_on(&mut self, on: bool) -> Result<(), PeripheralError> {
        self.writes += 1;
        let _ = self.history.push(on);
        if self.fail {
            return Err(PeripheralError::Io);
        }
        self.level = on;
        Ok(())
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Mock display that records shown scores
pub struct MockDisplay {
    shown: heapless::Vec<i32, 64>,
    pub updates: u32,
    pub clears: u32,
    pub fail: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            shown: heapless::Vec::new(),
            updates: 0,
            clears: 0,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn shown(&self) -> &[i32] {
        &self.shown
    }

    pub fn last(&self) -> Option<i32> {
        self.shown.last().copied()
    }
}

impl DisplayOutput for MockDisplay {
    fn show_score(&mut self, score: i32) -> Result<(), PeripheralError> {
        self.updates += 1;
        if self.fail {
            return Err(PeripheralError::Timeout);
        }
        let _ = self.shown.push(score);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PeripheralError> {
        self.clears += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Audio
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Play(u32),
    Stop,
}

/// Mock speaker that records every command
pub struct MockAudio {
    events: heapless::Vec<AudioEvent, 128>,
    playing: Option<u32>,
    pub fail: bool,
}

impl MockAudio {
    pub fn new() -> Self {
        Self {
            events: heapless::Vec::new(),
            playing: None,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn events(&self) -> &[AudioEvent] {
        &self.events
    }

    pub fn playing(&self) -> Option<u32> {
        self.playing
    }

    pub fn plays(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AudioEvent::Play(_)))
            .count()
    }
}

impl AudioOutput for MockAudio {
    fn play_frequency(&mut self, hz: u32) -> Result<(), PeripheralError> {
        let _ = self.events.push(AudioEvent::Play(hz));
        if self.fail {
            return Err(PeripheralError::Unavailable);
        }
        self.playing = Some(hz);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PeripheralError> {
        let _ = self.events.push(AudioEvent::Stop);
        if self.fail {
            return Err(PeripheralError::Unavailable);
        }
        self.playing = None;
        Ok(())
    }
}

// ============================================================================
// Mock Input
// ============================================================================

/// Input source holding a number of queued presses
pub struct MockInput {
    pub pending: u32,
}

impl InputSource for MockInput {
    fn next_press(&mut self) -> Option<ButtonPressEvent> {
        if self.pending == 0 {
            return None;
        }
        self.pending -= 1;
        Some(ButtonPressEvent)
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Default timing without the start-up chime
pub fn quiet_config() -> GameConfig {
    GameConfig::builder().chime(None).build().unwrap()
}

/// Random source that always draws zero: every dark period is the minimum
pub fn min_rng() -> rand::rngs::mock::StepRng {
    rand::rngs::mock::StepRng::new(0, 0)
}

/// Seeded random source
pub fn seeded_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}
