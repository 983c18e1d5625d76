//! Integration tests for the async game loop

mod common;
use common::*;

use blink_catch::{GameSignals, GameState, ReactionGame, run};
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex, RawMutex};
use embedded_hal_async::delay::DelayNs;

const QUEUE_DEPTH: usize = 4;

type Signals<M> = GameSignals<M, QUEUE_DEPTH>;

/// Delay that advances the mock clock instantly and can inject signals.
struct ScriptedDelay<'a, M: RawMutex> {
    timer: &'a MockTimeSource,
    signals: &'a Signals<M>,
    calls: u32,
    press_on_call: Option<u32>,
    presses_per_call: u32,
    shutdown_on_call: u32,
    waits: heapless::Vec<u32, 64>,
}

impl<'a, M: RawMutex> ScriptedDelay<'a, M> {
    fn new(timer: &'a MockTimeSource, signals: &'a Signals<M>, shutdown_on_call: u32) -> Self {
        Self {
            timer,
            signals,
            calls: 0,
            press_on_call: None,
            presses_per_call: 1,
            shutdown_on_call,
            waits: heapless::Vec::new(),
        }
    }
}

impl<M: RawMutex> DelayNs for ScriptedDelay<'_, M> {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        let _ = self.waits.push(ms);
        if self.press_on_call == Some(self.calls) {
            for _ in 0..self.presses_per_call {
                assert!(self.signals.press());
            }
        }
        if self.calls == self.shutdown_on_call {
            self.signals.request_shutdown();
        }
        self.timer.advance(ms as u64);
    }
}

#[test]
fn run_catches_press_and_shuts_down() {
    let timer = MockTimeSource::new();
    let signals = Signals::<NoopRawMutex>::new();
    let mut game = ReactionGame::new(
        MockLed::new(),
        MockDisplay::new(),
        MockAudio::new(),
        min_rng(),
        &timer,
        quiet_config(),
    );

    // Press while the LED is lit, shut down two wakes later
    let mut delay = ScriptedDelay::new(&timer, &signals, 4);
    delay.press_on_call = Some(2);

    block_on(run(&mut game, &mut delay, &signals)).unwrap();

    assert_eq!(game.state(), GameState::Stopped);
    assert_eq!(game.score(), 1);
    assert_eq!(delay.waits.as_slice(), &[200, 500, 50, 150]);
    assert_eq!(game.led().history(), &[false, true, false, false]);
    assert_eq!(game.display().shown(), &[0, 1]);
    assert_eq!(
        game.audio().events(),
        &[AudioEvent::Play(8000), AudioEvent::Stop, AudioEvent::Stop]
    );
    assert_eq!(timer.millis(), 900);
}

#[test]
fn pending_shutdown_wins_over_pending_press() {
    let timer = MockTimeSource::new();
    let signals = Signals::<NoopRawMutex>::new();
    let mut game = ReactionGame::new(
        MockLed::new(),
        MockDisplay::new(),
        MockAudio::new(),
        min_rng(),
        &timer,
        quiet_config(),
    );
    signals.press();
    signals.request_shutdown();

    let mut delay = ScriptedDelay::new(&timer, &signals, u32::MAX);
    block_on(run(&mut game, &mut delay, &signals)).unwrap();

    assert_eq!(game.state(), GameState::Stopped);
    assert_eq!(game.score(), 0);
    assert_eq!(delay.calls, 0);
    assert_eq!(game.led().history(), &[false, false]);
}

#[test]
fn long_run_keeps_blinking_and_ends_dark() {
    let timer = MockTimeSource::new();
    let signals = Signals::<NoopRawMutex>::new();
    let mut game = ReactionGame::new(
        MockLed::new(),
        MockDisplay::new(),
        MockAudio::new(),
        seeded_rng(3),
        &timer,
        blink_catch::GameConfig::default(),
    );

    let mut delay = ScriptedDelay::new(&timer, &signals, 60);
    block_on(run(&mut game, &mut delay, &signals)).unwrap();

    let history = game.led().history();
    assert!(history.iter().filter(|on| **on).count() >= 2);
    assert_eq!(history.last(), Some(&false));
    assert!(!game.is_led_on());
    assert_eq!(game.score(), 0);
    // The chime played before shutdown
    assert!(game.audio().events().contains(&AudioEvent::Play(440)));
}

#[test]
fn back_to_back_presses_are_all_scored() {
    let timer = MockTimeSource::new();
    let signals = Signals::<CriticalSectionRawMutex>::new();
    let mut game = ReactionGame::new(
        MockLed::new(),
        MockDisplay::new(),
        MockAudio::new(),
        min_rng(),
        &timer,
        quiet_config(),
    );

    // Two presses land while the LED is still dark
    let mut delay = ScriptedDelay::new(&timer, &signals, 2);
    delay.press_on_call = Some(1);
    delay.presses_per_call = 2;

    block_on(run(&mut game, &mut delay, &signals)).unwrap();

    assert_eq!(game.score(), -2);
    assert_eq!(game.display().shown(), &[0, -1, -2]);
    assert_eq!(game.audio().plays(), 2);
    assert_eq!(game.state(), GameState::Stopped);
}

#[test]
fn full_press_queue_drops_extra_presses() {
    let signals = Signals::<NoopRawMutex>::new();

    for _ in 0..QUEUE_DEPTH {
        assert!(signals.press());
    }
    assert!(!signals.press());
}
