// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the status indicator state machine.

use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use uf2boot_core::indicator::{
    Indicator, IndicatorMode, ACTIVITY_LIT_TAIL, ACTIVITY_WINDOW, INITIAL_THRESHOLD,
    THRESHOLD_MAX, THRESHOLD_MIN,
};

/// Tick until the start of the next 256-tick period.
fn tick_to_period_start(ind: &Indicator) {
    loop {
        ind.tick();
        if ind.now() & 0xff == 0 {
            return;
        }
    }
}

fn thresholds(ind: &Indicator, periods: usize) -> Vec<u8> {
    (0..periods)
        .map(|_| {
            tick_to_period_start(ind);
            ind.threshold()
        })
        .collect()
}

#[derive(Default)]
struct FakePin {
    high: bool,
    writes: usize,
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

// =============================================================================
// initial state tests
// =============================================================================

#[test]
fn test_new_indicator_is_lit_and_breathing() {
    let ind = Indicator::new();
    assert!(ind.is_lit());
    assert!(!ind.is_animating());
    assert_eq!(ind.mode(), IndicatorMode::IdleBreathing);
    assert_eq!(ind.threshold(), INITIAL_THRESHOLD);
    assert_eq!(ind.step(), 1);
}

#[test]
fn test_first_tick_marks_animation_active() {
    let ind = Indicator::new();
    ind.tick();
    assert!(ind.is_animating());
    assert_eq!(ind.now(), 1);
}

// =============================================================================
// breathing tests
// =============================================================================

#[test]
fn test_led_on_at_period_start_and_off_at_threshold() {
    let ind = Indicator::new();
    tick_to_period_start(&ind);
    assert!(ind.is_lit());
    let threshold = ind.threshold() as u32;

    for _ in 1..threshold {
        ind.tick();
        assert!(ind.is_lit());
    }
    ind.tick();
    assert_eq!(ind.now() & 0xff, threshold);
    assert!(!ind.is_lit());
}

#[test]
fn test_led_stays_off_until_next_period() {
    let ind = Indicator::new();
    tick_to_period_start(&ind);
    while ind.is_lit() {
        ind.tick();
    }
    while ind.now() & 0xff != 0xff {
        ind.tick();
        assert!(!ind.is_lit());
    }
    ind.tick();
    assert!(ind.is_lit());
}

#[test]
fn test_threshold_bounces_between_bounds() {
    let ind = Indicator::new();
    let seq = thresholds(&ind, 700);

    // Rising from 200 until it passes the upper bound.
    let peak = seq.iter().position(|&t| t > THRESHOLD_MAX).unwrap();
    assert_eq!(seq[0], INITIAL_THRESHOLD + 1);
    assert!(seq[..=peak].windows(2).all(|w| w[1] == w[0] + 1));
    assert_eq!(seq[peak], THRESHOLD_MAX + 1);

    // Then falling until it passes the lower bound.
    let trough = peak + seq[peak..].iter().position(|&t| t < THRESHOLD_MIN).unwrap();
    assert!(seq[peak..=trough].windows(2).all(|w| w[1] + 1 == w[0]));
    assert_eq!(seq[trough], THRESHOLD_MIN - 1);

    // And rising again: a bounce, not a clamp.
    assert_eq!(seq[trough + 1], THRESHOLD_MIN);
    assert_eq!(seq[trough + 2], THRESHOLD_MIN + 1);
}

#[test]
fn test_threshold_never_sticks() {
    let ind = Indicator::new();
    let seq = thresholds(&ind, 1200);
    assert!(seq.windows(2).all(|w| w[0] != w[1]));
    assert!(seq.iter().all(|&t| (THRESHOLD_MIN - 1..=THRESHOLD_MAX + 1).contains(&t)));
}

// =============================================================================
// activity window tests
// =============================================================================

#[test]
fn test_signal_activity_arms_window_and_turns_off() {
    let ind = Indicator::new();
    for _ in 0..5 {
        ind.tick();
    }
    assert!(ind.is_lit());

    ind.signal_activity();
    assert_eq!(ind.mode(), IndicatorMode::ActivityWindow);
    assert_eq!(ind.signal_end(), 5 + ACTIVITY_WINDOW);
    assert!(!ind.is_lit());
}

#[test]
fn test_signal_activity_is_idempotent_while_pending() {
    let ind = Indicator::new();
    ind.tick();
    ind.signal_activity();
    let end = ind.signal_end();

    for _ in 0..500 {
        ind.tick();
    }
    ind.signal_activity();
    ind.signal_activity();
    assert_eq!(ind.signal_end(), end);
}

#[test]
fn test_signal_activity_before_first_tick_arms_window() {
    let ind = Indicator::new();
    ind.signal_activity();
    assert_eq!(ind.signal_end(), ACTIVITY_WINDOW);
    assert_eq!(ind.mode(), IndicatorMode::ActivityWindow);
}

#[test]
fn test_activity_window_lights_for_tail_then_resumes_breathing() {
    let ind = Indicator::new();
    ind.tick();
    ind.signal_activity();
    let end = ind.signal_end();

    // Dark until the tail starts, across period boundaries.
    while ind.now() < end - ACTIVITY_LIT_TAIL - 1 {
        ind.tick();
        assert!(!ind.is_lit(), "tick {}", ind.now());
    }
    ind.tick();
    assert_eq!(ind.now(), end - ACTIVITY_LIT_TAIL);
    assert!(ind.is_lit());

    // Lit through the tail, breathing suspended.
    let threshold = ind.threshold();
    while ind.now() < end {
        ind.tick();
        assert!(ind.is_lit());
    }
    assert_eq!(ind.threshold(), threshold);
    assert_eq!(ind.mode(), IndicatorMode::IdleBreathing);
    assert_eq!(ind.signal_end(), 0);

    // Breathing resumes at the next period boundary.
    tick_to_period_start(&ind);
    assert_eq!(ind.threshold(), threshold + 1);
}

#[test]
fn test_new_window_allowed_after_expiry() {
    let ind = Indicator::new();
    ind.signal_activity();
    for _ in 0..ACTIVITY_WINDOW {
        ind.tick();
    }
    assert_eq!(ind.mode(), IndicatorMode::IdleBreathing);

    ind.signal_activity();
    assert_eq!(ind.signal_end(), ind.now() + ACTIVITY_WINDOW);
}

// =============================================================================
// transition tests
// =============================================================================

#[test]
fn test_transition_freezes_output() {
    let ind = Indicator::new();
    tick_to_period_start(&ind);
    ind.enter_transition();
    assert_eq!(ind.mode(), IndicatorMode::Transitioning);

    let lit = ind.is_lit();
    let threshold = ind.threshold();
    for _ in 0..2000 {
        ind.tick();
        assert_eq!(ind.is_lit(), lit);
    }
    assert_eq!(ind.threshold(), threshold);
    assert_eq!(ind.mode(), IndicatorMode::Transitioning);
}

#[test]
fn test_transition_overrides_pending_window() {
    let ind = Indicator::new();
    ind.signal_activity();
    ind.enter_transition();
    assert_eq!(ind.mode(), IndicatorMode::Transitioning);
}

// =============================================================================
// pin output tests
// =============================================================================

#[test]
fn test_drive_copies_level_to_pin() {
    let ind = Indicator::new();
    let mut pin = FakePin::default();

    ind.drive(&mut pin);
    assert!(pin.high);

    ind.signal_activity();
    ind.drive(&mut pin);
    assert!(!pin.high);
    assert_eq!(pin.writes, 2);
}

#[test]
fn test_drive_before_first_tick_lights_pin() {
    // Early boot drives the LED before the timer runs.
    let ind = Indicator::new();
    let mut pin = FakePin::default();
    ind.drive(&mut pin);
    assert!(pin.high);
    assert_eq!(pin.writes, 1);
    assert!(!ind.is_animating());
}
