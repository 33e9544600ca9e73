// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the tick counter, reset horizon and busy-wait calibration.

use embedded_hal::delay::DelayNs;
use uf2boot_core::indicator::Indicator;
use uf2boot_core::timebase::{BusyDelay, DelayCalibration, TickEvent, TimeBase};

const STEP: u32 = 10;

fn tick_n(tb: &TimeBase, n: u32) -> Vec<TickEvent> {
    (0..n).map(|_| tb.tick()).collect()
}

// =============================================================================
// tick tests
// =============================================================================

#[test]
fn test_new_time_base_starts_at_zero() {
    let tb = TimeBase::new(STEP);
    assert_eq!(tb.now(), 0);
    assert_eq!(tb.horizon(), 0);
    assert_eq!(tb.step(), STEP);
}

#[test]
fn test_high_counter_advances_once_per_step() {
    let tb = TimeBase::new(STEP);

    let events = tick_n(&tb, STEP - 1);
    assert!(events.iter().all(|e| *e == TickEvent::Idle));
    assert_eq!(tb.now(), 0);

    assert_eq!(tb.tick(), TickEvent::Wrapped);
    assert_eq!(tb.now(), 1);
}

#[test]
fn test_high_counter_exactly_one_per_step_over_many_periods() {
    let tb = TimeBase::new(STEP);
    let mut previous = tb.now();

    for period in 1..=50 {
        let events = tick_n(&tb, STEP);
        let wraps = events.iter().filter(|e| **e == TickEvent::Wrapped).count();
        assert_eq!(wraps, 1, "period {period}");
        assert_eq!(tb.now(), previous + 1);
        previous = tb.now();
    }
}

#[test]
fn test_high_counter_never_decreases() {
    let tb = TimeBase::new(3);
    let mut last = 0;
    for _ in 0..1000 {
        tb.tick();
        assert!(tb.now() >= last);
        last = tb.now();
    }
    assert_eq!(last, 333);
}

#[test]
fn test_low_counter_reloads_from_step() {
    let tb = TimeBase::new(STEP);
    assert_eq!(tb.low(), STEP - 1);
    tick_n(&tb, STEP);
    assert_eq!(tb.low(), STEP - 1);
    tb.tick();
    assert_eq!(tb.low(), STEP - 2);
}

#[test]
fn test_step_of_one_wraps_every_tick() {
    let tb = TimeBase::new(1);
    for n in 1..=5 {
        assert_eq!(tb.tick(), TickEvent::Wrapped);
        assert_eq!(tb.now(), n);
    }
}

// =============================================================================
// reset horizon tests
// =============================================================================

#[test]
fn test_horizon_fires_exactly_once_at_target() {
    let tb = TimeBase::new(STEP);
    tick_n(&tb, STEP * 4);
    let initial = tb.now();

    tb.arm_reset_horizon(5);
    assert_eq!(tb.horizon(), initial + 5);

    let events = tick_n(&tb, STEP * 20);
    let fired: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| **e == TickEvent::HorizonReached)
        .map(|(i, _)| i)
        .collect();

    assert_eq!(fired.len(), 1);
    // Fires on the wrap that makes the high counter reach initial + 5.
    assert_eq!(fired[0], (STEP * 5 - 1) as usize);
    assert_eq!(tb.horizon(), 0);
}

#[test]
fn test_horizon_reached_counts_as_wrap() {
    let tb = TimeBase::new(STEP);
    tb.arm_reset_horizon(1);
    tick_n(&tb, STEP - 1);
    assert_eq!(tb.tick(), TickEvent::HorizonReached);
    assert_eq!(tb.now(), 1);
}

#[test]
fn test_rearming_replaces_pending_horizon() {
    let tb = TimeBase::new(STEP);
    tb.arm_reset_horizon(3);
    tick_n(&tb, STEP);
    tb.arm_reset_horizon(10);
    assert_eq!(tb.horizon(), 11);

    let events = tick_n(&tb, STEP * 9);
    assert!(!events.contains(&TickEvent::HorizonReached));
    assert_eq!(tb.now(), 10);

    assert!(tick_n(&tb, STEP).contains(&TickEvent::HorizonReached));
}

#[test]
fn test_rearming_shorter_horizon_replaces_longer() {
    let tb = TimeBase::new(STEP);
    tb.arm_reset_horizon(100);
    tb.arm_reset_horizon(2);

    let events = tick_n(&tb, STEP * 2);
    assert_eq!(events.last(), Some(&TickEvent::HorizonReached));
    assert_eq!(tb.horizon(), 0);
}

#[test]
fn test_zero_horizon_disarms() {
    let tb = TimeBase::new(STEP);
    tb.arm_reset_horizon(2);
    tb.arm_reset_horizon(0);
    assert_eq!(tb.horizon(), 0);

    let events = tick_n(&tb, STEP * 10);
    assert!(!events.contains(&TickEvent::HorizonReached));
}

// =============================================================================
// delay calibration tests
// =============================================================================

#[test]
fn test_loop_count_uses_idle_constant() {
    let cal = DelayCalibration::CORTEX_M0_PLUS;
    assert_eq!(cal.loop_count(10, 48, false), 10 * 48 * 167);
}

#[test]
fn test_loop_count_uses_animated_constant() {
    let cal = DelayCalibration::CORTEX_M0_PLUS;
    assert_eq!(cal.loop_count(10, 48, true), 10 * 48 * 149);
}

#[test]
fn test_loop_count_does_not_overflow_u32() {
    let cal = DelayCalibration::CORTEX_M0_PLUS;
    let count = cal.loop_count(1_000_000, 125, false);
    assert_eq!(count, 1_000_000u64 * 125 * 167);
}

#[test]
fn test_busy_delay_follows_animation_state() {
    let indicator = Indicator::new();
    let cal = DelayCalibration {
        idle: 7,
        animated: 5,
    };
    let delay = BusyDelay::with_calibration(&indicator, 2, cal);

    assert_eq!(delay.iterations_for(3), 3 * 2 * 7);
    indicator.tick();
    assert_eq!(delay.iterations_for(3), 3 * 2 * 5);
}

#[test]
fn test_busy_delay_completes() {
    let indicator = Indicator::new();
    let cal = DelayCalibration {
        idle: 1,
        animated: 1,
    };
    let mut delay = BusyDelay::with_calibration(&indicator, 1, cal);
    delay.delay(5);
    delay.delay_ms(5);
    delay.delay_us(5);
    delay.delay_ns(0);
}
