// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Status LED state machine: breathing idle pattern, activity pulses and the
//! terminal "leaving" display.
//!
//! [`Indicator::tick`] runs in interrupt context once per time base wrap.
//! [`Indicator::signal_activity`] and [`Indicator::enter_transition`] run in
//! foreground. Every field is a single atomic word updated with one store, so
//! foreground readers may observe fields from different ticks.
//!
//! The breathing pattern is a software PWM with a 256-tick period: the LED
//! turns on when the low byte of the tick count is zero and off when it
//! reaches the current threshold. The threshold moves by one step per period
//! and bounces off the [10, 250] band.

use core::sync::atomic::{AtomicBool, AtomicI8, AtomicU32, AtomicU8, Ordering};

use embedded_hal::digital::{OutputPin, PinState};

/// Threshold at power-up.
pub const INITIAL_THRESHOLD: u8 = 200;
/// Below this the step direction flips upwards.
pub const THRESHOLD_MIN: u8 = 10;
/// Above this the step direction flips downwards.
pub const THRESHOLD_MAX: u8 = 250;

/// Length of an activity window, in indicator ticks.
pub const ACTIVITY_WINDOW: u32 = 2000;
/// The LED is forced on this many ticks before the window ends.
pub const ACTIVITY_LIT_TAIL: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorMode {
    IdleBreathing,
    ActivityWindow,
    Transitioning,
}

pub struct Indicator {
    now: AtomicU32,
    signal_end: AtomicU32,
    step: AtomicI8,
    threshold: AtomicU8,
    lit: AtomicBool,
    animating: AtomicBool,
    leaving: AtomicBool,
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator {
    /// LED starts lit, animation inactive until the first tick.
    pub const fn new() -> Self {
        Self {
            now: AtomicU32::new(0),
            signal_end: AtomicU32::new(0),
            step: AtomicI8::new(1),
            threshold: AtomicU8::new(INITIAL_THRESHOLD),
            lit: AtomicBool::new(true),
            animating: AtomicBool::new(false),
            leaving: AtomicBool::new(false),
        }
    }

    /// Advance the animation by one tick. Interrupt context only.
    pub fn tick(&self) {
        self.animating.store(true, Ordering::Relaxed);
        let now = self.now.load(Ordering::Relaxed).wrapping_add(1);
        self.now.store(now, Ordering::Release);

        if self.leaving.load(Ordering::Acquire) {
            return;
        }

        let signal_end = self.signal_end.load(Ordering::Acquire);
        if signal_end != 0 {
            // Exact matches: `now` advances by exactly one per call.
            if now == signal_end.wrapping_sub(ACTIVITY_LIT_TAIL) {
                self.set_lit(true);
            }
            if now == signal_end {
                self.signal_end.store(0, Ordering::Release);
            }
            return;
        }

        let phase = (now & 0xff) as u8;
        let threshold = self.threshold.load(Ordering::Relaxed);
        if phase == 0 {
            self.set_lit(true);
            let mut step = self.step.load(Ordering::Relaxed);
            if !(THRESHOLD_MIN..=THRESHOLD_MAX).contains(&threshold) {
                step = -step;
                self.step.store(step, Ordering::Relaxed);
            }
            self.threshold
                .store(threshold.wrapping_add_signed(step), Ordering::Relaxed);
        } else if phase == threshold {
            self.set_lit(false);
        }
    }

    /// Open an activity window unless one is already pending.
    pub fn signal_activity(&self) {
        let now = self.now.load(Ordering::Acquire);
        let signal_end = self.signal_end.load(Ordering::Acquire);
        if signal_end == 0 || signal_end < now {
            self.signal_end
                .store(now.wrapping_add(ACTIVITY_WINDOW), Ordering::Release);
            self.set_lit(false);
        }
    }

    /// Freeze the indicator in its terminal state ahead of a reset.
    pub fn enter_transition(&self) {
        self.leaving.store(true, Ordering::Release);
    }

    pub fn mode(&self) -> IndicatorMode {
        if self.leaving.load(Ordering::Acquire) {
            IndicatorMode::Transitioning
        } else if self.signal_end.load(Ordering::Acquire) != 0 {
            IndicatorMode::ActivityWindow
        } else {
            IndicatorMode::IdleBreathing
        }
    }

    /// Drive `pin` to the current output level.
    pub fn drive(&self, pin: &mut impl OutputPin) {
        pin.set_state(PinState::from(self.is_lit())).ok();
    }

    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::Acquire)
    }

    /// True once the interrupt has started driving the animation.
    pub fn is_animating(&self) -> bool {
        self.animating.load(Ordering::Relaxed)
    }

    pub fn now(&self) -> u32 {
        self.now.load(Ordering::Acquire)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold.load(Ordering::Relaxed)
    }

    pub fn step(&self) -> i8 {
        self.step.load(Ordering::Relaxed)
    }

    /// Tick at which the pending activity window ends, zero when none.
    pub fn signal_end(&self) -> u32 {
        self.signal_end.load(Ordering::Acquire)
    }

    fn set_lit(&self, lit: bool) {
        self.lit.store(lit, Ordering::Release);
    }
}
