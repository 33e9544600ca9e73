// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Free-running tick counter, reset horizon and calibrated busy-wait.
//!
//! The counter is two words: a low-order countdown reloaded from the step
//! constant, and a high-order count bumped on every reload. Both are written
//! only from the periodic interrupt. Foreground code may read them at any
//! time, one word at a time; a pair of reads spanning an interrupt is not a
//! consistent snapshot.
//!
//! Only atomic `load`/`store` is used, which Cortex-M0+ supports natively.
//! `tick()` must never be re-entered: the timer interrupt may not preempt
//! itself (NVIC configuration, not enforced here).

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;

use crate::indicator::Indicator;

/// What a single `tick()` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickEvent {
    /// Low-order counter decremented, nothing else.
    Idle,
    /// Low-order counter reloaded and the high-order counter advanced.
    Wrapped,
    /// Like `Wrapped`, and the armed reset horizon was reached and cleared.
    HorizonReached,
}

/// Tick counter plus the optional reset horizon.
pub struct TimeBase {
    step: u32,
    low: AtomicU32,
    high: AtomicU32,
    horizon: AtomicU32,
}

impl TimeBase {
    /// Create a time base whose high-order counter advances once every
    /// `step` calls to [`tick`](Self::tick). `step` must be non-zero.
    pub const fn new(step: u32) -> Self {
        Self {
            step,
            low: AtomicU32::new(step - 1),
            high: AtomicU32::new(0),
            horizon: AtomicU32::new(0),
        }
    }

    /// Advance the clock by one interrupt period. Interrupt context only.
    pub fn tick(&self) -> TickEvent {
        let low = self.low.load(Ordering::Relaxed);
        if low != 0 {
            self.low.store(low - 1, Ordering::Relaxed);
            return TickEvent::Idle;
        }

        self.low.store(self.step - 1, Ordering::Relaxed);
        let high = self.high.load(Ordering::Relaxed).wrapping_add(1);
        self.high.store(high, Ordering::Release);

        let horizon = self.horizon.load(Ordering::Acquire);
        if horizon != 0 && high >= horizon {
            self.horizon.store(0, Ordering::Release);
            return TickEvent::HorizonReached;
        }
        TickEvent::Wrapped
    }

    /// Arm the reset horizon `ticks_from_now` high-order ticks ahead,
    /// replacing any pending one. Zero disarms.
    pub fn arm_reset_horizon(&self, ticks_from_now: u32) {
        let horizon = if ticks_from_now == 0 {
            0
        } else {
            self.now().wrapping_add(ticks_from_now)
        };
        self.horizon.store(horizon, Ordering::Release);
    }

    /// Current high-order counter value.
    pub fn now(&self) -> u32 {
        self.high.load(Ordering::Acquire)
    }

    /// Current low-order countdown value.
    pub fn low(&self) -> u32 {
        self.low.load(Ordering::Relaxed)
    }

    /// Armed horizon, zero when none.
    pub fn horizon(&self) -> u32 {
        self.horizon.load(Ordering::Acquire)
    }

    pub fn step(&self) -> u32 {
        self.step
    }
}

/// Empirical busy-loop iterations per millisecond per MHz of core clock.
///
/// These are measured, not derived. The breathing animation's interrupt
/// load slows the loop down, hence the separate animated figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayCalibration {
    pub idle: u32,
    pub animated: u32,
}

impl DelayCalibration {
    /// Cortex-M0+ running the loop from flash.
    pub const CORTEX_M0_PLUS: Self = Self {
        idle: 167,
        animated: 149,
    };

    /// Iteration count for a `ms` delay at `cpu_mhz`.
    pub fn loop_count(&self, ms: u32, cpu_mhz: u32, animated: bool) -> u64 {
        let per_ms = if animated { self.animated } else { self.idle };
        ms as u64 * cpu_mhz as u64 * per_ms as u64
    }
}

/// Coarse blocking delay. Interrupts keep firing while it spins.
#[derive(Clone, Copy)]
pub struct BusyDelay<'a> {
    indicator: &'a Indicator,
    cpu_mhz: u32,
    calibration: DelayCalibration,
}

impl<'a> BusyDelay<'a> {
    pub fn new(indicator: &'a Indicator, cpu_mhz: u32) -> Self {
        Self::with_calibration(indicator, cpu_mhz, DelayCalibration::CORTEX_M0_PLUS)
    }

    pub fn with_calibration(
        indicator: &'a Indicator,
        cpu_mhz: u32,
        calibration: DelayCalibration,
    ) -> Self {
        Self {
            indicator,
            cpu_mhz,
            calibration,
        }
    }

    /// Iterations a `ms` delay would spin given the current animation state.
    pub fn iterations_for(&self, ms: u32) -> u64 {
        self.calibration
            .loop_count(ms, self.cpu_mhz, self.indicator.is_animating())
    }

    /// Block for roughly `ms` milliseconds.
    #[inline(never)]
    pub fn delay(&self, ms: u32) {
        spin(self.iterations_for(ms));
    }
}

impl DelayNs for BusyDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        // ns * MHz * loops-per-ms-per-MHz / 1e6
        let per_ms = self.iterations_for(1);
        spin(ns as u64 * per_ms / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay(ms);
    }
}

fn spin(count: u64) {
    for i in 1..count {
        core::hint::black_box(i);
    }
}
