// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Top-level context shared between the timer interrupt and foreground.
//!
//! [`Runtime`] is `Sync` and `const`-constructible so the binary keeps it in
//! a `static`. The interrupt is the only writer of the tick counter and of
//! the animation fields; foreground may arm the horizon, signal activity and
//! read everything.

use crate::indicator::Indicator;
use crate::timebase::{BusyDelay, TickEvent, TimeBase};

/// Leaves the bootloader for the application. Never returns.
pub trait BootTransition {
    fn enter_application(&mut self) -> !;
}

pub struct Runtime {
    pub time: TimeBase,
    pub indicator: Indicator,
}

impl Runtime {
    pub const fn new(timer_step: u32) -> Self {
        Self {
            time: TimeBase::new(timer_step),
            indicator: Indicator::new(),
        }
    }

    /// Body of the periodic timer interrupt.
    ///
    /// The indicator advances once per time base wrap. When the reset
    /// horizon is reached the transition runs from here, inside the
    /// interrupt.
    pub fn on_timer_interrupt(&self, transition: &mut impl BootTransition) -> TickEvent {
        let event = self.time.tick();
        match event {
            TickEvent::Idle => {}
            TickEvent::Wrapped => self.indicator.tick(),
            TickEvent::HorizonReached => {
                self.indicator.tick();
                transition.enter_application();
            }
        }
        event
    }

    /// Leave for the application `ticks_from_now` high-order ticks from
    /// now. Zero cancels.
    pub fn arm_reset_horizon(&self, ticks_from_now: u32) {
        self.time.arm_reset_horizon(ticks_from_now);
    }

    pub fn signal_activity(&self) {
        self.indicator.signal_activity();
    }

    pub fn delay(&self, cpu_mhz: u32) -> BusyDelay<'_> {
        BusyDelay::new(&self.indicator, cpu_mhz)
    }
}
