// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Process-wide state shared with the exception handlers.

use core::cell::RefCell;

use cortex_m::interrupt::{self, CriticalSection, Mutex};
use cortex_m_rt::{exception, ExceptionFrame};
use uf2boot_core::halt::{halt, HALT_HARD_FAULT};
use uf2boot_core::mode_select::ScbReset;
use uf2boot_core::{BootLog, ModeSelect, NoLog, RetainedWord, Runtime, TickEvent};

use crate::board::{BoardColor, LedPin, TIMER_STEP};

pub type BootModeSelect = ModeSelect<'static, RetainedWord, ScbReset, BoardColor>;

/// Time base and status indicator, advanced from SysTick.
pub static RUNTIME: Runtime = Runtime::new(TIMER_STEP);

static LOG: Mutex<RefCell<BootLog>> = Mutex::new(RefCell::new(BootLog::new()));

/// Hardware owned by SysTick once the bootloader is resident.
pub struct IsrResources {
    pub led: LedPin,
    pub mode_select: BootModeSelect,
}

static ISR_RESOURCES: Mutex<RefCell<Option<IsrResources>>> = Mutex::new(RefCell::new(None));

pub fn with_log(f: impl FnOnce(&mut BootLog)) {
    interrupt::free(|cs| f(&mut *LOG.borrow(cs).borrow_mut()));
}

/// Hand the LED and the reset protocol to SysTick. Must run before the
/// timer is started.
pub fn install(resources: IsrResources) {
    interrupt::free(|cs| {
        *ISR_RESOURCES.borrow(cs).borrow_mut() = Some(resources);
    });
}

/// Record `code` in the diagnostic log and park the CPU with interrupts
/// masked.
pub fn halt_with(code: u32) -> ! {
    defmt::error!("halt: code {=u32:#x}", code);
    interrupt::disable();
    // SAFETY: interrupts stay disabled for good.
    let cs = unsafe { CriticalSection::new() };
    match LOG.borrow(&cs).try_borrow_mut() {
        Ok(mut log) => halt(&mut *log, code),
        // The fault hit while the log was being written.
        Err(_) => halt(&mut NoLog, code),
    }
}

#[exception]
fn SysTick() {
    interrupt::free(|cs| {
        let mut slot = ISR_RESOURCES.borrow(cs).borrow_mut();
        if let Some(res) = slot.as_mut() {
            if RUNTIME.on_timer_interrupt(&mut res.mode_select) != TickEvent::Idle {
                RUNTIME.indicator.drive(&mut res.led);
            }
        }
    });
}

#[exception]
unsafe fn HardFault(_frame: &ExceptionFrame) -> ! {
    halt_with(HALT_HARD_FAULT)
}
