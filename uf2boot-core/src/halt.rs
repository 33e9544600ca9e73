// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Fatal halt path.
//!
//! Records a code and parks the CPU. It deliberately does not reset: a
//! reboot loop would hide the failure.

use crate::diag::DiagnosticLog;

pub const HALT_HARD_FAULT: u32 = 0x01;
pub const HALT_CLOCK_INIT: u32 = 0x02;
pub const HALT_PERIPHERALS_TAKEN: u32 = 0x03;

pub fn record_panic(log: &mut impl DiagnosticLog, code: u32) {
    log.append_labeled_value("PANIC", code);
}

pub fn halt(log: &mut impl DiagnosticLog, code: u32) -> ! {
    record_panic(log, code);
    loop {
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}
