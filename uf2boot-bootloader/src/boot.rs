// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Application validation and the jump into it.

use uf2boot_core::layout::{VectorTable, APP_BASE};

pub fn application_vector_table() -> VectorTable {
    unsafe { VectorTable::read_from(APP_BASE) }
}

pub fn application_is_valid() -> bool {
    application_vector_table().is_valid_application()
}

/// Start the application in place from flash.
///
/// # Safety
/// The application vector table must have passed
/// [`VectorTable::is_valid_application`].
pub unsafe fn start_application() -> ! {
    let vt = application_vector_table();
    defmt::println!(
        "Jumping to application: sp=0x{:08x} reset=0x{:08x}",
        vt.initial_sp,
        vt.reset_vector
    );

    prepare_for_application_handoff();
    relocate_vector_table(APP_BASE);
    jump_to_application(vt.initial_sp, vt.reset_vector);
}

/// Quiesce interrupt sources. Clocks stay configured; the application
/// runtime reprograms them from a known-safe source.
unsafe fn prepare_for_application_handoff() {
    cortex_m::interrupt::disable();

    // SysTick off, so the bootloader's handler never runs on the
    // application's vector table.
    const SYST_CSR: *mut u32 = 0xE000_E010 as *mut u32;
    SYST_CSR.write_volatile(0);

    const NVIC_ICER: *mut u32 = 0xE000_E180 as *mut u32;
    NVIC_ICER.write_volatile(0xFFFF_FFFF);

    const NVIC_ICPR: *mut u32 = 0xE000_E280 as *mut u32;
    NVIC_ICPR.write_volatile(0xFFFF_FFFF);

    // Drop a SysTick that fired between the disable and the CSR write.
    const SCB_ICSR: *mut u32 = 0xE000_ED04 as *mut u32;
    const ICSR_PENDSTCLR: u32 = 1 << 25;
    SCB_ICSR.write_volatile(ICSR_PENDSTCLR);
}

unsafe fn relocate_vector_table(base: u32) {
    const SCB_VTOR: *mut u32 = 0xE000_ED08 as *mut u32;
    SCB_VTOR.write_volatile(base);

    cortex_m::asm::dsb();
    cortex_m::asm::isb();
}

unsafe fn jump_to_application(initial_sp: u32, reset_vector: u32) -> ! {
    core::arch::asm!(
        "msr msp, {sp}",
        "cpsie i",
        "bx {reset}",
        sp = in(reg) initial_sp,
        reset = in(reg) reset_vector,
        options(noreturn)
    );
}
