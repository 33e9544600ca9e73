// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Application image that reboots the board into the UF2 bootloader.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use rp2040_hal as _;
use uf2boot_core::layout::MODE_SELECT_ADDR;
use uf2boot_core::mode_select::ScbReset;
use uf2boot_core::{Indicator, ModeSelect, NoColorIndicator, RetainedWord};

defmt::timestamp!("{=u64:us}", { 0 });

static INDICATOR: Indicator = Indicator::new();

#[entry]
fn main() -> ! {
    defmt::println!("Rebooting into the bootloader");

    // SAFETY: the application linker script ends RAM below this word.
    let word = unsafe { RetainedWord::at(MODE_SELECT_ADDR) };
    ModeSelect::new(word, ScbReset, &INDICATOR, NoColorIndicator).request_bootloader_boot()
}
