// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! RP2040 memory layout shared by the bootloader and the application images.
//!
//! Must stay in sync with the files under `linker_scripts/`.

// --- Flash layout constants ---

pub const FLASH_BASE: u32 = 0x1000_0000;
pub const FLASH_SIZE: u32 = 2048 * 1024;

pub const BOOTLOADER_SIZE: u32 = 64 * 1024;
pub const APP_BASE: u32 = FLASH_BASE + BOOTLOADER_SIZE;
pub const APP_SIZE: u32 = FLASH_SIZE - BOOTLOADER_SIZE;

/// First word of erased flash.
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

// --- SRAM layout constants ---

pub const RAM_BASE: u32 = 0x2000_0000;
pub const RAM_END: u32 = 0x2004_2000;

/// Address of the ModeSelectWord. The linker scripts end the RAM region here,
/// so neither `.bss` zeroing nor the stack touches it and it survives a warm
/// reset.
pub const MODE_SELECT_ADDR: u32 = 0x2003_BFF0;

/// Capacity in bytes of the diagnostic log buffer.
pub const LOG_CAPACITY: usize = 4096;

/// First two words of a Cortex-M vector table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorTable {
    pub initial_sp: u32,
    pub reset_vector: u32,
}

impl VectorTable {
    /// Read the vector table at `addr` via volatile reads.
    ///
    /// # Safety
    /// `addr` must point to at least two readable, aligned words.
    pub unsafe fn read_from(addr: u32) -> Self {
        Self {
            initial_sp: (addr as *const u32).read_volatile(),
            reset_vector: (addr as *const u32).offset(1).read_volatile(),
        }
    }

    /// Whether this table looks like a bootable application image.
    pub fn is_valid_application(&self) -> bool {
        if self.initial_sp == ERASED_WORD {
            return false;
        }
        is_in_ram(self.initial_sp) && is_thumb_entry_in_app(self.reset_vector)
    }
}

/// Inclusive of `RAM_END`: a full-descending stack starts at the end address.
pub fn is_in_ram(addr: u32) -> bool {
    (RAM_BASE..=RAM_END).contains(&addr)
}

fn is_thumb_entry_in_app(addr: u32) -> bool {
    addr & 1 == 1 && (APP_BASE..APP_BASE + APP_SIZE).contains(&(addr & !1))
}
