// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Reset/mode-select protocol.
//!
//! A single RAM word survives a warm reset (the linker keeps it out of
//! `.bss` and the stack) and tells the next boot what to do. After a
//! power cycle its content is garbage and must not be trusted.
//!
//! Requests are fire-and-forget: write the word, reset. A write that does
//! not land before the reset reads back as an unknown value, which early
//! boot treats as a cold boot.

use crate::indicator::Indicator;
use crate::rgb::{ColorIndicator, Rgb};
use crate::runtime::BootTransition;

/// No pending intent.
pub const NONE: u32 = 0;
/// Stay in the bootloader, skipping the double-tap wait.
pub const MAGIC: u32 = 0xF016_69EF;
/// Jump straight to the application.
pub const MAGIC_QUICK_BOOT: u32 = 0xF026_69EF;
/// A RAM-resident bootloader owns the device; leave the word alone.
pub const MAGIC_SRAM_BOOTLOADER: u32 = 0xF036_69EF;

/// Decoded ModeSelectWord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootIntent {
    Default,
    StayInBootloader,
    QuickBoot,
    SramBootloader,
}

impl BootIntent {
    /// Unknown values, including power-on noise, decode as `Default`.
    pub fn from_word(word: u32) -> Self {
        match word {
            MAGIC => Self::StayInBootloader,
            MAGIC_QUICK_BOOT => Self::QuickBoot,
            MAGIC_SRAM_BOOTLOADER => Self::SramBootloader,
            _ => Self::Default,
        }
    }

    pub fn word(self) -> u32 {
        match self {
            Self::Default => NONE,
            Self::StayInBootloader => MAGIC,
            Self::QuickBoot => MAGIC_QUICK_BOOT,
            Self::SramBootloader => MAGIC_SRAM_BOOTLOADER,
        }
    }
}

/// Storage for the ModeSelectWord.
pub trait WordCell {
    fn read(&self) -> u32;
    fn write(&mut self, word: u32);
}

/// Unconditional restart from the boot vector.
pub trait SystemReset {
    fn system_reset(&mut self) -> !;
}

/// ModeSelectWord at a fixed RAM address, accessed with volatile reads and
/// writes.
pub struct RetainedWord {
    addr: *mut u32,
}

impl RetainedWord {
    /// # Safety
    /// `addr` must be an aligned, readable and writable word that nothing
    /// else in the program uses, and at most one `RetainedWord` may exist
    /// for it.
    pub unsafe fn at(addr: u32) -> Self {
        Self::from_ptr(addr as *mut u32)
    }

    /// # Safety
    /// Same contract as [`RetainedWord::at`].
    pub unsafe fn from_ptr(addr: *mut u32) -> Self {
        Self { addr }
    }
}

// SAFETY: the word is owned exclusively by this handle.
unsafe impl Send for RetainedWord {}

impl WordCell for RetainedWord {
    fn read(&self) -> u32 {
        unsafe { self.addr.read_volatile() }
    }

    fn write(&mut self, word: u32) {
        unsafe { self.addr.write_volatile(word) }
    }
}

/// Reset through the Cortex-M `SCB.AIRCR` request.
#[cfg(feature = "embedded")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ScbReset;

#[cfg(feature = "embedded")]
impl SystemReset for ScbReset {
    fn system_reset(&mut self) -> ! {
        cortex_m::asm::dsb();
        cortex_m::peripheral::SCB::sys_reset()
    }
}

/// The reset protocol: mode-select word, reset primitive and the indicators
/// that show the transition.
pub struct ModeSelect<'a, W, R, C> {
    word: W,
    reset: R,
    indicator: &'a Indicator,
    color: C,
}

impl<'a, W: WordCell, R: SystemReset, C: ColorIndicator> ModeSelect<'a, W, R, C> {
    pub fn new(word: W, reset: R, indicator: &'a Indicator, color: C) -> Self {
        Self {
            word,
            reset,
            indicator,
            color,
        }
    }

    pub fn intent(&self) -> BootIntent {
        BootIntent::from_word(self.word.read())
    }

    pub fn word(&self) -> u32 {
        self.word.read()
    }

    /// Overwrite the word without resetting (early boot bookkeeping).
    pub fn set_word(&mut self, word: u32) {
        self.word.write(word);
    }

    /// Show the leaving color, ask the next boot to start the application
    /// right away, and reset. A RAM-resident bootloader's word is kept.
    pub fn request_application_boot(&mut self) -> ! {
        self.indicator.enter_transition();
        self.color.set_color(Rgb::LEAVE);
        if self.word.read() != MAGIC_SRAM_BOOTLOADER {
            self.word.write(MAGIC_QUICK_BOOT);
        }
        self.reset.system_reset()
    }

    /// Ask the next boot to stay in the bootloader, and reset.
    pub fn request_bootloader_boot(&mut self) -> ! {
        self.word.write(MAGIC);
        self.reset.system_reset()
    }
}

impl<W: WordCell, R: SystemReset, C: ColorIndicator> BootTransition for ModeSelect<'_, W, R, C> {
    fn enter_application(&mut self) -> ! {
        self.request_application_boot()
    }
}
