// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Early-boot decision - pure logic without hardware dependencies.
//!
//! Runs once per reset, before the time base starts, and decides from the
//! ModeSelectWord and a few hardware facts whether to start the application
//! or stay in the bootloader. The caller applies the resulting plan.

use crate::mode_select::{BootIntent, MAGIC, NONE};

/// Facts gathered by early boot code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootInputs {
    /// Raw ModeSelectWord as found after reset.
    pub word: u32,
    /// The application vector table passed validation.
    pub app_valid: bool,
    /// The reset was a power-on reset, so `word` is garbage.
    pub power_on_reset: bool,
    /// The board's boot pin is held.
    pub boot_pin_held: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootAction {
    /// Jump to the application now.
    StartApplication,
    /// Remain in the bootloader.
    StayInBootloader,
    /// Publish MAGIC, wait for a second reset, then start the application.
    AwaitDoubleTap,
}

/// Decision plus the word early boot must write before acting on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootPlan {
    pub action: BootAction,
    /// `None` leaves the word untouched.
    pub write_word: Option<u32>,
}

impl BootPlan {
    const fn new(action: BootAction, write_word: Option<u32>) -> Self {
        Self { action, write_word }
    }
}

/// Whether the ModeSelectWord must be treated as power-on garbage.
///
/// `had_power_on` is the chip's power-on/brown-out reset flag; it is not
/// cleared by a warm reset, so on its own it can be stale. `warm_marker`
/// reports a marker that a previous boot left in reset-surviving storage
/// cleared only by power-on and the RUN pin. Only the combination of a
/// power-on flag and a missing marker is a fresh power-up; a RUN pin reset
/// (marker gone, power-on flag clear) is warm and keeps RAM intact.
pub fn is_power_on_reset(had_power_on: bool, warm_marker: bool) -> bool {
    had_power_on && !warm_marker
}

/// Decide what this boot does.
pub fn decide_boot(inputs: &BootInputs) -> BootPlan {
    if !inputs.app_valid {
        return BootPlan::new(BootAction::StayInBootloader, None);
    }

    if inputs.boot_pin_held {
        return BootPlan::new(BootAction::StayInBootloader, Some(NONE));
    }

    let intent = BootIntent::from_word(inputs.word);
    if intent == BootIntent::QuickBoot {
        return BootPlan::new(BootAction::StartApplication, Some(NONE));
    }

    if inputs.power_on_reset {
        return BootPlan::new(BootAction::StartApplication, Some(NONE));
    }

    if intent == BootIntent::StayInBootloader {
        return BootPlan::new(BootAction::StayInBootloader, Some(NONE));
    }

    BootPlan::new(BootAction::AwaitDoubleTap, Some(MAGIC))
}
