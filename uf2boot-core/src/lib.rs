// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Time-driven state shared by the UF2 bootloader runtime.
//!
//! Everything here is plain state logic: the tick counter advanced from the
//! periodic interrupt, the mode-select word carried across a warm reset, the
//! status indicator animation, and the in-RAM diagnostic log. Hardware is
//! reached only through `embedded-hal` traits and the small seams defined in
//! each module, so the crate builds and tests on the host.
//!
//! Features:
//! - `diagnostics` (default): compiles the diagnostic log buffer
//! - `embedded`: Cortex-M system reset primitive
//! - `defmt`: `defmt::Format` on public enums

#![cfg_attr(not(test), no_std)]

pub mod boot_decision;
pub mod diag;
pub mod halt;
pub mod indicator;
pub mod layout;
#[cfg(feature = "diagnostics")]
pub mod log;
pub mod mode_select;
pub mod rgb;
pub mod runtime;
pub mod timebase;

// Re-export commonly used types
pub use boot_decision::{decide_boot, is_power_on_reset, BootAction, BootInputs, BootPlan};
pub use diag::{DiagnosticLog, NoLog};
pub use indicator::{Indicator, IndicatorMode};
pub use mode_select::{BootIntent, ModeSelect, RetainedWord, SystemReset, WordCell};
pub use rgb::{ColorIndicator, NoColorIndicator, Rgb};
pub use runtime::{BootTransition, Runtime};
pub use timebase::{BusyDelay, DelayCalibration, TickEvent, TimeBase};

#[cfg(feature = "diagnostics")]
pub use log::{format_hex, LogBuffer};

/// Diagnostic log selected by the build configuration.
#[cfg(feature = "diagnostics")]
pub type BootLog = LogBuffer<{ layout::LOG_CAPACITY }>;

/// Diagnostic log selected by the build configuration.
#[cfg(not(feature = "diagnostics"))]
pub type BootLog = NoLog;
