// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Diagnostic logging capability.
//!
//! Code that wants to leave a post-mortem trace takes `&mut impl
//! DiagnosticLog`. When diagnostics are compiled out the build hands it a
//! [`NoLog`], so callers never depend on the buffer existing.

pub trait DiagnosticLog {
    /// Start over, leaving a marker that the log was cleared.
    fn log_reset(&mut self);
    /// Append `text` followed by a newline.
    fn append_line(&mut self, text: &str);
    /// Append `"<label>: 0x<hex>\n"`.
    fn append_labeled_value(&mut self, label: &str, value: u32);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoLog;

impl NoLog {
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticLog for NoLog {
    fn log_reset(&mut self) {}

    fn append_line(&mut self, _text: &str) {}

    fn append_labeled_value(&mut self, _label: &str, _value: u32) {}
}
