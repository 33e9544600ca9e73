// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! In-RAM diagnostic log.
//!
//! A fixed byte region holding newline-separated messages, always
//! NUL-terminated at the cursor so a debugger can read it as a C string.
//! When an append does not fit, the oldest quarter is discarded by shifting
//! the rest to the front, once. If it still does not fit a fixed marker is
//! written instead of the message.

use core::fmt;

use heapless::String;

use crate::diag::DiagnosticLog;

/// Written instead of a message that cannot fit even after eviction.
pub const TOO_LONG: &str = "TOO LONG!\n";
/// First line after a reset.
pub const RESET_MESSAGE: &str = "Reset logs.";

/// Format `value` as uppercase hex, most significant nibble first.
///
/// With `pad` all eight nibbles are emitted; without it leading zeros are
/// dropped but at least one digit remains.
pub fn format_hex(value: u32, pad: bool) -> String<8> {
    let mut out = String::new();
    for shift in (0..8).rev().map(|n| n * 4) {
        let nibble = ((value >> shift) & 0xF) as u8;
        if pad || nibble != 0 || shift == 0 || !out.is_empty() {
            let digit = match nibble {
                0..=9 => b'0' + nibble,
                _ => b'A' + nibble - 10,
            };
            // Capacity is exactly eight nibbles.
            let _ = out.push(digit as char);
        }
    }
    out
}

/// Log buffer of `N` bytes; the cursor is at most `N - 1`, leaving room for
/// the terminator.
#[repr(C)]
pub struct LogBuffer<const N: usize> {
    cursor: usize,
    buffer: [u8; N],
}

impl<const N: usize> Default for LogBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LogBuffer<N> {
    /// Room for the marker after evicting a quarter.
    const MIN_CAPACITY: () = assert!(N >= 64);
    const JUMP: usize = N / 4;

    pub const fn new() -> Self {
        let () = Self::MIN_CAPACITY;
        Self {
            cursor: 0,
            buffer: [0; N],
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Logged bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    /// Logged text. Eviction may cut a multi-byte character; only the valid
    /// prefix is returned in that case.
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(self.as_bytes()) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.as_bytes()[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    /// The whole region including the terminator and stale bytes past it.
    pub fn raw(&self) -> &[u8; N] {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.buffer[0] = 0;
        self.append_line(RESET_MESSAGE);
    }

    pub fn append(&mut self, text: &str) {
        let bytes = text.as_bytes();
        if !self.fits(bytes.len()) {
            self.evict_oldest_quarter();
            if !self.fits(bytes.len()) {
                self.write_bytes(TOO_LONG.as_bytes());
                return;
            }
        }
        self.write_bytes(bytes);
    }

    pub fn append_line(&mut self, text: &str) {
        self.append(text);
        self.append("\n");
    }

    pub fn append_labeled_value(&mut self, label: &str, value: u32) {
        self.append(label);
        self.append(": 0x");
        self.append(&format_hex(value, false));
        self.append("\n");
    }

    fn fits(&self, len: usize) -> bool {
        self.cursor + len < N
    }

    fn evict_oldest_quarter(&mut self) {
        if self.cursor > Self::JUMP {
            self.buffer.copy_within(Self::JUMP..self.cursor, 0);
            self.cursor -= Self::JUMP;
        } else {
            self.cursor = 0;
        }
        self.buffer[self.cursor] = 0;
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        self.buffer[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        self.buffer[self.cursor] = 0;
    }
}

impl<const N: usize> DiagnosticLog for LogBuffer<N> {
    fn log_reset(&mut self) {
        self.reset();
    }

    fn append_line(&mut self, text: &str) {
        LogBuffer::append_line(self, text);
    }

    fn append_labeled_value(&mut self, label: &str, value: u32) {
        LogBuffer::append_labeled_value(self, label, value);
    }
}

impl<const N: usize> fmt::Write for LogBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }
}
