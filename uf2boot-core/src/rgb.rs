// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Multi-color status indicator drivers.
//!
//! Two bit-banged variants exist: APA102 (separate clock and data pins) and
//! single-wire WS2812-style pixels fed from a flat byte buffer. Boards without
//! either use [`NoColorIndicator`]. Transmissions have no error detection; a
//! glitched frame is corrected by the next color update.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Shown while the bootloader is resident.
    pub const START: Self = Self::new(0x00, 0x00, 0x40);
    /// For a transfer front end to show while a host is writing.
    pub const ACTIVE: Self = Self::new(0x00, 0x40, 0x00);
    /// Shown right before resetting into the application.
    pub const LEAVE: Self = Self::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value.
    pub const fn from_u32(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

pub trait ColorIndicator {
    fn set_color(&mut self, color: Rgb);
}

/// Stand-in for boards without a multi-color indicator.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoColorIndicator;

impl ColorIndicator for NoColorIndicator {
    fn set_color(&mut self, _color: Rgb) {}
}

// --- APA102 ---

pub const APA102_START_FRAME: [u8; 4] = [0x00; 4];
pub const APA102_END_FRAME: [u8; 4] = [0xFF; 4];
/// Global brightness byte: three marker bits plus full brightness.
pub const APA102_BRIGHTNESS: u8 = 0xFF;
/// Clock held low after a frame so the LED latches it.
pub const APA102_LATCH_MS: u32 = 50;

/// Single APA102 pixel on two GPIOs.
pub struct Apa102<C, D, T> {
    clock: C,
    data: D,
    delay: T,
}

impl<C: OutputPin, D: OutputPin, T: DelayNs> Apa102<C, D, T> {
    pub fn new(mut clock: C, data: D, delay: T) -> Self {
        clock.set_low().ok();
        Self { clock, data, delay }
    }

    /// Shift one byte out, most significant bit first. Data is sampled on
    /// the rising clock edge.
    pub fn write_byte(&mut self, byte: u8) {
        let mut mask = 0x80u8;
        while mask != 0 {
            if byte & mask != 0 {
                self.data.set_high().ok();
            } else {
                self.data.set_low().ok();
            }
            self.clock.set_high().ok();
            self.clock.set_low().ok();
            mask >>= 1;
        }
    }

    pub fn release(self) -> (C, D, T) {
        (self.clock, self.data, self.delay)
    }
}

impl<C: OutputPin, D: OutputPin, T: DelayNs> ColorIndicator for Apa102<C, D, T> {
    fn set_color(&mut self, color: Rgb) {
        for byte in APA102_START_FRAME {
            self.write_byte(byte);
        }

        // Wire order is blue, green, red.
        self.write_byte(APA102_BRIGHTNESS);
        self.write_byte(color.b);
        self.write_byte(color.g);
        self.write_byte(color.r);

        for byte in APA102_END_FRAME {
            self.write_byte(byte);
        }

        self.delay.delay_ms(APA102_LATCH_MS);
    }
}

// --- Single-wire pixels ---

/// Sink for a timing-critical single-wire pixel transmission.
pub trait PixelBus {
    fn send(&mut self, bytes: &[u8]);
}

/// A strip of single-wire pixels all showing one color.
///
/// `BYTES` is the frame size: three bytes per pixel.
pub struct Neopixel<B, const BYTES: usize> {
    bus: B,
    frame: [u8; BYTES],
}

impl<B: PixelBus, const BYTES: usize> Neopixel<B, BYTES> {
    const WHOLE_PIXELS: () = assert!(BYTES % 3 == 0 && BYTES > 0);

    pub fn new(bus: B) -> Self {
        let () = Self::WHOLE_PIXELS;
        Self {
            bus,
            frame: [0; BYTES],
        }
    }

    /// Last frame sent, green-red-blue per pixel.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: PixelBus, const BYTES: usize> ColorIndicator for Neopixel<B, BYTES> {
    fn set_color(&mut self, color: Rgb) {
        for pixel in self.frame.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[color.g, color.r, color.b]);
        }
        self.bus.send(&self.frame);
    }
}
