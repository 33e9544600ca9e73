// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Application image that blinks the status LED with the calibrated busy
//! wait. A 100 ms on/off cadence on a scope confirms the calibration and
//! that the bootloader handed off cleanly.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt_rtt as _;
use embedded_hal::digital::StatefulOutputPin;
use panic_probe as _;
use rp2040_hal as hal;
use rp2040_hal::Clock;
use uf2boot_core::{BusyDelay, Indicator};

defmt::timestamp!("{=u64:us}", { 0 });

const XTAL_FREQ_HZ: u32 = 12_000_000;
const BLINK_MS: u32 = 100;

// Never ticked: the delay uses the idle calibration.
static INDICATOR: Indicator = Indicator::new();

#[entry]
fn main() -> ! {
    defmt::println!("Test application started");

    let mut pac = hal::pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .unwrap();

    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let mut led_pin = pins.gpio25.into_push_pull_output();

    let delay = BusyDelay::new(&INDICATOR, clocks.system_clock.freq().to_MHz());
    defmt::println!("Blinking every {=u32} ms", BLINK_MS);

    loop {
        let _ = led_pin.toggle();
        delay.delay(BLINK_MS);
    }
}
