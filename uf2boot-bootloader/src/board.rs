// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board bring-up for the bootloader: clocks, pins and the SysTick timer.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use rp2040_hal as hal;
use rp2040_hal::Clock;
use uf2boot_core::halt::{HALT_CLOCK_INIT, HALT_PERIPHERALS_TAKEN};
use uf2boot_core::is_power_on_reset;

use crate::state;

pub const XTAL_FREQ_HZ: u32 = 12_000_000;

/// SysTick fires at 10 kHz with the 125 MHz system clock.
pub const SYSTICK_RELOAD: u32 = 12_500 - 1;

/// Interrupts per high-order tick: one tick per millisecond.
pub const TIMER_STEP: u32 = 10;

/// Milliseconds between a leave request and the reset into the application.
pub const RESET_HORIZON_TICKS: u32 = 1_500;

/// A second reset inside this window keeps the bootloader resident.
pub const DOUBLE_TAP_WINDOW_MS: u32 = 500;

pub type LedPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio25, hal::gpio::FunctionSioOutput, hal::gpio::PullDown>;
pub type BootPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio2, hal::gpio::FunctionSioInput, hal::gpio::PullUp>;

#[cfg(feature = "apa102")]
pub type RgbClockPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio3, hal::gpio::FunctionSioOutput, hal::gpio::PullDown>;
#[cfg(feature = "apa102")]
pub type RgbDataPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio4, hal::gpio::FunctionSioOutput, hal::gpio::PullDown>;

#[cfg(feature = "apa102")]
pub type BoardColor =
    uf2boot_core::rgb::Apa102<RgbClockPin, RgbDataPin, uf2boot_core::BusyDelay<'static>>;
#[cfg(not(feature = "apa102"))]
pub type BoardColor = uf2boot_core::NoColorIndicator;

pub struct Board {
    pub led_pin: LedPin,
    pub boot_pin: BootPin,
    pub color: BoardColor,
    pub syst: SYST,
    pub sys_clock_mhz: u32,
    /// First boot since power-up. A RUN pin reset counts as warm.
    pub power_on_reset: bool,
}

// Watchdog scratch registers survive soft resets and are cleared by
// power-on and the RUN pin. Applications must leave SCRATCH0 alone.
const WATCHDOG_SCRATCH0: *mut u32 = (0x4005_8000 + 0x0C) as *mut u32;
const WARM_CANARY: u32 = 0xB007_C0DE;

/// Report whether the warm marker was present, then set it for the next
/// reset.
fn take_warm_marker() -> bool {
    unsafe {
        let warm = WATCHDOG_SCRATCH0.read_volatile() == WARM_CANARY;
        WATCHDOG_SCRATCH0.write_volatile(WARM_CANARY);
        warm
    }
}

pub fn init() -> Board {
    let warm_marker = take_warm_marker();

    let Some(mut pac) = hal::pac::Peripherals::take() else {
        state::halt_with(HALT_PERIPHERALS_TAKEN)
    };
    let Some(core) = hal::pac::CorePeripherals::take() else {
        state::halt_with(HALT_PERIPHERALS_TAKEN)
    };

    let had_por = pac.VREG_AND_CHIP_RESET.chip_reset().read().had_por().bit_is_set();
    let power_on_reset = is_power_on_reset(had_por, warm_marker);

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let Ok(clocks) = hal::clocks::init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ) else {
        state::halt_with(HALT_CLOCK_INIT)
    };
    let sys_clock_mhz = clocks.system_clock.freq().to_MHz();

    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    #[cfg(feature = "apa102")]
    let color = uf2boot_core::rgb::Apa102::new(
        pins.gpio3.into_push_pull_output(),
        pins.gpio4.into_push_pull_output(),
        state::RUNTIME.delay(sys_clock_mhz),
    );
    #[cfg(not(feature = "apa102"))]
    let color = uf2boot_core::NoColorIndicator;

    Board {
        led_pin: pins.gpio25.into_push_pull_output(),
        boot_pin: pins.gpio2.into_pull_up_input(),
        color,
        syst: core.SYST,
        sys_clock_mhz,
        power_on_reset,
    }
}

/// Start the periodic interrupt that drives [`state::RUNTIME`].
pub fn start_systick(mut syst: SYST) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(SYSTICK_RELOAD);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}
