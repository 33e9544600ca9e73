// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! UF2 bootloader runtime for RP2040: double-tap entry, breathing status
//! LED and the warm-reset hand-off to the application.

#![no_std]
#![no_main]

mod board;
mod boot;
mod state;

use cortex_m_rt::entry;
use defmt_rtt as _;
use embedded_hal::digital::InputPin;
use panic_probe as _;
use uf2boot_core::layout::MODE_SELECT_ADDR;
use uf2boot_core::mode_select::{ScbReset, NONE};
use uf2boot_core::{
    decide_boot, BootAction, BootInputs, ColorIndicator, DiagnosticLog, ModeSelect, RetainedWord,
    Rgb, WordCell,
};

use crate::board::{Board, DOUBLE_TAP_WINDOW_MS, RESET_HORIZON_TICKS};
use crate::state::{with_log, IsrResources, RUNTIME};

defmt::timestamp!("{=u32:ms}", RUNTIME.time.now());

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

#[entry]
fn main() -> ! {
    defmt::println!("Bootloader init");

    let mut board = board::init();
    // Lit from reset on, including the double-tap wait.
    RUNTIME.indicator.drive(&mut board.led_pin);
    // SAFETY: the linker scripts keep this word out of RAM; this is the
    // only handle to it.
    let mut word = unsafe { RetainedWord::at(MODE_SELECT_ADDR) };

    let inputs = BootInputs {
        word: word.read(),
        app_valid: boot::application_is_valid(),
        power_on_reset: board.power_on_reset,
        boot_pin_held: board.boot_pin.is_low().unwrap_or(false),
    };
    let plan = decide_boot(&inputs);
    defmt::println!(
        "word=0x{:08x} app_valid={} por={} pin={} -> {}",
        inputs.word,
        inputs.app_valid,
        inputs.power_on_reset,
        inputs.boot_pin_held,
        plan.action
    );

    if let Some(next) = plan.write_word {
        word.write(next);
    }

    match plan.action {
        BootAction::StartApplication => unsafe { boot::start_application() },
        BootAction::AwaitDoubleTap => {
            // A reset during this wait finds MAGIC and stays resident.
            RUNTIME
                .delay(board.sys_clock_mhz)
                .delay(DOUBLE_TAP_WINDOW_MS);
            word.write(NONE);
            unsafe { boot::start_application() }
        }
        BootAction::StayInBootloader => run_resident(board, word, &inputs),
    }
}

/// Stay in the bootloader: breathe the LED from SysTick and watch the boot
/// pin. A press schedules the reset into the application.
fn run_resident(board: Board, word: RetainedWord, inputs: &BootInputs) -> ! {
    defmt::println!("Bootloader resident");
    with_log(|log| {
        log.log_reset();
        log.append_line("Bootloader resident");
        log.append_labeled_value("MODE", inputs.word);
        log.append_labeled_value("POR", inputs.power_on_reset as u32);
        log.append_labeled_value("APP", inputs.app_valid as u32);
    });

    let Board {
        led_pin,
        mut boot_pin,
        mut color,
        syst,
        ..
    } = board;

    color.set_color(Rgb::START);
    let mode_select = ModeSelect::new(word, ScbReset, &RUNTIME.indicator, color);
    state::install(IsrResources {
        led: led_pin,
        mode_select,
    });
    board::start_systick(syst);

    let mut was_pressed = boot_pin.is_low().unwrap_or(false);
    loop {
        let pressed = boot_pin.is_low().unwrap_or(false);
        if pressed && !was_pressed {
            leave_on_press(inputs.app_valid);
        }
        was_pressed = pressed;
        cortex_m::asm::wfi();
    }
}

fn leave_on_press(app_valid: bool) {
    if !app_valid {
        defmt::warn!("Boot pin pressed, no valid application");
        with_log(|log| log.append_line("NO APP"));
        RUNTIME.signal_activity();
        return;
    }
    if RUNTIME.time.horizon() != 0 {
        return;
    }

    let at = RUNTIME.time.now().wrapping_add(RESET_HORIZON_TICKS);
    defmt::info!("Boot pin pressed, leaving at {=u32}", at);
    with_log(|log| log.append_labeled_value("LEAVE AT", at));
    RUNTIME.signal_activity();
    RUNTIME.arm_reset_horizon(RESET_HORIZON_TICKS);
}
