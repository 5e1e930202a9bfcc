#![no_std]
#![cfg_attr(not(test), no_main)]

// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use ufmt::uwriteln;

use boosterpack_sys::character_device::{self, CharacterDevice};
use boosterpack_sys::console::log::{self as console_log, LogSink};
use boosterpack_sys::devices::aic3206::Aic3206;
use boosterpack_sys::diagnostics::audio_playback::audio_playback_test;
use boosterpack_sys::gpio::{Gpio, Pin, SW3_PRESSED};
use boosterpack_sys::i2c::I2C;
use boosterpack_sys::i2s::I2s;
use boosterpack_sys::platform::{init_platform, PlatformConfig};
use boosterpack_sys::status::StatusRegister;
use boosterpack_sys::sysctrl::SysCtrl;
use boosterpack_sys::time::Clock;
use boosterpack_sys::uart::Uart;
use log::{info, LevelFilter};
use riscv::register::{mcause, mepc, mie, mstatus, mtval};
#[cfg(not(test))]
use riscv_rt::entry;

const UART_ADDR: *const () = 0x8000_0000 as *const ();
const CHARACTER_DEVICE_ADDR: *mut u8 = 0x9000_0000 as *mut u8;
const STATUS_ADDR: *mut u8 = 0xA000_0000 as *mut u8;
const SYSCTRL_ADDR: *mut u8 = 0xB000_0000 as *mut u8;
const CLOCK_ADDR: *const u32 = 0xC000_0000 as *const u32;
const I2C_ADDR: *mut u8 = 0xD000_0000 as *mut u8;
const GPIO_ADDR: *mut u8 = 0xE000_0000 as *mut u8;
const I2S_ADDR: *mut u8 = 0xF000_0000 as *mut u8;

const CONFIG: PlatformConfig = PlatformConfig::from_features();

boosterpack_sys::status_panic!(unsafe { Uart::new(UART_ADDR) }, unsafe {
    StatusRegister::new(STATUS_ADDR)
});

#[cfg_attr(not(test), entry)]
fn main() -> ! {
    // Initialize peripherals.
    let mut status = unsafe { StatusRegister::new(STATUS_ADDR) };
    status.set_running();
    let mut uart = unsafe { Uart::new(UART_ADDR) };
    let mut sys = unsafe { SysCtrl::new(SYSCTRL_ADDR) };
    let mut clock = unsafe { Clock::new(CLOCK_ADDR) };
    let mut i2c = unsafe { I2C::new(I2C_ADDR) };
    let mut gpio = unsafe { Gpio::new(GPIO_ADDR) };
    let mut i2s = unsafe { I2s::new(I2S_ADDR) };

    unsafe {
        character_device::initialise(CHARACTER_DEVICE_ADDR);
        console_log::install(LogSink::for_route(CONFIG.route, uart.clone()), LevelFilter::Info);
    }
    let _ = uwriteln!(uart, "Start audio playback test");

    let mut console = init_platform(&mut sys, uart, CharacterDevice, &CONFIG);
    i2c.init(I2C::STANDARD_MODE_DIVIDER);
    let mut codec = Aic3206::new(&mut i2c, &mut clock);

    // SW3 is delivered as a machine external interrupt.
    unsafe {
        mie::set_mext();
        mstatus::set_mie();
    }

    let result = audio_playback_test(
        &mut console,
        &mut sys,
        &mut codec,
        &mut i2s,
        &mut gpio,
        &SW3_PRESSED,
        &CONFIG,
    );
    status.set_status(result);
    info!("exit code {}", result.exit_code());

    loop {
        continue;
    }
}

#[export_name = "MachineExternal"]
fn machine_external() {
    let mut gpio = unsafe { Gpio::new(GPIO_ADDR) };
    if !gpio.service_interrupt(Pin::SW3, &SW3_PRESSED) {
        info!("unexpected external interrupt");
    }
}

#[export_name = "ExceptionHandler"]
fn exception_handler(_trap_frame: &riscv_rt::TrapFrame) -> ! {
    let mut uart = unsafe { Uart::new(UART_ADDR) };
    let mut status = unsafe { StatusRegister::new(STATUS_ADDR) };
    riscv::interrupt::free(|| {
        let _ = uwriteln!(uart, "... caught an exception. Looping forever now.\n");
        info!("mcause: {:?}\n", mcause::read());
        info!("mepc: {:?}\n", mepc::read());
        info!("mtval: {:?}\n", mtval::read());
    });
    status.set_status(boosterpack_sys::status::TestStatus::Fail);
    loop {
        continue;
    }
}
