#![no_std]
#![cfg_attr(not(test), no_main)]

// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use ufmt::uwriteln;

use boosterpack_sys::character_device::{self, CharacterDevice};
use boosterpack_sys::console::log::{self as console_log, LogSink};
use boosterpack_sys::diagnostics::led::{led_test, Leds};
use boosterpack_sys::gpio::{Gpio, Pin};
use boosterpack_sys::platform::{init_platform, PlatformConfig};
use boosterpack_sys::status::StatusRegister;
use boosterpack_sys::sysctrl::SysCtrl;
use boosterpack_sys::time::Clock;
use boosterpack_sys::uart::Uart;
use log::LevelFilter;
#[cfg(not(test))]
use riscv_rt::entry;

const UART_ADDR: *const () = 0x8000_0000 as *const ();
const CHARACTER_DEVICE_ADDR: *mut u8 = 0x9000_0000 as *mut u8;
const STATUS_ADDR: *mut u8 = 0xA000_0000 as *mut u8;
const SYSCTRL_ADDR: *mut u8 = 0xB000_0000 as *mut u8;
const CLOCK_ADDR: *const u32 = 0xC000_0000 as *const u32;
const GPIO_ADDR: *mut u8 = 0xE000_0000 as *mut u8;

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
    let mut gpio = unsafe { Gpio::new(GPIO_ADDR) };

    unsafe {
        character_device::initialise(CHARACTER_DEVICE_ADDR);
        console_log::install(LogSink::for_route(CONFIG.route, uart.clone()), LevelFilter::Info);
    }
    let _ = uwriteln!(uart, "Start LED test");

    let mut console = init_platform(&mut sys, uart, CharacterDevice, &CONFIG);
    gpio.reset();
    let mut leds = Leds {
        led0: gpio.output_pin(Pin::LED0),
        led1: gpio.output_pin(Pin::LED1),
        led2: gpio.output_pin(Pin::LED2),
    };

    let result = led_test(&mut console, &mut sys, &mut leds, &mut clock, &CONFIG);
    status.set_status(result);
    log::info!("exit code {}", result.exit_code());

    loop {
        continue;
    }
}
