// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Memory mapped GPIO bank.
//!
//! One bit per pin in each register. The interrupt status register is write
//! one to clear.

use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use ufmt::derive::uDebug;

/// Set by the GPIO interrupt handler when SW3 is pressed.
pub static SW3_PRESSED: AtomicBool = AtomicBool::new(false);

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin(u8);

impl Pin {
    pub const SW3: Pin = Pin(13);
    pub const LED0: Pin = Pin(16);
    pub const LED1: Pin = Pin(17);
    pub const LED2: Pin = Pin(28);

    pub const COUNT: u8 = 32;

    pub const fn new(number: u8) -> Option<Pin> {
        if number < Self::COUNT {
            Some(Pin(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    const fn mask(self) -> u32 {
        1 << self.0
    }
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// The pin is not configured as an output.
    NotOutput(Pin),
}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(uDebug, Clone)]
pub struct Gpio {
    direction: *mut u32,
    output: *mut u32,
    input: *const u32,
    interrupt_enable: *mut u32,
    interrupt_edge: *mut u32,
    interrupt_status: *mut u32,
}

impl Gpio {
    /// Create a new [`Gpio`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by either a memory mapped GPIO bank or at valid read-writable memory.
    pub const unsafe fn new(base_addr: *mut u8) -> Gpio {
        let regs: *mut u32 = base_addr.cast();
        Gpio {
            direction: regs,
            output: regs.add(1),
            input: regs.add(2).cast_const(),
            interrupt_enable: regs.add(3),
            interrupt_edge: regs.add(4),
            interrupt_status: regs.add(5),
        }
    }

    fn update(reg: *mut u32, mask: u32, set: bool) {
        unsafe {
            let value = reg.read_volatile();
            reg.write_volatile(if set { value | mask } else { value & !mask });
        }
    }

    /// Configure the direction of a pin.
    pub fn config_bit(&mut self, pin: Pin, direction: Direction) {
        Self::update(self.direction, pin.mask(), direction == Direction::Output);
    }

    pub fn direction(&self, pin: Pin) -> Direction {
        if unsafe { self.direction.read_volatile() } & pin.mask() != 0 {
            Direction::Output
        } else {
            Direction::Input
        }
    }

    pub fn write(&mut self, pin: Pin, high: bool) -> Result<(), GpioError> {
        if self.direction(pin) != Direction::Output {
            return Err(GpioError::NotOutput(pin));
        }
        Self::update(self.output, pin.mask(), high);
        Ok(())
    }

    pub fn read(&self, pin: Pin) -> bool {
        unsafe { self.input.read_volatile() & pin.mask() != 0 }
    }

    pub fn enable_interrupt(&mut self, pin: Pin, edge: Edge) {
        Self::update(self.interrupt_edge, pin.mask(), edge == Edge::Falling);
        Self::update(self.interrupt_enable, pin.mask(), true);
    }

    pub fn disable_interrupt(&mut self, pin: Pin) {
        Self::update(self.interrupt_enable, pin.mask(), false);
    }

    pub fn interrupt_pending(&self, pin: Pin) -> bool {
        unsafe { self.interrupt_status.read_volatile() & pin.mask() != 0 }
    }

    pub fn clear_interrupt(&mut self, pin: Pin) {
        unsafe { self.interrupt_status.write_volatile(pin.mask()) }
    }

    /// Return every pin to an input with interrupts disabled.
    pub fn reset(&mut self) {
        unsafe {
            self.interrupt_enable.write_volatile(0);
            self.interrupt_status.write_volatile(u32::MAX);
            self.output.write_volatile(0);
            self.direction.write_volatile(0);
        }
    }

    /// Configure `pin` as an output, driven low, and hand out a handle to it.
    pub fn output_pin(&mut self, pin: Pin) -> GpioOutput {
        self.config_bit(pin, Direction::Output);
        Self::update(self.output, pin.mask(), false);
        GpioOutput {
            gpio: self.clone(),
            pin,
        }
    }

    /// Interrupt service routine body: if `pin` raised the interrupt,
    /// acknowledge it and set `flag`.
    pub fn service_interrupt(&mut self, pin: Pin, flag: &AtomicBool) -> bool {
        if !self.interrupt_pending(pin) {
            return false;
        }
        self.clear_interrupt(pin);
        flag.store(true, Ordering::Relaxed);
        true
    }
}

/// A single GPIO output, usable through [`OutputPin`].
#[derive(uDebug, Clone)]
pub struct GpioOutput {
    gpio: Gpio,
    pin: Pin,
}

impl GpioOutput {
    pub fn pin(&self) -> Pin {
        self.pin
    }
}

impl ErrorType for GpioOutput {
    type Error = GpioError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.write(self.pin, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.write(self.pin, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_range() {
        assert_eq!(Pin::new(31), Some(Pin(31)));
        assert_eq!(Pin::new(32), None);
        assert_eq!(Pin::LED2.number(), 28);
    }

    #[test]
    fn output_pins_drive_their_bit() {
        let mut regs = [0u32; 6];
        let mut gpio = unsafe { Gpio::new(regs.as_mut_ptr().cast()) };
        let mut led0 = gpio.output_pin(Pin::LED0);
        let mut led2 = gpio.output_pin(Pin::LED2);
        led0.set_high().unwrap();
        led2.set_high().unwrap();
        led0.set_low().unwrap();
        assert_eq!(regs[0], (1 << 16) | (1 << 28));
        assert_eq!(regs[1], 1 << 28);
    }

    #[test]
    fn writing_an_input_fails() {
        let mut regs = [0u32; 6];
        let mut gpio = unsafe { Gpio::new(regs.as_mut_ptr().cast()) };
        gpio.config_bit(Pin::SW3, Direction::Input);
        assert_eq!(gpio.write(Pin::SW3, true), Err(GpioError::NotOutput(Pin::SW3)));
    }

    #[test]
    fn interrupt_sets_flag_once_pending() {
        let mut regs = [0u32; 6];
        let mut gpio = unsafe { Gpio::new(regs.as_mut_ptr().cast()) };
        gpio.enable_interrupt(Pin::SW3, Edge::Rising);
        let flag = AtomicBool::new(false);
        assert!(!gpio.service_interrupt(Pin::SW3, &flag));
        assert!(!flag.load(Ordering::Relaxed));

        regs[5] = 1 << 13;
        let mut gpio = unsafe { Gpio::new(regs.as_mut_ptr().cast()) };
        assert!(gpio.service_interrupt(Pin::SW3, &flag));
        assert!(flag.load(Ordering::Relaxed));
        // RAM stand-in: the clear is the mask written back.
        assert_eq!(regs[5], 1 << 13);
        assert_eq!(regs[3], 1 << 13);
        assert_eq!(regs[4], 0);
    }
}
