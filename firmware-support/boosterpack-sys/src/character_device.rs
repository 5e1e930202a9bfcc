// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Local debug console.
//!
//! Bytes written to the device show up on the debugger's console. Input is
//! read from the word after the output register; bit 8 flags a valid byte.

use crate::console::ConsoleInput;

static mut DEVICE_ADDR: Option<*mut u8> = None;

const INPUT_VALID: u32 = 1 << 8;

pub struct CharacterDevice;

/// Initialises the character device
///
/// # Safety
///
/// The `character_device_addr` argument must be the address of the character
/// device interface.
pub unsafe fn initialise(character_device_addr: *mut u8) -> bool {
    if DEVICE_ADDR.is_some() {
        return false;
    }

    DEVICE_ADDR = Some(character_device_addr);

    true
}

fn device_addr() -> Option<*mut u8> {
    // SAFETY: this RISC-V implementation does not support multiple threads
    //         of execution, so the access is essentially thread-local.
    unsafe { DEVICE_ADDR }
}

impl CharacterDevice {
    fn write_bytes(&mut self, s: &str) -> Result<(), ()> {
        let addr = device_addr().ok_or(())?;

        for b in s.bytes() {
            // SAFETY: the address has been set by the `initialise` function, so
            //         that the option is `Some` and contains a valid pointer.
            unsafe {
                core::ptr::write_volatile(addr, b);
            }
        }
        Ok(())
    }
}

impl ufmt::uWrite for CharacterDevice {
    type Error = ();

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_bytes(s)
    }
}

impl core::fmt::Write for CharacterDevice {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s).map_err(|_| core::fmt::Error)
    }
}

impl ConsoleInput for CharacterDevice {
    /// Blocks until the debugger supplies a byte. Without an initialised
    /// device this returns NUL, which no prompt accepts.
    fn read_byte(&mut self) -> u8 {
        let Some(addr) = device_addr() else {
            return 0;
        };
        let input: *const u32 = unsafe { addr.add(4).cast() };
        loop {
            let word = unsafe { input.read_volatile() };
            if word & INPUT_VALID != 0 {
                return word as u8;
            }
        }
    }
}

