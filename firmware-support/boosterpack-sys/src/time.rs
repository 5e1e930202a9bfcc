// SPDX-FileCopyrightText: 2023 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Blocking waits on the free running cycle counter.
//!
//! The diagnostics only need time for pacing: settle delays between register
//! operations, display hold times and LED on-times. [`Clock`] is the
//! [`DelayNs`] implementation handed to the device drivers.

use embedded_hal::delay::DelayNs;
use ufmt::derive::uDebug;

/// A relative time, stored in microseconds.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    micros: u64,
}

impl Duration {
    pub const fn from_micros(micros: u64) -> Duration {
        Duration { micros }
    }

    pub const fn from_millis(millis: u64) -> Duration {
        Duration {
            micros: millis * 1_000,
        }
    }

    /// Counter cycles spanned at `frequency` hertz, rounded down.
    pub const fn to_cycles(&self, frequency: u64) -> u64 {
        self.micros * frequency / 1_000_000
    }
}

/// Timer peripheral: a freeze register, then the 64 bit cycle counter and
/// its frequency in hertz, each at an 8 byte offset.
///
/// Writing the freeze register latches the counter so both halves are read
/// from the same instant.
#[derive(uDebug, Clone)]
pub struct Clock {
    freeze: *mut u32,
    counter: *const u64,
    frequency: *const u64,
}

impl Clock {
    /// Create a new [`Clock`] instance given a base address.
    ///
    /// # Safety
    ///
    /// `addr` needs to point to a mapped timer peripheral, or to 8 byte
    /// aligned read-writable memory of at least 24 bytes.
    pub const unsafe fn new(addr: *const u32) -> Clock {
        Clock {
            freeze: addr.cast_mut(),
            counter: addr.add(2).cast(),
            frequency: addr.add(4).cast(),
        }
    }

    /// Latch and read the cycle counter.
    pub fn cycles(&self) -> u64 {
        unsafe {
            self.freeze.write_volatile(0);
            self.counter.read_volatile()
        }
    }

    /// Counter frequency in hertz.
    pub fn frequency(&self) -> u64 {
        unsafe { self.frequency.read_volatile() }
    }

    /// Busy wait for at least `duration`.
    pub fn wait(&self, duration: Duration) {
        let deadline = self.cycles() + duration.to_cycles(self.frequency());
        while self.cycles() < deadline {}
    }
}

impl DelayNs for Clock {
    fn delay_ns(&mut self, ns: u32) {
        self.wait(Duration::from_micros(u64::from(ns).div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.wait(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(Duration::from_millis(ms.into()));
    }
}
