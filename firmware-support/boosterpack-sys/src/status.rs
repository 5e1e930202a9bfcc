// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Test outcome reporting.
//!
//! Every diagnostic ends in a [`TestStatus`]. Internally the failure path
//! carries a [`TestError`] so the failed step can be reported, but callers
//! only ever see PASS or FAIL and the matching exit code.

use crate::console::ConsoleError;
use crate::gpio::GpioError;
use crate::i2s::I2sError;
use core::fmt::Write;
use core::panic::PanicInfo;
use embedded_hal::i2c::ErrorKind;
use ufmt::derive::uDebug;

/// Exit code reported for a passing test.
pub const EXIT_PASS: i32 = 0;
/// Exit code reported for a failing test.
pub const EXIT_FAIL: i32 = -1;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TestStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            TestStatus::Pass => EXIT_PASS,
            TestStatus::Fail => EXIT_FAIL,
        }
    }

    pub fn is_pass(self) -> bool {
        self == TestStatus::Pass
    }
}

impl<T> From<Result<T, TestError>> for TestStatus {
    fn from(result: Result<T, TestError>) -> Self {
        match result {
            Ok(_) => TestStatus::Pass,
            Err(_) => TestStatus::Fail,
        }
    }
}

/// Bus error classes, mirroring [`embedded_hal::i2c::ErrorKind`] so they can
/// derive `uDebug`.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BusError {
    Bus,
    ArbitrationLoss,
    NoAcknowledge,
    Overrun,
    Other,
}

impl From<ErrorKind> for BusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => BusError::Bus,
            ErrorKind::ArbitrationLoss => BusError::ArbitrationLoss,
            ErrorKind::NoAcknowledge(_) => BusError::NoAcknowledge,
            ErrorKind::Overrun => BusError::Overrun,
            _ => BusError::Other,
        }
    }
}

/// Why a diagnostic failed.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TestError {
    /// An I2C transfer failed.
    I2c(BusError),
    /// A GPIO pin could not be configured or driven.
    Gpio,
    /// The I2S port rejected a sample.
    I2s,
    /// A device did not answer on the bus.
    NoDevice { address: u8 },
    /// The OLED ran out of columns or was asked for a glyph it does not have.
    Display,
    /// The operator did not confirm the observed behaviour.
    Rejected,
    /// A console message could not be written.
    Console(ConsoleError),
}

impl TestError {
    /// Classify an I2C error.
    pub fn i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        TestError::I2c(err.kind().into())
    }
}

impl From<ConsoleError> for TestError {
    fn from(err: ConsoleError) -> Self {
        TestError::Console(err)
    }
}

impl From<GpioError> for TestError {
    fn from(_: GpioError) -> Self {
        TestError::Gpio
    }
}

impl From<I2sError> for TestError {
    fn from(_: I2sError) -> Self {
        TestError::I2s
    }
}

/// `StatusRegister` is the test status word watched by the test bench.
///
/// Firmware binaries have no host process to return to, so the exit code of
/// a diagnostic is published here instead.
#[derive(uDebug)]
pub struct StatusRegister {
    /// `status_addr` points at the status word.
    status_addr: *mut u32,
}

impl StatusRegister {
    const RUNNING: u32 = 0;
    const PASS: u32 = 1;
    const FAIL: u32 = 2;

    /// Create a new [`StatusRegister`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by either a memory mapped status register or at valid read-writable
    /// memory.
    pub const unsafe fn new(base_addr: *mut u8) -> StatusRegister {
        StatusRegister {
            status_addr: base_addr.cast(),
        }
    }

    pub fn set_running(&mut self) {
        unsafe { self.status_addr.write_volatile(Self::RUNNING) }
    }

    pub fn set_status(&mut self, status: TestStatus) {
        let word = match status {
            TestStatus::Pass => Self::PASS,
            TestStatus::Fail => Self::FAIL,
        };
        unsafe { self.status_addr.write_volatile(word) }
    }

    /// The status last published, `None` while the test is still running.
    pub fn status(&self) -> Option<TestStatus> {
        match unsafe { self.status_addr.read_volatile() } {
            Self::PASS => Some(TestStatus::Pass),
            Self::FAIL => Some(TestStatus::Fail),
            _ => None,
        }
    }
}

/// Body of the panic handler defined by [`status_panic!`]: report the panic on
/// `writer` and mark the test failed.
pub fn status_panic_internal<W: Write>(
    writer: &mut W,
    status: &mut StatusRegister,
    info: &PanicInfo,
) -> ! {
    let _ = writeln!(writer, "{info:?}");
    status.set_status(TestStatus::Fail);
    loop {
        continue;
    }
}

/// Define the panic handler of a diagnostic binary. A panic counts as a
/// failed test.
#[macro_export]
macro_rules! status_panic {
    ($writer:expr, $status:expr) => {
        #[panic_handler]
        fn status_panic(info: &::core::panic::PanicInfo) -> ! {
            let mut writer = $writer;
            let mut status = $status;
            $crate::status::status_panic_internal(&mut writer, &mut status, info);
        }
    };
}
