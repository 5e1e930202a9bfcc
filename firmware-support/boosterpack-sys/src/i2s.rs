// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! I2S transmit port for the audio codec.

use ufmt::derive::uDebug;

/// Synchronous stereo sample output.
pub trait I2sTransmit {
    type Error;

    /// Configure and enable the port.
    fn open(&mut self, config: &I2sConfig);
    /// Disable the port.
    fn close(&mut self);

    /// Write a left channel sample, waiting until the port can take it.
    fn write_left(&mut self, sample: i16) -> Result<(), Self::Error>;
    /// Write the right channel sample of the same frame.
    fn write_right(&mut self, sample: i16) -> Result<(), Self::Error>;
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum I2sError {
    /// The port is not enabled.
    Closed,
    FrameSync,
    Underrun,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum WordLength {
    Bits16,
    Bits32,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct I2sConfig {
    pub stereo: bool,
    /// Bit and frame clocks are driven by the codec.
    pub slave: bool,
    pub word_length: WordLength,
    /// Data starts one bit clock after the frame sync edge.
    pub one_bit_delay: bool,
    pub pack: bool,
    pub fs_active_low: bool,
    /// Data is clocked out on the rising bit clock edge.
    pub rising_edge: bool,
    pub error_detection: bool,
}

impl I2sConfig {
    /// Settings the AIC3206 is programmed for.
    pub const CODEC: I2sConfig = I2sConfig {
        stereo: true,
        slave: true,
        word_length: WordLength::Bits32,
        one_bit_delay: true,
        pack: true,
        fs_active_low: true,
        rising_edge: true,
        error_detection: true,
    };

    fn control_word(&self) -> u32 {
        let mut word = CTRL_ENABLE;
        if !self.stereo {
            word |= 1 << 1;
        }
        if !self.slave {
            word |= 1 << 2;
        }
        if self.word_length == WordLength::Bits32 {
            word |= 1 << 3;
        }
        if self.one_bit_delay {
            word |= 1 << 5;
        }
        if self.pack {
            word |= 1 << 6;
        }
        if !self.fs_active_low {
            word |= 1 << 7;
        }
        if !self.rising_edge {
            word |= 1 << 8;
        }
        if self.error_detection {
            word |= 1 << 9;
        }
        word
    }
}

const CTRL_ENABLE: u32 = 1;

const STATUS_TX_READY: u32 = 1 << 0;
const STATUS_FSYNC_ERROR: u32 = 1 << 1;
const STATUS_UNDERRUN: u32 = 1 << 2;

#[derive(uDebug)]
pub struct I2s {
    control: *mut u32,
    status: *const u32,
    left: *mut u32,
    right: *mut u32,
}

impl I2s {
    /// Create a new [`I2s`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by either a memory mapped I2S port or at valid read-writable memory.
    pub const unsafe fn new(base_addr: *mut u8) -> I2s {
        let regs: *mut u32 = base_addr.cast();
        I2s {
            control: regs,
            status: regs.add(1).cast_const(),
            left: regs.add(2),
            right: regs.add(3),
        }
    }

    pub fn is_open(&self) -> bool {
        unsafe { self.control.read_volatile() & CTRL_ENABLE != 0 }
    }

    fn check_errors(&self) -> Result<u32, I2sError> {
        if !self.is_open() {
            return Err(I2sError::Closed);
        }
        let status = unsafe { self.status.read_volatile() };
        if status & STATUS_FSYNC_ERROR != 0 {
            Err(I2sError::FrameSync)
        } else if status & STATUS_UNDERRUN != 0 {
            Err(I2sError::Underrun)
        } else {
            Ok(status)
        }
    }
}

/// Samples are left justified in the 32 bit slot.
fn slot(sample: i16) -> u32 {
    ((sample as i32) << 16) as u32
}

impl I2sTransmit for I2s {
    type Error = I2sError;

    fn open(&mut self, config: &I2sConfig) {
        log::debug!("i2s: open {:?}", config);
        unsafe { self.control.write_volatile(config.control_word()) }
    }

    fn close(&mut self) {
        unsafe { self.control.write_volatile(0) }
    }

    fn write_left(&mut self, sample: i16) -> Result<(), I2sError> {
        while self.check_errors()? & STATUS_TX_READY == 0 {}
        unsafe { self.left.write_volatile(slot(sample)) }
        Ok(())
    }

    fn write_right(&mut self, sample: i16) -> Result<(), I2sError> {
        self.check_errors()?;
        unsafe { self.right.write_volatile(slot(sample)) }
        Ok(())
    }
}
