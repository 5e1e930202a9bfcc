// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! TLV320AIC3206 audio codec.
//!
//! Registers are paged; writing register 0 selects the page for the
//! following writes. Each write is `[register & 0x7F, value]` to
//! [`AIC3206_ADDR`] and is preceded by a 3 ms pause.

use crate::i2s::I2sTransmit;
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const AIC3206_ADDR: u8 = 0x18;

const WRITE_DELAY_MS: u32 = 3;

/// One step of a codec register sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodecOp {
    Write { register: u8, value: u8 },
    WaitMs(u32),
}

const fn page(page: u8) -> CodecOp {
    write(0, page)
}

const fn write(register: u8, value: u8) -> CodecOp {
    CodecOp::Write { register, value }
}

/// Headphone playback from a 12.288 MHz PLL clock with the ADC path from IN2
/// powered as well.
pub const PLAYBACK_CONFIG: &[CodecOp] = &[
    page(0),
    // Soft reset.
    write(1, 0x01),
    CodecOp::WaitMs(1),
    page(1),
    // Crude AVDD off, analog blocks on LDO power.
    write(1, 0x08),
    write(2, 0x01),
    // Reference power-up in 40 ms.
    write(123, 0x05),
    CodecOp::WaitMs(40),
    page(0),
    // BCLK and WCLK outputs, zero data offset.
    write(27, 0x0D),
    write(28, 0x00),
    // PLL from MCLK, J = 7, D = 1680.
    write(4, 0x03),
    write(6, 0x07),
    write(7, 0x06),
    write(8, 0x90),
    // BCLK = DAC_CLK / 8, 32 bit clocks per frame.
    write(30, 0x88),
    // PLL on, P = 1, R = 1.
    write(5, 0x91),
    CodecOp::WaitMs(10),
    // DOSR = 128, AOSR = 128.
    write(13, 0x00),
    write(14, 0x80),
    write(20, 0x80),
    // NDAC = 2, MDAC = 7, NADC = 7, MADC = 2, all powered.
    write(11, 0x82),
    write(12, 0x87),
    write(18, 0x87),
    write(19, 0x82),
    page(1),
    // DAC to HPL and HPR.
    write(12, 0x08),
    write(13, 0x08),
    page(0),
    // Right volume tracks left, 0 dB, data paths on.
    write(64, 0x02),
    write(65, 0x00),
    write(63, 0xD4),
    page(1),
    // HPL and HPR unmuted at 0 dB and powered.
    write(16, 0x00),
    write(17, 0x00),
    write(9, 0x30),
    CodecOp::WaitMs(1),
    page(1),
    // IN2 to the ADC positive inputs, CM to the negative ones.
    write(52, 0x30),
    write(55, 0x30),
    write(54, 0x03),
    write(57, 0xC0),
    // MIC PGA unmuted.
    write(59, 0x00),
    write(60, 0x00),
    page(0),
    // ADCs powered and unmuted.
    write(81, 0xC0),
    write(82, 0x00),
    page(0),
    CodecOp::WaitMs(1),
];

/// Soft reset, leaving the codec in its power-on state.
pub const CODEC_RESET: &[CodecOp] = &[page(0), write(1, 0x01)];

/// One period of a full scale sine, 48 samples. At 48 kHz this is a 1 kHz tone.
#[rustfmt::skip]
pub const SINE_TABLE: [i16; 48] = [
    0, 4276, 8480, 12539, 16383, 19946, 23169, 25995,
    28376, 30271, 31649, 32485, 32765, 32485, 31649, 30447,
    28376, 25995, 23169, 19946, 16383, 12539, 8480, 4276,
    0, -4276, -8480, -12538, -16382, -19946, -23169, -25995,
    -28376, -30271, -31649, -32485, -32766, -32485, -31649, -30271,
    -28376, -25994, -23169, -19946, -16382, -12538, -8480, -4276,
];

/// Length of a tone in table periods.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToneConfig {
    pub seconds: u32,
    pub periods_per_second: u32,
}

impl ToneConfig {
    pub const fn seconds(seconds: u32) -> ToneConfig {
        ToneConfig {
            seconds,
            periods_per_second: 5000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToneOutcome {
    Completed,
    /// The stop flag was raised; holds the number of periods played.
    Stopped(u32),
}

/// Stream the sine table on both channels until the tone is complete or
/// `stop` is raised. `stop` is checked after every table period.
pub fn play_tone<T: I2sTransmit>(
    i2s: &mut T,
    tone: &ToneConfig,
    stop: &AtomicBool,
) -> Result<ToneOutcome, T::Error> {
    let periods = tone.seconds * tone.periods_per_second;
    for period in 0..periods {
        for &sample in SINE_TABLE.iter() {
            i2s.write_left(sample)?;
            i2s.write_right(sample)?;
        }
        if stop.load(Ordering::Relaxed) {
            return Ok(ToneOutcome::Stopped(period + 1));
        }
    }
    Ok(ToneOutcome::Completed)
}

pub struct Aic3206<I, D> {
    i2c: I,
    delay: D,
}

impl<I: I2c, D: DelayNs> Aic3206<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Aic3206 { i2c, delay }
    }

    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    pub fn write(&mut self, register: u8, value: u8) -> Result<(), I::Error> {
        self.delay.delay_ms(WRITE_DELAY_MS);
        log::trace!("aic3206: [{}] <- {:#04X}", register, value);
        self.i2c.write(AIC3206_ADDR, &[register & 0x7F, value])
    }

    /// Run `ops` in order, stopping at the first failed write.
    pub fn run(&mut self, ops: &[CodecOp]) -> Result<(), I::Error> {
        for op in ops {
            match *op {
                CodecOp::Write { register, value } => self.write(register, value)?,
                CodecOp::WaitMs(ms) => self.delay.delay_ms(ms),
            }
        }
        Ok(())
    }

    pub fn configure_playback(&mut self) -> Result<(), I::Error> {
        log::debug!("aic3206: playback config");
        self.run(PLAYBACK_CONFIG)
    }

    pub fn reset(&mut self) -> Result<(), I::Error> {
        self.run(CODEC_RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2s::I2sConfig;

    #[derive(Default)]
    struct Recorder {
        left: usize,
        right: usize,
        fail_at: Option<usize>,
    }

    impl I2sTransmit for Recorder {
        type Error = ();

        fn open(&mut self, _config: &I2sConfig) {}

        fn close(&mut self) {}

        fn write_left(&mut self, _sample: i16) -> Result<(), ()> {
            if Some(self.left) == self.fail_at {
                return Err(());
            }
            self.left += 1;
            Ok(())
        }

        fn write_right(&mut self, _sample: i16) -> Result<(), ()> {
            self.right += 1;
            Ok(())
        }
    }

    #[test]
    fn sine_period_shape() {
        assert_eq!(SINE_TABLE[0], 0);
        assert_eq!(SINE_TABLE[24], 0);
        assert_eq!(SINE_TABLE.iter().max(), Some(&32765));
        assert_eq!(SINE_TABLE.iter().min(), Some(&-32766));
        assert!(SINE_TABLE[1..24].iter().all(|&s| s > 0));
        assert!(SINE_TABLE[25..].iter().all(|&s| s < 0));
    }

    #[test]
    fn full_tone_length() {
        let mut i2s = Recorder::default();
        let tone = ToneConfig {
            seconds: 2,
            periods_per_second: 3,
        };
        let stop = AtomicBool::new(false);
        assert_eq!(play_tone(&mut i2s, &tone, &stop), Ok(ToneOutcome::Completed));
        assert_eq!(i2s.left, 2 * 3 * 48);
        assert_eq!(i2s.right, i2s.left);
    }

    #[test]
    fn stop_flag_ends_after_current_period() {
        let mut i2s = Recorder::default();
        let stop = AtomicBool::new(true);
        assert_eq!(
            play_tone(&mut i2s, &ToneConfig::seconds(5), &stop),
            Ok(ToneOutcome::Stopped(1))
        );
        assert_eq!(i2s.left, 48);
    }

    #[test]
    fn transmit_error_aborts() {
        let mut i2s = Recorder {
            fail_at: Some(10),
            ..Default::default()
        };
        let stop = AtomicBool::new(false);
        assert_eq!(play_tone(&mut i2s, &ToneConfig::seconds(1), &stop), Err(()));
        assert_eq!(i2s.right, 10);
    }

    #[test]
    fn config_delays() {
        let waits: u32 = PLAYBACK_CONFIG
            .iter()
            .map(|op| match op {
                CodecOp::WaitMs(ms) => *ms,
                CodecOp::Write { .. } => 0,
            })
            .sum();
        assert_eq!(waits, 1 + 40 + 10 + 1 + 1);
        assert_eq!(PLAYBACK_CONFIG.first(), Some(&page(0)));
    }
}
