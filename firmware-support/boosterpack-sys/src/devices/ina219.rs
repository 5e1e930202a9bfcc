// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! INA219 current and power monitors on the board's supply rails.
//!
//! Registers are 16 bit big endian. A write is `[register, hi, lo]`, a read
//! selects the register with a one byte write and then reads two bytes.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const REG_CONFIG: u8 = 0x00;
pub const REG_SHUNT_VOLTAGE: u8 = 0x01;
pub const REG_BUS_VOLTAGE: u8 = 0x02;
pub const REG_POWER: u8 = 0x03;
pub const REG_CURRENT: u8 = 0x04;
pub const REG_CALIBRATION: u8 = 0x05;

/// 32 V bus range, ±320 mV shunt range, 12 bit 128 sample averaging,
/// continuous shunt and bus conversion.
pub const CONFIG_VALUE: u16 = 0x3F9F;

/// A monitored supply rail.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rail {
    pub name: &'static str,
    pub address: u8,
    pub calibration: u16,
    /// Current register LSB in mA.
    pub current_lsb: f32,
    /// Extra factor applied to power and current readouts.
    pub readout_scale: f32,
}

pub const CVDD: Rail = Rail {
    name: "CVDD",
    address: 0x40,
    calibration: 0x6C41,
    current_lsb: 0.001_477_966_3,
    readout_scale: 1.0,
};

pub const LDOI: Rail = Rail {
    name: "LDOI",
    address: 0x41,
    calibration: 0x596C,
    current_lsb: 0.001_673_980_71,
    readout_scale: 1.0,
};

pub const DSP_DVDDIO: Rail = Rail {
    name: "DSP_DVDDIO",
    address: 0x44,
    calibration: 0xBF7F,
    current_lsb: 0.000_417_755_126,
    readout_scale: 2.0,
};

pub const VCC3V3_USB: Rail = Rail {
    name: "VCC3V3_USB",
    address: 0x48,
    calibration: 0x93C5,
    current_lsb: 0.000_541_381_83,
    readout_scale: 2.0,
};

/// Rails in the order they are tested.
pub const RAILS: [Rail; 4] = [CVDD, LDOI, DSP_DVDDIO, VCC3V3_USB];

/// Shunt voltage in mV. The sign bit is dropped.
pub fn shunt_voltage_mv(raw: u16) -> f32 {
    f32::from(raw & 0x7FFF) * 0.01
}

/// Bus voltage in V. The low three bits are status flags.
pub fn bus_voltage_v(raw: u16) -> f32 {
    f32::from(raw >> 3) * 0.004
}

/// Power in mW.
pub fn power_mw(rail: &Rail, raw: u16) -> f32 {
    rail.current_lsb * 20.0 * f32::from(raw) * rail.readout_scale
}

/// Current in mA. The sign bit is dropped.
pub fn current_ma(rail: &Rail, raw: u16) -> f32 {
    rail.current_lsb * f32::from(raw & 0x7FFF) * rail.readout_scale
}

pub struct Ina219<I, D> {
    i2c: I,
    delay: D,
    /// Pause after every register operation.
    settle_us: u32,
}

impl<I: I2c, D: DelayNs> Ina219<I, D> {
    pub fn new(i2c: I, delay: D, settle_us: u32) -> Self {
        Ina219 {
            i2c,
            delay,
            settle_us,
        }
    }

    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    pub fn write_register(&mut self, address: u8, register: u8, value: u16) -> Result<(), I::Error> {
        let [hi, lo] = value.to_be_bytes();
        log::trace!("ina219 0x{:02X}: [{:#04X}] <- {:#06X}", address, register, value);
        let result = self.i2c.write(address, &[register, hi, lo]);
        self.delay.delay_us(self.settle_us);
        result
    }

    pub fn read_register(&mut self, address: u8, register: u8) -> Result<u16, I::Error> {
        let mut buf = [0u8; 2];
        let result = self.i2c.write_read(address, &[register], &mut buf);
        self.delay.delay_us(self.settle_us);
        result?;
        let value = u16::from_be_bytes(buf);
        log::trace!("ina219 0x{:02X}: [{:#04X}] -> {:#06X}", address, register, value);
        Ok(value)
    }

    pub fn write_config(&mut self, rail: &Rail) -> Result<(), I::Error> {
        self.write_register(rail.address, REG_CONFIG, CONFIG_VALUE)
    }

    pub fn write_calibration(&mut self, rail: &Rail) -> Result<(), I::Error> {
        self.write_register(rail.address, REG_CALIBRATION, rail.calibration)
    }

    pub fn shunt_voltage(&mut self, rail: &Rail) -> Result<f32, I::Error> {
        self.read_register(rail.address, REG_SHUNT_VOLTAGE)
            .map(shunt_voltage_mv)
    }

    pub fn bus_voltage(&mut self, rail: &Rail) -> Result<f32, I::Error> {
        self.read_register(rail.address, REG_BUS_VOLTAGE)
            .map(bus_voltage_v)
    }

    pub fn power(&mut self, rail: &Rail) -> Result<f32, I::Error> {
        self.read_register(rail.address, REG_POWER)
            .map(|raw| power_mw(rail, raw))
    }

    pub fn current(&mut self, rail: &Rail) -> Result<f32, I::Error> {
        self.read_register(rail.address, REG_CURRENT)
            .map(|raw| current_ma(rail, raw))
    }
}
