// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::console::Terminal;
use crate::devices::ina219::{Ina219, Rail, RAILS};
use crate::diagnostics::{run, step, TestInfo};
use crate::msg;
use crate::status::{TestError, TestStatus};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const INFO: TestInfo = TestInfo {
    title: "Current Monitor Test",
    name: "Current Monitor Test",
};

/// Configure every rail's INA219 and print its shunt voltage, bus voltage,
/// power and current.
pub fn current_monitor_test<C, I, D>(console: &mut C, ina: &mut Ina219<I, D>) -> TestStatus
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
{
    run(console, &INFO, |console| {
        for rail in RAILS.iter() {
            check_rail(console, ina, rail)?;
        }
        Ok(())
    })
}

fn check_rail<C, I, D>(console: &mut C, ina: &mut Ina219<I, D>, rail: &Rail) -> Result<(), TestError>
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
{
    let addr = rail.address;

    step(
        console,
        ina.write_config(rail).map_err(TestError::i2c),
        format_args!("Writing to the configuration register of slave address 0x{:x}", addr),
    )?;
    step(
        console,
        ina.write_calibration(rail).map_err(TestError::i2c),
        format_args!("Writing to the calibration register of slave address 0x{:x}", addr),
    )?;

    msg!(console, "Reading values from {} port", rail.name)?;

    let shunt = step(
        console,
        ina.shunt_voltage(rail).map_err(TestError::i2c),
        format_args!("Reading the shunt voltage register of slave address 0x{:x}", addr),
    )?;
    msg!(console, "Shunt voltage - {:.6}mV", shunt)?;

    let bus = step(
        console,
        ina.bus_voltage(rail).map_err(TestError::i2c),
        format_args!("Reading the bus voltage register of slave address 0x{:x}", addr),
    )?;
    msg!(console, "Bus voltage - {:.6}V", bus)?;

    let power = step(
        console,
        ina.power(rail).map_err(TestError::i2c),
        format_args!("Reading power from slave address 0x{:x}", addr),
    )?;
    msg!(console, "Power - {:.6}mW", power)?;

    let current = step(
        console,
        ina.current(rail).map_err(TestError::i2c),
        format_args!("Reading current from slave address 0x{:x}", addr),
    )?;
    msg!(console, "Current - {:.6}mA\r\n", current)?;

    Ok(())
}
