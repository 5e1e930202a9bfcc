// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use boosterpack_sys::devices::ina219::{
    bus_voltage_v, current_ma, power_mw, shunt_voltage_mv, Ina219, CVDD, REG_CALIBRATION,
    REG_CURRENT, REG_SHUNT_VOLTAGE, VCC3V3_USB,
};
use embedded_hal::i2c::ErrorKind;
use mock_bus::{trace, Event, MockDelay, MockI2c};
use proptest::prelude::*;
use test_strategy::proptest;


#[test]
fn register_writes_are_big_endian_and_settled() {
    let trace = trace();
    let mut ina = Ina219::new(MockI2c::new(&trace), MockDelay::new(&trace), 1_000);

    ina.write_config(&CVDD).unwrap();
    ina.write_calibration(&CVDD).unwrap();

    assert_eq!(
        *trace.borrow(),
        vec![
            Event::Write {
                address: 0x40,
                bytes: vec![0x00, 0x3F, 0x9F]
            },
            Event::DelayUs(1_000),
            Event::Write {
                address: 0x40,
                bytes: vec![REG_CALIBRATION, 0x6C, 0x41]
            },
            Event::DelayUs(1_000),
        ]
    );
}

#[test]
fn register_reads_select_then_read_two_bytes() {
    let trace = trace();
    let mut i2c = MockI2c::new(&trace);
    i2c.reads.push_back(vec![0x01, 0x90]);
    let mut ina = Ina219::new(i2c, MockDelay::new(&trace), 1_000);

    let mv = ina.shunt_voltage(&VCC3V3_USB).unwrap();

    assert!((mv - 4.0).abs() < 1e-5);
    assert_eq!(
        *trace.borrow(),
        vec![
            Event::Write {
                address: 0x48,
                bytes: vec![REG_SHUNT_VOLTAGE]
            },
            Event::Read {
                address: 0x48,
                len: 2
            },
            Event::DelayUs(1_000),
        ]
    );
}

#[test]
fn current_uses_the_rail_scale() {
    let trace = trace();
    let mut i2c = MockI2c::new(&trace);
    i2c.reads.push_back(vec![0x03, 0xE8]);
    i2c.reads.push_back(vec![0x03, 0xE8]);
    let mut ina = Ina219::new(i2c, MockDelay::new(&trace), 0);

    let cvdd = ina.current(&CVDD).unwrap();
    let usb = ina.current(&VCC3V3_USB).unwrap();

    assert_eq!(cvdd, CVDD.current_lsb * 1000.0);
    assert_eq!(usb, VCC3V3_USB.current_lsb * 1000.0 * 2.0);
    assert!(trace.borrow().contains(&Event::Write {
        address: 0x40,
        bytes: vec![REG_CURRENT]
    }));
}

#[test]
fn failed_read_still_settles() {
    let trace = trace();
    let mut i2c = MockI2c::new(&trace);
    i2c.absent.push(CVDD.address);
    let mut ina = Ina219::new(i2c, MockDelay::new(&trace), 1_000);

    assert!(matches!(
        ina.bus_voltage(&CVDD),
        Err(ErrorKind::NoAcknowledge(_))
    ));
    assert_eq!(*trace.borrow(), vec![Event::DelayUs(1_000)]);
}

#[proptest]
fn shunt_voltage_ignores_the_sign_bit(raw: u16) {
    prop_assert_eq!(shunt_voltage_mv(raw), f32::from(raw & 0x7FFF) * 0.01);
}

#[proptest]
fn bus_voltage_drops_the_status_bits(raw: u16) {
    prop_assert_eq!(bus_voltage_v(raw), f32::from(raw >> 3) * 0.004);
    prop_assert!(bus_voltage_v(raw) < 32.768);
}

#[proptest]
fn doubled_rails_read_twice_the_single_value(raw: u16) {
    let single = VCC3V3_USB.current_lsb * 20.0 * f32::from(raw);
    prop_assert_eq!(power_mw(&VCC3V3_USB, raw), single * 2.0);
    prop_assert_eq!(power_mw(&CVDD, raw), CVDD.current_lsb * 20.0 * f32::from(raw));
    prop_assert!(current_ma(&CVDD, raw) >= 0.0);
}
