// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use boosterpack_sys::devices::aic3206::{Aic3206, CodecOp, AIC3206_ADDR, PLAYBACK_CONFIG};
use embedded_hal::i2c::ErrorKind;
use mock_bus::{trace, writes_to, Event, MockDelay, MockI2c};


/// The trace a codec sequence should leave behind.
fn expected(ops: &[CodecOp]) -> Vec<Event> {
    let mut events = Vec::new();
    for op in ops {
        match *op {
            CodecOp::Write { register, value } => {
                events.push(Event::DelayMs(3));
                events.push(Event::Write {
                    address: AIC3206_ADDR,
                    bytes: vec![register, value],
                });
            }
            CodecOp::WaitMs(ms) => events.push(Event::DelayMs(ms)),
        }
    }
    events
}

#[test]
fn playback_config_is_issued_in_table_order() {
    let trace = trace();
    let mut codec = Aic3206::new(MockI2c::new(&trace), MockDelay::new(&trace));

    codec.configure_playback().unwrap();

    assert_eq!(*trace.borrow(), expected(PLAYBACK_CONFIG));
}

#[test]
fn reference_power_up_waits_40_ms() {
    let trace = trace();
    let mut codec = Aic3206::new(MockI2c::new(&trace), MockDelay::new(&trace));
    codec.configure_playback().unwrap();

    let events = trace.borrow();
    let reference = events
        .iter()
        .position(|e| {
            *e == Event::Write {
                address: AIC3206_ADDR,
                bytes: vec![123, 0x05],
            }
        })
        .unwrap();
    assert_eq!(events[reference + 1], Event::DelayMs(40));

    let pll_on = events
        .iter()
        .position(|e| {
            *e == Event::Write {
                address: AIC3206_ADDR,
                bytes: vec![5, 0x91],
            }
        })
        .unwrap();
    assert_eq!(events[pll_on + 1], Event::DelayMs(10));
}

#[test]
fn register_numbers_are_masked_to_seven_bits() {
    let trace = trace();
    let mut codec = Aic3206::new(MockI2c::new(&trace), MockDelay::new(&trace));
    codec.write(0x81, 0x12).unwrap();
    assert_eq!(writes_to(&trace, AIC3206_ADDR), vec![vec![0x01, 0x12]]);
}

#[test]
fn reset_selects_page_zero_first() {
    let trace = trace();
    let mut codec = Aic3206::new(MockI2c::new(&trace), MockDelay::new(&trace));
    codec.reset().unwrap();
    assert_eq!(
        writes_to(&trace, AIC3206_ADDR),
        vec![vec![0x00, 0x00], vec![0x01, 0x01]]
    );
}

#[test]
fn first_failed_write_stops_the_sequence() {
    let trace = trace();
    let mut i2c = MockI2c::new(&trace);
    i2c.fail_at = Some(4);
    let mut codec = Aic3206::new(i2c, MockDelay::new(&trace));

    assert_eq!(codec.configure_playback(), Err(ErrorKind::Bus));

    let (i2c, _) = codec.release();
    assert_eq!(i2c.transactions(), 5);
    assert_eq!(writes_to(&trace, AIC3206_ADDR).len(), 4);
}
