// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use boosterpack_sys::devices::font::ARIAL_8PT;
use boosterpack_sys::devices::oled::{Cursor, Line, Oled, OledError, Orientation, COLUMNS, OLED_ADDR};
use embedded_hal::i2c::ErrorKind;
use mock_bus::{trace, writes_to, Event, MockDelay, MockI2c};
use proptest::prelude::*;
use test_strategy::proptest;


const WAIT_US: u32 = 10;

fn width(code: u8) -> u8 {
    ARIAL_8PT.char_info(code).unwrap().width
}

#[test]
fn initialize_sends_one_write_per_group() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), WAIT_US);
    oled.initialize().unwrap();

    let writes = writes_to(&trace, OLED_ADDR);
    assert_eq!(writes.len(), 20);
    assert_eq!(writes[0], vec![0x00, 0x00]);
    assert_eq!(writes[5], vec![0x00, 0xA8, 0x0F]);
    assert_eq!(writes[9], vec![0x00, 0x8D, 0x14]);
    assert_eq!(writes[19], vec![0x00, 0xAF]);
    assert!(writes.iter().all(|w| w[0] == 0x00));
    assert_eq!(oled.cursor(), Cursor { line: Line::First, column: 0 });
}

#[test]
fn every_transfer_is_wrapped_in_waits() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), WAIT_US);
    oled.display_on().unwrap();

    assert_eq!(
        *trace.borrow(),
        vec![
            Event::DelayUs(WAIT_US),
            Event::Write {
                address: OLED_ADDR,
                bytes: vec![0x00, 0xAF]
            },
            Event::DelayUs(WAIT_US),
        ]
    );
}

#[test]
fn lines_map_to_swapped_pages() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    oled.set_line(Line::First).unwrap();
    oled.set_line(Line::Second).unwrap();

    assert_eq!(
        writes_to(&trace, OLED_ADDR),
        vec![
            vec![0x00, 0x00],
            vec![0x00, 0x10],
            vec![0x00, 0xB1],
            vec![0x00, 0x00],
            vec![0x00, 0x10],
            vec![0x00, 0xB0],
        ]
    );
    assert_eq!(oled.cursor(), Cursor { line: Line::Second, column: 0 });
}

#[test]
fn character_is_followed_by_two_blank_columns() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    let glyph = ARIAL_8PT.glyph(b'A').unwrap();

    oled.print_character(b'A').unwrap();

    let writes = writes_to(&trace, OLED_ADDR);
    let w = glyph.len();
    assert_eq!(writes.len(), w + 3);
    for (write, &byte) in writes.iter().zip(glyph) {
        assert_eq!(*write, vec![0x40, byte]);
    }
    assert_eq!(writes[w], vec![0x40, 0x00]);
    assert_eq!(writes[w + 1], vec![0x40, 0x00]);
    assert_eq!(writes[w + 2], vec![0x00, 0x2E]);
    assert_eq!(oled.cursor().column, width(b'A') + 2);
}

#[test]
fn full_line_overflows() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    let result = loop {
        if let Err(err) = oled.print_character(b'W') {
            break err;
        }
    };
    assert_eq!(result, OledError::ColumnOverflow);
    assert_eq!(oled.cursor().column, COLUMNS);
    assert_eq!(oled.print_character(b' '), Err(OledError::ColumnOverflow));
}

#[test]
fn print_string_stops_at_the_end_of_the_line() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    let text = "The quick brown fox jumps over the lazy dog";

    let printed = oled.print_string(text).unwrap();

    assert!(printed > 0);
    assert!(printed < text.len());
    let used: u8 = text.bytes().take(printed).map(|c| width(c) + 2).sum();
    let next = text.as_bytes()[printed];
    assert!(used + width(next) + 2 > COLUMNS);
}

#[test]
fn unsupported_characters_are_rejected_before_any_transfer() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    assert_eq!(oled.print_character(0x7F), Err(OledError::UnsupportedCharacter(0x7F)));
    assert_eq!(oled.print_character(b'\n'), Err(OledError::UnsupportedCharacter(b'\n')));
    assert!(writes_to(&trace, OLED_ADDR).is_empty());
    assert_eq!(oled.print_string("ok\t"), Err(OledError::UnsupportedCharacter(b'\t')));
}

#[test]
fn clear_blanks_both_pages_and_homes_the_cursor() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    oled.set_line(Line::Second).unwrap();
    oled.print_string("BFF").unwrap();
    trace.borrow_mut().clear();

    oled.clear().unwrap();

    let writes = writes_to(&trace, OLED_ADDR);
    assert_eq!(writes[0], vec![0x00, 0x2E]);
    let blanks = writes.iter().filter(|w| **w == vec![0x40, 0x00]).count();
    assert_eq!(blanks, 2 * usize::from(COLUMNS));
    assert_eq!(writes[writes.len() - 1], vec![0x00, 0xB1]);
    assert_eq!(oled.cursor(), Cursor { line: Line::First, column: 0 });

    oled.print_character(b'K').unwrap();
    assert_eq!(oled.cursor().column, width(b'K') + 2);
}

#[test]
fn orientation_and_flip_track_the_scan_direction() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    oled.set_orientation(Orientation::Rotated).unwrap();
    assert!(oled.is_flipped());
    oled.flip().unwrap();
    assert!(!oled.is_flipped());
    oled.set_orientation(Orientation::Horizontal).unwrap();
    assert!(!oled.is_flipped());

    assert_eq!(
        writes_to(&trace, OLED_ADDR),
        vec![
            vec![0x00, 0xC8],
            vec![0x00, 0xC8],
            vec![0x00, 0xA1],
            vec![0x00, 0xC0],
        ]
    );
}

#[test]
fn scroll_commands() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    oled.scroll_left().unwrap();
    oled.scroll_right_line(Line::First).unwrap();
    oled.autoscroll().unwrap();

    assert_eq!(
        writes_to(&trace, OLED_ADDR),
        vec![
            vec![0x00, 0x27, 0x00, 0x00, 0x00, 0x01, 0x00, 0xFF],
            vec![0x00, 0x2F],
            vec![0x00, 0x26, 0x00, 0x01, 0x00, 0x01, 0x00, 0xFF],
            vec![0x00, 0x2F],
            vec![0x00, 0x2A, 0x00, 0x00, 0x00, 0x01, 0x01],
            vec![0x00, 0x2F],
            vec![0x00, 0xA3, 0x08, 0x08],
        ]
    );
}

#[test]
fn whole_display_scroll_right_and_per_line_scroll_left() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    oled.scroll_right().unwrap();
    oled.scroll_left_line(Line::Second).unwrap();
    oled.scroll_left_line(Line::First).unwrap();

    assert_eq!(
        writes_to(&trace, OLED_ADDR),
        vec![
            vec![0x00, 0x26, 0x00, 0x00, 0x00, 0x01, 0x00, 0xFF],
            vec![0x00, 0x2F],
            vec![0x00, 0x27, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF],
            vec![0x00, 0x2F],
            vec![0x00, 0x27, 0x00, 0x01, 0x00, 0x01, 0x00, 0xFF],
            vec![0x00, 0x2F],
        ]
    );
}

#[test]
fn no_autoscroll_pads_and_deactivates() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    oled.no_autoscroll().unwrap();

    assert_eq!(
        writes_to(&trace, OLED_ADDR),
        vec![vec![0x40, 0x00], vec![0x40, 0x00], vec![0x00, 0x2E]]
    );
}

#[test]
fn display_off_command() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);

    oled.display_off().unwrap();

    assert_eq!(writes_to(&trace, OLED_ADDR), vec![vec![0x00, 0xAE]]);
}

#[test]
fn reset_cursor_homes_the_column_and_keeps_the_line() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    oled.print_string("AB").unwrap();
    assert!(oled.cursor().column > 0);
    trace.borrow_mut().clear();

    oled.reset_cursor(Line::Second).unwrap();

    assert_eq!(
        writes_to(&trace, OLED_ADDR),
        vec![vec![0x00, 0x00], vec![0x00, 0x10], vec![0x00, 0xB0]]
    );
    assert_eq!(oled.cursor(), Cursor { line: Line::First, column: 0 });
}

#[test]
fn rolling_flags_are_per_line() {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    oled.set_rolling(Line::Second, true);
    assert!(oled.rolling(Line::Second));
    assert!(!oled.rolling(Line::First));
}

#[test]
fn bus_errors_are_wrapped() {
    let trace = trace();
    let mut i2c = MockI2c::new(&trace);
    i2c.fail_at = Some(3);
    let mut oled = Oled::new(i2c, MockDelay::new(&trace), 0);

    assert_eq!(oled.initialize(), Err(OledError::Bus(ErrorKind::Bus)));
    assert_eq!(writes_to(&trace, OLED_ADDR).len(), 3);
}

#[test]
fn probe_reports_a_missing_display() {
    let trace = trace();
    let mut i2c = MockI2c::new(&trace);
    i2c.absent.push(OLED_ADDR);
    let mut oled = Oled::new(i2c, MockDelay::new(&trace), 0);
    assert!(oled.probe().is_err());

    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    assert_eq!(oled.probe(), Ok(()));
    assert_eq!(writes_to(&trace, OLED_ADDR), vec![vec![0x81]]);
}

#[proptest]
fn cursor_advances_by_width_plus_two(
    #[strategy(proptest::collection::vec(0x20u8..=0x7Eu8, 0..48))] text: Vec<u8>,
) {
    let trace = trace();
    let mut oled = Oled::new(MockI2c::new(&trace), MockDelay::new(&trace), 0);
    let mut column: u8 = 0;

    for code in text {
        let next = u16::from(column) + u16::from(width(code)) + 2;
        let result = oled.print_character(code);
        if next <= u16::from(COLUMNS) {
            prop_assert_eq!(result, Ok(()));
            column = next as u8;
            prop_assert_eq!(oled.cursor().column, column);
        } else {
            prop_assert_eq!(result, Err(OledError::ColumnOverflow));
            break;
        }
    }
}
