// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Text driver for the BoosterPack's 96x16 SSD1306 class OLED.
//!
//! Every transfer is a single I2C write whose first byte selects command
//! (`0x00`) or display data (`0x40`). Text is rendered one column byte at a
//! time, so a line holds at most [`COLUMNS`] columns including the two blank
//! columns that follow every character.

use crate::devices::font::{Font, ARIAL_8PT};
use crate::status::TestError;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// I2C address of the display controller.
pub const OLED_ADDR: u8 = 0x3C;
/// Width of a text line in columns.
pub const COLUMNS: u8 = 128;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

const CMD_LOW_COLUMN: u8 = 0x00;
const CMD_HIGH_COLUMN: u8 = 0x10;
const CMD_PAGE: u8 = 0xB0;
const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_SEGMENT_REMAP: u8 = 0xA1;
const CMD_COM_SCAN_NORMAL: u8 = 0xC0;
const CMD_COM_SCAN_REMAPPED: u8 = 0xC8;
const CMD_SCROLL_RIGHT: u8 = 0x26;
const CMD_SCROLL_LEFT: u8 = 0x27;
const CMD_SCROLL_VERTICAL_RIGHT: u8 = 0x2A;
const CMD_DEACTIVATE_SCROLL: u8 = 0x2E;
const CMD_ACTIVATE_SCROLL: u8 = 0x2F;
const CMD_VERTICAL_SCROLL_AREA: u8 = 0xA3;
const CMD_CONTRAST: u8 = 0x81;

/// Longest command: a horizontal scroll setup.
const MAX_COMMAND_LEN: usize = 7;

/// Controller setup, one I2C write per group.
const INIT_SEQUENCE: &[&[u8]] = &[
    &[CMD_LOW_COLUMN],
    &[CMD_HIGH_COLUMN],
    &[CMD_DISPLAY_OFF],
    // Clock divide ratio and oscillator frequency.
    &[0xD5],
    &[0x80],
    // Multiplex ratio, 16 rows.
    &[0xA8, 0x0F],
    // Display offset.
    &[0xD3],
    &[0x00],
    // Start line 0.
    &[0x40],
    // Charge pump on.
    &[0x8D, 0x14],
    &[CMD_SEGMENT_REMAP],
    &[CMD_COM_SCAN_REMAPPED],
    // COM pins hardware configuration.
    &[0xDA, 0x02],
    &[CMD_CONTRAST, 0xAF],
    // Pre-charge period.
    &[0xD9, 0xF1],
    // VCOMH deselect level.
    &[0xDB],
    &[0x20],
    // Display follows RAM.
    &[0xA4],
    // Normal, not inverted.
    &[0xA6],
    &[CMD_DISPLAY_ON],
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OledError<E> {
    Bus(E),
    /// The line is full.
    ColumnOverflow,
    /// The font has no glyph for this code.
    UnsupportedCharacter(u8),
}

impl<E: embedded_hal::i2c::Error> From<OledError<E>> for TestError {
    fn from(err: OledError<E>) -> Self {
        match err {
            OledError::Bus(e) => TestError::i2c(e),
            OledError::ColumnOverflow | OledError::UnsupportedCharacter(_) => TestError::Display,
        }
    }
}

/// A text line. The controller pages are wired upside down: the first line
/// is page 1, the second is page 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Line {
    First,
    Second,
}

impl Line {
    pub const fn page(self) -> u8 {
        match self {
            Line::First => 1,
            Line::Second => 0,
        }
    }

    const fn index(self) -> usize {
        match self {
            Line::First => 0,
            Line::Second => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
    /// COM scan from 0, text reads left to right from the header side.
    Horizontal,
    /// COM scan remapped.
    Rotated,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub line: Line,
    /// Columns used on the current line.
    pub column: u8,
}

impl Cursor {
    const HOME: Cursor = Cursor {
        line: Line::First,
        column: 0,
    };
}

pub struct Oled<I, D> {
    i2c: I,
    delay: D,
    /// Pause before and after every transfer.
    wait_us: u32,
    font: &'static Font,
    cursor: Cursor,
    /// COM scan direction toggled by [`Oled::flip`].
    flipped: bool,
    rolling: [bool; 2],
}

impl<I: I2c, D: DelayNs> Oled<I, D> {
    pub fn new(i2c: I, delay: D, wait_us: u32) -> Self {
        Oled {
            i2c,
            delay,
            wait_us,
            font: &ARIAL_8PT,
            cursor: Cursor::HOME,
            flipped: false,
            rolling: [false; 2],
        }
    }

    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn rolling(&self, line: Line) -> bool {
        self.rolling[line.index()]
    }

    /// Check that a display answers on the bus.
    pub fn probe(&mut self) -> Result<(), I::Error> {
        crate::i2c::probe(&mut self.i2c, OLED_ADDR, &[CMD_CONTRAST])
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), OledError<I::Error>> {
        self.delay.delay_us(self.wait_us);
        let result = self.i2c.write(OLED_ADDR, bytes);
        self.delay.delay_us(self.wait_us);
        result.map_err(OledError::Bus)
    }

    fn command(&mut self, cmd: &[u8]) -> Result<(), OledError<I::Error>> {
        debug_assert!(cmd.len() <= MAX_COMMAND_LEN, "OLED command too long");
        let mut buf = [CONTROL_COMMAND; MAX_COMMAND_LEN + 1];
        let len = cmd.len().min(MAX_COMMAND_LEN);
        buf[1..=len].copy_from_slice(&cmd[..len]);
        self.write(&buf[..=len])
    }

    fn data(&mut self, byte: u8) -> Result<(), OledError<I::Error>> {
        self.write(&[CONTROL_DATA, byte])
    }

    fn set_page(&mut self, page: u8) -> Result<(), OledError<I::Error>> {
        self.command(&[CMD_LOW_COLUMN])?;
        self.command(&[CMD_HIGH_COLUMN])?;
        self.command(&[CMD_PAGE + page])
    }

    /// Stream one column byte, failing if the line is already full.
    fn column(&mut self, byte: u8) -> Result<(), OledError<I::Error>> {
        if self.cursor.column >= COLUMNS {
            return Err(OledError::ColumnOverflow);
        }
        self.cursor.column += 1;
        self.data(byte)
    }

    /// Send the controller setup and home the cursor.
    pub fn initialize(&mut self) -> Result<(), OledError<I::Error>> {
        log::debug!("oled: init");
        self.cursor = Cursor::HOME;
        for cmd in INIT_SEQUENCE {
            self.command(cmd)?;
        }
        self.flipped = false;
        Ok(())
    }

    /// Move to the start of `line`.
    pub fn set_line(&mut self, line: Line) -> Result<(), OledError<I::Error>> {
        self.set_page(line.page())?;
        self.cursor = Cursor { line, column: 0 };
        Ok(())
    }

    /// Move to the start of `line`'s page, keeping the current line.
    pub fn reset_cursor(&mut self, line: Line) -> Result<(), OledError<I::Error>> {
        self.cursor.column = 0;
        self.set_page(line.page())
    }

    /// Render `code` followed by two blank columns.
    ///
    /// Columns already streamed stay on the display when the line fills up
    /// part way through a character.
    pub fn print_character(&mut self, code: u8) -> Result<(), OledError<I::Error>> {
        let glyph = self
            .font
            .glyph(code)
            .ok_or(OledError::UnsupportedCharacter(code))?;
        for &byte in glyph {
            self.column(byte)?;
        }
        self.column(0x00)?;
        self.column(0x00)?;
        self.command(&[CMD_DEACTIVATE_SCROLL])
    }

    /// Print `s` until it ends or the line is full.
    ///
    /// Returns the number of characters printed completely.
    pub fn print_string(&mut self, s: &str) -> Result<usize, OledError<I::Error>> {
        let mut printed = 0;
        for code in s.bytes() {
            match self.print_character(code) {
                Ok(()) => printed += 1,
                Err(OledError::ColumnOverflow) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(printed)
    }

    /// Blank both pages and home the cursor.
    pub fn clear(&mut self) -> Result<(), OledError<I::Error>> {
        self.command(&[CMD_DEACTIVATE_SCROLL])?;
        for page in [0, 1] {
            self.set_page(page)?;
            for _ in 0..COLUMNS {
                self.data(0x00)?;
            }
        }
        self.set_page(Line::First.page())?;
        self.cursor = Cursor::HOME;
        Ok(())
    }

    pub fn display_on(&mut self) -> Result<(), OledError<I::Error>> {
        self.command(&[CMD_DISPLAY_ON])
    }

    pub fn display_off(&mut self) -> Result<(), OledError<I::Error>> {
        self.command(&[CMD_DISPLAY_OFF])
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), OledError<I::Error>> {
        match orientation {
            Orientation::Rotated => {
                self.command(&[CMD_COM_SCAN_REMAPPED])?;
                self.flipped = true;
            }
            Orientation::Horizontal => {
                self.command(&[CMD_COM_SCAN_NORMAL])?;
                self.flipped = false;
            }
        }
        Ok(())
    }

    /// Flip the display vertically.
    pub fn flip(&mut self) -> Result<(), OledError<I::Error>> {
        let scan = if self.flipped {
            CMD_COM_SCAN_REMAPPED
        } else {
            CMD_COM_SCAN_NORMAL
        };
        self.command(&[scan])?;
        self.command(&[CMD_SEGMENT_REMAP])?;
        self.flipped = !self.flipped;
        Ok(())
    }

    fn horizontal_scroll(
        &mut self,
        direction: u8,
        start: u8,
        end: u8,
    ) -> Result<(), OledError<I::Error>> {
        self.command(&[direction, 0x00, start, 0x00, end, 0x00, 0xFF])?;
        self.command(&[CMD_ACTIVATE_SCROLL])
    }

    /// Scroll the whole display right to left.
    pub fn scroll_left(&mut self) -> Result<(), OledError<I::Error>> {
        self.horizontal_scroll(CMD_SCROLL_LEFT, 0, 1)
    }

    /// Scroll the whole display left to right.
    pub fn scroll_right(&mut self) -> Result<(), OledError<I::Error>> {
        self.horizontal_scroll(CMD_SCROLL_RIGHT, 0, 1)
    }

    pub fn scroll_left_line(&mut self, line: Line) -> Result<(), OledError<I::Error>> {
        self.horizontal_scroll(CMD_SCROLL_LEFT, line.page(), line.page())
    }

    pub fn scroll_right_line(&mut self, line: Line) -> Result<(), OledError<I::Error>> {
        self.horizontal_scroll(CMD_SCROLL_RIGHT, line.page(), line.page())
    }

    /// Scroll diagonally, keeping the top 8 rows fixed.
    pub fn autoscroll(&mut self) -> Result<(), OledError<I::Error>> {
        self.command(&[CMD_SCROLL_VERTICAL_RIGHT, 0x00, 0x00, 0x00, 0x01, 0x01])?;
        self.command(&[CMD_ACTIVATE_SCROLL])?;
        self.command(&[CMD_VERTICAL_SCROLL_AREA, 0x08, 0x08])
    }

    pub fn no_autoscroll(&mut self) -> Result<(), OledError<I::Error>> {
        self.data(0x00)?;
        self.data(0x00)?;
        self.command(&[CMD_DEACTIVATE_SCROLL])
    }

    pub fn set_rolling(&mut self, line: Line, enabled: bool) {
        self.rolling[line.index()] = enabled;
    }
}
