// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Arial 8pt bitmap font for the OLED.
//!
//! Each glyph is a run of column bytes in [`ARIAL_8PT_BITMAPS`], located by its
//! [`CharInfo`]. Bit 0 of a column byte is the top pixel.

/// Placement of one glyph in the bitmap table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CharInfo {
    /// Width in columns.
    pub width: u8,
    /// Height in pixels.
    pub height: u8,
    /// Index of the first column byte.
    pub offset: u16,
}

impl CharInfo {
    pub const fn new(width: u8, height: u8, offset: u16) -> CharInfo {
        CharInfo {
            width,
            height,
            offset,
        }
    }
}

pub struct Font {
    /// Glyph height in display pages.
    pub height_pages: u8,
    pub first: u8,
    pub last: u8,
    pub descriptors: &'static [CharInfo],
    pub bitmaps: &'static [u8],
}

impl Font {
    /// Descriptor for `code`, `None` outside `first..=last`.
    pub fn char_info(&self, code: u8) -> Option<&'static CharInfo> {
        if !(self.first..=self.last).contains(&code) {
            return None;
        }
        self.descriptors.get(usize::from(code - self.first))
    }

    /// Column bytes of `code`, `None` outside `first..=last`.
    pub fn glyph(&self, code: u8) -> Option<&'static [u8]> {
        let info = self.char_info(code)?;
        let start = usize::from(info.offset);
        self.bitmaps.get(start..start + usize::from(info.width))
    }
}

pub static ARIAL_8PT: Font = Font {
    height_pages: 2,
    first: b' ',
    last: b'~',
    descriptors: &ARIAL_8PT_DESCRIPTORS,
    bitmaps: &ARIAL_8PT_BITMAPS,
};

#[rustfmt::skip]
pub static ARIAL_8PT_BITMAPS: [u8; 476] = [
    // ' '
    0x00, 0x00, 0x00, 0x00,
    // '!'
    0xFD,
    // '"'
    0x70, 0x00, 0x70,
    // '#'
    0x27, 0x3C, 0xE7, 0x3C, 0xE4,
    // '$'
    0x24, 0x52, 0xFF, 0x4A, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00,
    // '%'
    0x60, 0x90, 0x91, 0x66, 0x18, 0x66, 0x89, 0x09, 0x06,
    // '&'
    0x06, 0x69, 0x91, 0x99, 0x66, 0x05,
    // '\''
    0xE0,
    // '('
    0x3C, 0x42, 0x81, 0x00, 0x00, 0x00,
    // ')'
    0x81, 0x42, 0x3C, 0x00, 0x00, 0x00,
    // '*'
    0x05, 0x0E, 0x05,
    // '+'
    0x04, 0x04, 0x1F, 0x04, 0x04,
    // ','
    0x07,
    // '-'
    0x01, 0x01, 0x01,
    // '.'
    0x01,
    // '/'
    0x03, 0x3C, 0xC0,
    // '0'
    0x7E, 0x81, 0x81, 0x81, 0x7E,
    // '1'
    0x20, 0x40, 0xFF,
    // '2'
    0x41, 0x83, 0x85, 0x89, 0x71,
    // '3'
    0x42, 0x81, 0x91, 0x91, 0x6E,
    // '4'
    0x0C, 0x34, 0x44, 0xFF, 0x04,
    // '5'
    0x32, 0xD1, 0x91, 0x91, 0x8E,
    // '6'
    0x7E, 0x91, 0x91, 0x91, 0x4E,
    // '7'
    0x80, 0x87, 0x98, 0xE0, 0x80,
    // '8'
    0x6E, 0x91, 0x91, 0x91, 0x6E,
    // '9'
    0x72, 0x89, 0x89, 0x89, 0x7E,
    // ':'
    0x21,
    // ';'
    0x87,
    // '<'
    0x04, 0x0A, 0x0A, 0x11, 0x11,
    // '='
    0x05, 0x05, 0x05, 0x05, 0x05,
    // '>'
    0x11, 0x11, 0x0A, 0x0A, 0x04,
    // '?'
    0x40, 0x80, 0x8D, 0x90, 0x60,
    // '@'
    0x3C, 0x42, 0x89, 0x95, 0xA5, 0xA9, 0x9D, 0xB5, 0x89, 0x72, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // 'A'
    0x03, 0x0C, 0x74, 0x84, 0x74, 0x0C, 0x03,
    // 'B'
    0xFF, 0x91, 0x91, 0x91, 0x91, 0x7E,
    // 'C'
    0x3C, 0x42, 0x81, 0x81, 0x81, 0x42,
    // 'D'
    0xFF, 0x81, 0x81, 0x81, 0x42, 0x3C,
    // 'E'
    0xFF, 0x91, 0x91, 0x91, 0x91,
    // 'F'
    0xFF, 0x90, 0x90, 0x90, 0x80,
    // 'G'
    0x3C, 0x42, 0x81, 0x81, 0x89, 0x4A, 0x2C,
    // 'H'
    0xFF, 0x10, 0x10, 0x10, 0x10, 0xFF,
    // 'I'
    0xFF,
    // 'J'
    0x06, 0x01, 0x01, 0xFE,
    // 'K'
    0xFF, 0x08, 0x10, 0x38, 0x46, 0x81,
    // 'L'
    0xFF, 0x01, 0x01, 0x01, 0x01,
    // 'M'
    0xFF, 0x60, 0x1C, 0x03, 0x1C, 0x60, 0xFF,
    // 'N'
    0xFF, 0x40, 0x30, 0x0C, 0x02, 0xFF,
    // 'O'
    0x3C, 0x42, 0x81, 0x81, 0x81, 0x42, 0x3C,
    // 'P'
    0xFF, 0x88, 0x88, 0x88, 0x70,
    // 'Q'
    0x3C, 0x42, 0x81, 0x85, 0x85, 0x42, 0x3D,
    // 'R'
    0xFF, 0x90, 0x90, 0x98, 0x96, 0x61,
    // 'S'
    0x62, 0x91, 0x91, 0x89, 0x89, 0x46,
    // 'T'
    0x80, 0x80, 0xFF, 0x80, 0x80,
    // 'U'
    0xFE, 0x01, 0x01, 0x01, 0x01, 0xFE,
    // 'V'
    0xC0, 0x30, 0x0C, 0x03, 0x0C, 0x30, 0xC0,
    // 'W'
    0xC0, 0x3C, 0x03, 0x0C, 0x70, 0x80, 0x70, 0x0C, 0x03, 0x3C, 0xC0,
    // 'X'
    0x81, 0x66, 0x18, 0x18, 0x66, 0x81,
    // 'Y'
    0x80, 0x60, 0x10, 0x0F, 0x10, 0x60, 0x80,
    // 'Z'
    0x01, 0x83, 0x8D, 0xB1, 0xC1, 0x81,
    // '['
    0xFF, 0x81, 0x00, 0x00,
    // '\\'
    0xC0, 0x3C, 0x03,
    // ']'
    0x81, 0xFF, 0x00, 0x00,
    // '^'
    0x01, 0x06, 0x08, 0x06, 0x01,
    // '_'
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    // '`'
    0x80, 0x40,
    // 'a'
    0x16, 0x29, 0x29, 0x2A, 0x1F,
    // 'b'
    0xFF, 0x12, 0x21, 0x21, 0x1E,
    // 'c'
    0x1E, 0x21, 0x21, 0x21, 0x12,
    // 'd'
    0x1E, 0x21, 0x21, 0x12, 0xFF,
    // 'e'
    0x1E, 0x29, 0x29, 0x29, 0x1A,
    // 'f'
    0x20, 0x7F, 0xA0,
    // 'g'
    0x79, 0x85, 0x85, 0x49, 0xFE,
    // 'h'
    0xFF, 0x10, 0x20, 0x20, 0x1F,
    // 'i'
    0xBF,
    // 'j'
    0x01, 0xFE, 0x00, 0x02,
    // 'k'
    0xFF, 0x08, 0x16, 0x21,
    // 'l'
    0xFF,
    // 'm'
    0x3F, 0x10, 0x20, 0x3F, 0x20, 0x20, 0x1F,
    // 'n'
    0x3F, 0x20, 0x20, 0x20, 0x1F,
    // 'o'
    0x1E, 0x21, 0x21, 0x21, 0x1E,
    // 'p'
    0xFF, 0x48, 0x84, 0x84, 0x78,
    // 'q'
    0x78, 0x84, 0x84, 0x48, 0xFF,
    // 'r'
    0x3F, 0x10, 0x20,
    // 's'
    0x12, 0x29, 0x29, 0x25, 0x12,
    // 't'
    0x20, 0xFF, 0x21,
    // 'u'
    0x3E, 0x01, 0x01, 0x02, 0x3F,
    // 'v'
    0x30, 0x0C, 0x03, 0x0C, 0x30,
    // 'w'
    0x30, 0x0C, 0x03, 0x1C, 0x20, 0x1C, 0x03, 0x0C, 0x30,
    // 'x'
    0x21, 0x12, 0x0C, 0x12, 0x21,
    // 'y'
    0xC0, 0x31, 0x0E, 0x30, 0xC0,
    // 'z'
    0x21, 0x23, 0x2D, 0x31, 0x21,
    // '{'
    0x10, 0x6E, 0x81, 0x00, 0x00, 0x00,
    // '|'
    0xFF, 0x00,
    // '}'
    0x81, 0x6E, 0x10, 0x00, 0x00, 0x00,
    // '~'
    0x03, 0x02, 0x03, 0x01, 0x02,
];

pub static ARIAL_8PT_DESCRIPTORS: [CharInfo; 95] = [
    CharInfo::new(2, 14, 0),
    CharInfo::new(1, 8, 4),
    CharInfo::new(3, 3, 5),
    CharInfo::new(5, 8, 8),
    CharInfo::new(5, 9, 13),
    CharInfo::new(9, 8, 23),
    CharInfo::new(6, 8, 32),
    CharInfo::new(1, 8, 38),
    CharInfo::new(3, 10, 39),
    CharInfo::new(3, 10, 45),
    CharInfo::new(3, 4, 51),
    CharInfo::new(5, 5, 54),
    CharInfo::new(1, 3, 59),
    CharInfo::new(3, 1, 60),
    CharInfo::new(1, 1, 63),
    CharInfo::new(3, 8, 64),
    CharInfo::new(5, 8, 67),
    CharInfo::new(3, 8, 72),
    CharInfo::new(5, 8, 75),
    CharInfo::new(5, 8, 80),
    CharInfo::new(5, 8, 85),
    CharInfo::new(5, 8, 90),
    CharInfo::new(5, 8, 95),
    CharInfo::new(5, 8, 100),
    CharInfo::new(5, 8, 105),
    CharInfo::new(5, 8, 110),
    CharInfo::new(1, 6, 115),
    CharInfo::new(1, 8, 116),
    CharInfo::new(5, 5, 117),
    CharInfo::new(5, 3, 122),
    CharInfo::new(5, 5, 127),
    CharInfo::new(5, 8, 132),
    CharInfo::new(10, 10, 137),
    CharInfo::new(7, 8, 157),
    CharInfo::new(6, 8, 164),
    CharInfo::new(6, 8, 170),
    CharInfo::new(6, 8, 176),
    CharInfo::new(5, 8, 182),
    CharInfo::new(5, 8, 187),
    CharInfo::new(7, 8, 192),
    CharInfo::new(6, 8, 199),
    CharInfo::new(1, 8, 205),
    CharInfo::new(4, 8, 206),
    CharInfo::new(6, 8, 210),
    CharInfo::new(5, 8, 216),
    CharInfo::new(7, 8, 221),
    CharInfo::new(6, 8, 228),
    CharInfo::new(7, 8, 234),
    CharInfo::new(5, 8, 241),
    CharInfo::new(7, 8, 246),
    CharInfo::new(6, 8, 253),
    CharInfo::new(6, 8, 259),
    CharInfo::new(5, 8, 265),
    CharInfo::new(6, 8, 270),
    CharInfo::new(7, 8, 276),
    CharInfo::new(11, 8, 283),
    CharInfo::new(6, 8, 294),
    CharInfo::new(7, 8, 300),
    CharInfo::new(6, 8, 307),
    CharInfo::new(2, 10, 313),
    CharInfo::new(3, 8, 317),
    CharInfo::new(2, 10, 320),
    CharInfo::new(5, 4, 324),
    CharInfo::new(6, 1, 329),
    CharInfo::new(2, 8, 335),
    CharInfo::new(5, 6, 337),
    CharInfo::new(5, 8, 342),
    CharInfo::new(5, 6, 347),
    CharInfo::new(5, 8, 352),
    CharInfo::new(5, 6, 357),
    CharInfo::new(3, 8, 362),
    CharInfo::new(5, 8, 365),
    CharInfo::new(5, 8, 370),
    CharInfo::new(1, 8, 375),
    CharInfo::new(2, 10, 376),
    CharInfo::new(4, 8, 380),
    CharInfo::new(1, 8, 384),
    CharInfo::new(7, 6, 385),
    CharInfo::new(5, 6, 392),
    CharInfo::new(5, 6, 397),
    CharInfo::new(5, 8, 402),
    CharInfo::new(5, 8, 407),
    CharInfo::new(3, 6, 412),
    CharInfo::new(5, 6, 415),
    CharInfo::new(3, 8, 420),
    CharInfo::new(5, 6, 423),
    CharInfo::new(5, 6, 428),
    CharInfo::new(9, 6, 433),
    CharInfo::new(5, 6, 442),
    CharInfo::new(5, 8, 447),
    CharInfo::new(5, 6, 452),
    CharInfo::new(3, 10, 457),
    CharInfo::new(1, 10, 463),
    CharInfo::new(3, 10, 465),
    CharInfo::new(5, 2, 471),
];
