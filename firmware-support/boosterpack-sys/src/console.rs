// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic message sink.
//!
//! Test output is formatted into a fixed 200 byte buffer and then sent to the
//! UART, the local debug console or both. Messages that do not fit are
//! rejected as a whole.

pub mod log;

use core::fmt::{self, Write};
use heapless::String;
use ufmt::derive::uDebug;

/// Longest message accepted by [`Console::print`].
pub const MAX_WRITE_LEN: usize = 200;

const CR: u8 = 0x0D;
const ESC: u8 = 0x1B;

/// Where console output goes.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConsoleRoute {
    Uart,
    Local,
    All,
}

/// Where console input is read from.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputSource {
    Uart,
    Local,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The formatted message does not fit in [`MAX_WRITE_LEN`] bytes.
    TooLong,
    /// The output device refused the message.
    Output,
}

/// Blocking single byte input.
pub trait ConsoleInput {
    fn read_byte(&mut self) -> u8;

    /// Send a received byte back to the operator. Devices that echo on their
    /// own can keep the default.
    fn echo(&mut self, _byte: u8) {}
}

pub struct Console<U, L> {
    uart: U,
    local: L,
    route: ConsoleRoute,
    input: InputSource,
}

impl<U, L> Console<U, L>
where
    U: Write + ConsoleInput,
    L: Write + ConsoleInput,
{
    pub fn new(uart: U, local: L, route: ConsoleRoute, input: InputSource) -> Self {
        Console {
            uart,
            local,
            route,
            input,
        }
    }

    /// Change the output route, returning the previous one.
    pub fn configure_route(&mut self, route: ConsoleRoute) -> ConsoleRoute {
        core::mem::replace(&mut self.route, route)
    }

    /// Change the input source, returning the previous one.
    pub fn configure_input(&mut self, input: InputSource) -> InputSource {
        core::mem::replace(&mut self.input, input)
    }

    pub fn route(&self) -> ConsoleRoute {
        self.route
    }

    fn emit(&mut self, s: &str) -> Result<(), ConsoleError> {
        if matches!(self.route, ConsoleRoute::Uart | ConsoleRoute::All) {
            self.uart.write_str(s).map_err(|_| ConsoleError::Output)?;
        }
        if matches!(self.route, ConsoleRoute::Local | ConsoleRoute::All) {
            self.local.write_str(s).map_err(|_| ConsoleError::Output)?;
        }
        Ok(())
    }

    /// Read into `buf` until carriage return or escape, or until `buf` is
    /// full. The terminator is neither stored nor echoed.
    ///
    /// Returns the number of bytes stored.
    pub fn read_line(&mut self, buf: &mut [u8]) -> usize {
        let mut len = 0;
        while len < buf.len() {
            let byte = self.read_char();
            if is_terminator(byte) {
                break;
            }
            buf[len] = byte;
            len += 1;
        }
        len
    }

    pub fn uart(&mut self) -> &mut U {
        &mut self.uart
    }

    pub fn local(&mut self) -> &mut L {
        &mut self.local
    }

    pub fn into_parts(self) -> (U, L) {
        (self.uart, self.local)
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == CR || byte == ESC
}

/// Line oriented operator console used by the diagnostics.
pub trait Terminal {
    /// Format `args` and send the result to the operator.
    fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError>;

    /// Block until the operator types a character. Typed characters other
    /// than carriage return and escape are echoed.
    fn read_char(&mut self) -> u8;

    /// [`Terminal::print`] followed by a line break.
    fn println(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError> {
        self.print(args)?;
        self.print(format_args!("\r\n"))
    }

    /// Ask the operator to confirm what they observed. `Y` or `y` confirms,
    /// any other key rejects.
    fn confirm(&mut self, question: &str) -> Result<bool, ConsoleError> {
        self.println(format_args!(
            "\r\nPress Y/y if {}, any other key for failure:",
            question
        ))?;
        let answer = self.read_char();
        Ok(matches!(answer, b'Y' | b'y'))
    }
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError> {
        (**self).print(args)
    }

    fn read_char(&mut self) -> u8 {
        (**self).read_char()
    }
}

impl<U, L> Terminal for Console<U, L>
where
    U: Write + ConsoleInput,
    L: Write + ConsoleInput,
{
    fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError> {
        let mut buf: String<MAX_WRITE_LEN> = String::new();
        if buf.write_fmt(args).is_err() {
            ::log::warn!("console message longer than {} bytes dropped", MAX_WRITE_LEN);
            return Err(ConsoleError::TooLong);
        }
        self.emit(&buf)
    }

    fn read_char(&mut self) -> u8 {
        match self.input {
            InputSource::Uart => {
                let byte = self.uart.read_byte();
                if !is_terminator(byte) {
                    self.uart.echo(byte);
                }
                byte
            }
            InputSource::Local => self.local.read_byte(),
        }
    }
}

/// Print a line on a [`Terminal`], like `println!`.
///
/// Evaluates to the `Result` of [`Terminal::println`].
#[macro_export]
macro_rules! msg {
    ($console:expr) => {
        $crate::msg!($console, "")
    };
    ($console:expr, $($arg:tt)*) => {{
        use $crate::console::Terminal as _;
        $console.println(format_args!($($arg)*))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String as StdString;
    use std::vec::Vec;

    #[derive(Default)]
    struct Sink {
        out: StdString,
        input: Vec<u8>,
        echoed: Vec<u8>,
    }

    impl Write for Sink {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.out.push_str(s);
            Ok(())
        }
    }

    impl ConsoleInput for Sink {
        fn read_byte(&mut self) -> u8 {
            self.input.remove(0)
        }

        fn echo(&mut self, byte: u8) {
            self.echoed.push(byte);
        }
    }

    fn console(route: ConsoleRoute) -> Console<Sink, Sink> {
        Console::new(Sink::default(), Sink::default(), route, InputSource::Uart)
    }

    #[test]
    fn routes_select_outputs() {
        let mut c = console(ConsoleRoute::Uart);
        msg!(c, "a {}", 1).unwrap();
        assert_eq!(c.configure_route(ConsoleRoute::Local), ConsoleRoute::Uart);
        msg!(c, "b").unwrap();
        assert_eq!(c.configure_route(ConsoleRoute::All), ConsoleRoute::Local);
        c.print(format_args!("c")).unwrap();
        let (uart, local) = c.into_parts();
        assert_eq!(uart.out, "a 1\r\nc");
        assert_eq!(local.out, "b\r\nc");
    }

    #[test]
    fn overlong_message_is_rejected() {
        let mut c = console(ConsoleRoute::All);
        let long = "x".repeat(MAX_WRITE_LEN + 1);
        assert_eq!(c.print(format_args!("{}", long)), Err(ConsoleError::TooLong));
        let exact = "x".repeat(MAX_WRITE_LEN);
        assert_eq!(c.print(format_args!("{}", exact)), Ok(()));
        assert_eq!(c.uart().out.len(), MAX_WRITE_LEN);
    }

    #[test]
    fn read_line_stops_at_terminators() {
        let mut c = console(ConsoleRoute::Uart);
        c.uart().input = b"ab\rcd\x1bef".to_vec();
        let mut buf = [0u8; 8];
        assert_eq!(c.read_line(&mut buf), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(c.read_line(&mut buf), 2);
        assert_eq!(&buf[..2], b"cd");
        assert_eq!(c.uart().echoed, b"abcd");

        let mut short = [0u8; 1];
        assert_eq!(c.read_line(&mut short), 1);
        assert_eq!(short[0], b'e');
    }

    #[test]
    fn local_input_is_not_echoed() {
        let mut c = console(ConsoleRoute::Local);
        assert_eq!(c.configure_input(InputSource::Local), InputSource::Uart);
        c.local().input = b"y".to_vec();
        assert_eq!(c.read_line(&mut [0u8; 1]), 1);
        assert!(c.local().echoed.is_empty());
    }

    #[test]
    fn confirmation_accepts_only_y() {
        for (key, expected) in [(b'Y', true), (b'y', true), (b'n', false), (CR, false)] {
            let mut c = console(ConsoleRoute::Uart);
            c.uart().input = std::vec![key];
            assert_eq!(c.confirm("the LEDs blink"), Ok(expected));
            assert!(c.uart().out.contains("Press Y/y if the LEDs blink"));
        }
    }

    #[test]
    fn confirmation_key_is_echoed_unless_it_terminates() {
        let mut c = console(ConsoleRoute::Uart);
        c.uart().input = b"y\r".to_vec();
        assert_eq!(c.confirm("the tone is audible"), Ok(true));
        assert_eq!(c.confirm("the tone is audible"), Ok(false));
        assert_eq!(c.uart().echoed, b"y");
    }
}
