// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::console::ConsoleInput;
use ufmt::derive::uDebug;

pub struct UartStatus {
    pub receive_buffer_empty: bool,
    pub transmit_buffer_full: bool,
}

pub struct TransmitBufferFull;
pub struct ReceiveBufferEmpty;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Line settings for [`Uart::configure`].
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
    /// Number of data bits, 5 to 8.
    pub data_bits: u8,
    pub stop_bits: StopBits,
    pub parity: Parity,
    /// Receive FIFO trigger level in characters: 1, 4, 8 or 14.
    pub fifo_trigger: u8,
    pub loopback: bool,
}

impl UartConfig {
    /// 115200 baud, 8N1, FIFO trigger at 14 characters.
    pub const DEFAULT: UartConfig = UartConfig {
        baud_rate: 115_200,
        data_bits: 8,
        stop_bits: StopBits::One,
        parity: Parity::None,
        fifo_trigger: 14,
        loopback: false,
    };

    /// Baud rate divisor for the 16x oversampling receiver, rounded to the
    /// nearest integer.
    pub fn divisor(&self, sysclk_khz: u32) -> u16 {
        let clk = u64::from(sysclk_khz) * 1000;
        let div = 16 * u64::from(self.baud_rate);
        ((clk + div / 2) / div).clamp(1, u16::MAX.into()) as u16
    }

    fn line_control(&self) -> u8 {
        let mut lcr = self.data_bits.clamp(5, 8) - 5;
        if self.stop_bits == StopBits::Two {
            lcr |= 0b0000_0100;
        }
        match self.parity {
            Parity::None => {}
            Parity::Odd => lcr |= 0b0000_1000,
            Parity::Even => lcr |= 0b0001_1000,
        }
        lcr
    }

    fn fifo_control(&self) -> u8 {
        let trigger = match self.fifo_trigger {
            0..=1 => 0b00,
            2..=4 => 0b01,
            5..=8 => 0b10,
            _ => 0b11,
        };
        (trigger << 6) | 0b0000_0111
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        UartConfig::DEFAULT
    }
}

#[derive(Clone)]
/// `Uart` is a structure representing a universal asynchronous receiver-transmitter.
pub struct Uart {
    /// `payload_addr` is a mutable pointer to the address of the data payload.
    payload_addr: *mut u8,
    /// `flags_addr` is a constant pointer to the address of the flags.
    flags_addr: *const u8,
    divisor_addr: *mut u16,
    line_control_addr: *mut u8,
    fifo_control_addr: *mut u8,
    modem_control_addr: *mut u8,
}

impl Uart {
    /// Create a new [`Uart`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by a memory mapped UART instance.
    pub const unsafe fn new(base_addr: *const ()) -> Uart {
        let addr = base_addr as *const u8;
        Uart {
            payload_addr: addr.cast_mut(),
            flags_addr: addr.add(4),
            divisor_addr: addr.add(8).cast_mut().cast(),
            line_control_addr: addr.add(12).cast_mut(),
            fifo_control_addr: addr.add(16).cast_mut(),
            modem_control_addr: addr.add(20).cast_mut(),
        }
    }

    /// Program line settings and the baud divisor for the given system clock.
    pub fn configure(&mut self, config: &UartConfig, sysclk_khz: u32) {
        let divisor = config.divisor(sysclk_khz);
        log::debug!(
            "uart: {} baud, divisor {} at {} kHz",
            config.baud_rate,
            divisor,
            sysclk_khz
        );
        unsafe {
            self.divisor_addr.write_volatile(divisor);
            self.line_control_addr.write_volatile(config.line_control());
            self.fifo_control_addr.write_volatile(config.fifo_control());
            self.modem_control_addr
                .write_volatile(if config.loopback { 0b1_0000 } else { 0 });
        }
    }

    /// UART status register output
    pub fn read_status(&self) -> UartStatus {
        let flags: u8 = unsafe { self.flags_addr.read_volatile() };

        let rx_mask = 0b10;
        let rx_empty = flags & rx_mask;

        let tx_mask = 0b01;
        let tx_full = flags & tx_mask;

        UartStatus {
            receive_buffer_empty: rx_empty != 0,
            transmit_buffer_full: tx_full != 0,
        }
    }

    /// The `receive` function attempts to receive data from the UART. If no
    /// data is available, it keeps looping until data is available.
    pub fn receive(&self) -> u8 {
        loop {
            if let Ok(val) = self.try_receive() {
                return val;
            }
        }
    }

    /// The `try_receive` function attempts to receive data from the UART. If no
    /// data is available, it returns an error.
    pub fn try_receive(&self) -> Result<u8, ReceiveBufferEmpty> {
        if self.read_status().receive_buffer_empty {
            Err(ReceiveBufferEmpty)
        } else {
            unsafe {
                let data: u8 = self.payload_addr.read_volatile();
                Ok(data)
            }
        }
    }

    /// The `send` function sends the given data to the UART. If the UART is
    /// unable to accept the data, it keeps looping until it can send the data.
    pub fn send(&self, data: u8) {
        loop {
            if let Ok(()) = self.try_send(data) {
                return;
            }
        }
    }

    /// The `try_send` function attempts to send the given data to the UART. If
    /// the UART is unable to accept the data, it returns an error.
    pub fn try_send(&self, data: u8) -> Result<(), TransmitBufferFull> {
        if self.read_status().transmit_buffer_full {
            Err(TransmitBufferFull)
        } else {
            unsafe {
                self.payload_addr.write_volatile(data);
                Ok(())
            }
        }
    }
}

impl ConsoleInput for Uart {
    fn read_byte(&mut self) -> u8 {
        self.receive()
    }

    fn echo(&mut self, byte: u8) {
        self.send(byte)
    }
}

impl ufmt::uWrite for Uart {
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }

    type Error = ();
}

impl core::fmt::Write for Uart {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }
}
