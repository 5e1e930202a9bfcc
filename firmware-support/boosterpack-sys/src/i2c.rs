// SPDX-FileCopyrightText: 2023-2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation, SevenBitAddress};
use ufmt::derive::uDebug;

#[derive(Copy, Clone, uDebug)]
pub struct I2CFlags {
    pub bus_busy: bool,
    pub arbitration_lost: bool,
    pub acknowledge_incoming: bool,
    pub transaction_acknowledged: bool,
    pub bus_claimed: bool,
    pub statemachine_reset: bool,
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum I2CError {
    ArbitrationLost,
    BusClaimedByOther,
    /// The target did not acknowledge its address.
    AddressNotAcknowledged,
    /// The target did not acknowledge a data byte.
    NotAcknowledged,
}

impl embedded_hal::i2c::Error for I2CError {
    fn kind(&self) -> ErrorKind {
        match self {
            I2CError::ArbitrationLost => ErrorKind::ArbitrationLoss,
            I2CError::BusClaimedByOther => ErrorKind::Bus,
            I2CError::AddressNotAcknowledged => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            I2CError::NotAcknowledged => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        }
    }
}

/// `I2C` is the memory mapped I2C master the BoosterPack devices hang off.
#[derive(uDebug)]
pub struct I2C {
    /// `payload_addr` is a mutable pointer to the address of the data payload.
    payload_addr: *mut u8,
    /// `flags_addr` is a constant pointer to the address of the flags.
    flags_addr: *mut u8,
    /// `clk_div_addr` is a constant pointer to the address of the clock divider.
    clk_div_addr: *mut u16,
}

impl I2C {
    /// Bus clock divider for 100 kHz from the 100 MHz system clock.
    pub const STANDARD_MODE_DIVIDER: u16 = 250;

    /// Create a new [`I2C`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by either a memory mapped I2C instance or at valid read-writable memory
    /// (which will likely cause incorrect behaviour, but not break memory safety)
    pub const unsafe fn new(base_addr: *mut u8) -> I2C {
        I2C {
            payload_addr: base_addr,
            clk_div_addr: base_addr.add(4).cast(),
            flags_addr: base_addr.add(8).cast(),
        }
    }

    /// Reset the state machine flags and program the bus clock.
    pub fn init(&mut self, clk_div: u16) {
        let flags = I2CFlags {
            bus_busy: false,
            arbitration_lost: false,
            acknowledge_incoming: false,
            transaction_acknowledged: false,
            bus_claimed: false,
            statemachine_reset: false,
        };
        self.write_flags(flags);
        self.set_clock_divider(clk_div);
    }

    pub fn claim_bus(&mut self) -> Result<(), I2CError> {
        let mut flags = self.read_flags();
        if flags.bus_busy && !flags.bus_claimed {
            Err(I2CError::BusClaimedByOther)
        } else {
            flags.bus_claimed = true;
            self.write_flags(flags);
            Ok(())
        }
    }

    pub fn release_bus(&mut self) {
        let mut flags = self.read_flags();
        flags.bus_claimed = false;
        flags.arbitration_lost = false;
        flags.acknowledge_incoming = false;
        self.write_flags(flags);
    }

    /// Read one byte from the claimed bus. `ack` tells the target whether
    /// more bytes will follow.
    pub fn read_byte(&mut self, ack: bool) -> Result<u8, I2CError> {
        let mut flags = self.read_flags();
        flags.acknowledge_incoming = ack;
        self.write_flags(flags);
        let data = unsafe { self.payload_addr.read_volatile() };
        let old_flags = self.read_flags();
        let mut new_flags = old_flags;
        new_flags.arbitration_lost = false;
        new_flags.transaction_acknowledged = false;
        self.write_flags(new_flags);
        if old_flags.arbitration_lost {
            Err(I2CError::ArbitrationLost)
        } else {
            Ok(data)
        }
    }

    /// Write one byte to the claimed bus.
    pub fn write_byte(&mut self, data: u8) -> Result<(), I2CError> {
        unsafe { self.payload_addr.write_volatile(data) };
        let old_flags = self.read_flags();
        let mut new_flags = old_flags;
        new_flags.arbitration_lost = false;
        new_flags.transaction_acknowledged = false;
        self.write_flags(new_flags);
        if old_flags.arbitration_lost {
            Err(I2CError::ArbitrationLost)
        } else if !old_flags.transaction_acknowledged {
            Err(I2CError::NotAcknowledged)
        } else {
            Ok(())
        }
    }

    /// Send a (repeated) start condition with the address byte.
    fn start(&mut self, address: u8, read: bool) -> Result<(), I2CError> {
        self.claim_bus()?;
        match self.write_byte((address << 1) | read as u8) {
            Err(I2CError::NotAcknowledged) => Err(I2CError::AddressNotAcknowledged),
            other => other,
        }
    }

    fn run_operations(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), I2CError> {
        let mut previous_read = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if previous_read != Some(false) {
                        self.start(address, false)?;
                    }
                    for &b in bytes.iter() {
                        self.write_byte(b)?;
                    }
                    previous_read = Some(false);
                }
                Operation::Read(buffer) => {
                    if previous_read != Some(true) {
                        self.start(address, true)?;
                    }
                    let last = buffer.len().saturating_sub(1);
                    for (i, b) in buffer.iter_mut().enumerate() {
                        *b = self.read_byte(i != last)?;
                    }
                    previous_read = Some(true);
                }
            }
        }
        Ok(())
    }

    ///  I2C status register output
    pub fn read_flags(&mut self) -> I2CFlags {
        let flags = unsafe { self.flags_addr.read_volatile() } as u32;

        let bus_busy = check_bit(flags, 5);
        let arbitration_lost = check_bit(flags, 4);
        let transaction_acknowledged = check_bit(flags, 3);
        let acknowledge_incoming = check_bit(flags, 2);
        let bus_claimed = check_bit(flags, 1);
        let statemachine_reset = check_bit(flags, 0);

        I2CFlags {
            bus_busy,
            arbitration_lost,
            transaction_acknowledged,
            acknowledge_incoming,
            bus_claimed,
            statemachine_reset,
        }
    }

    /// I2C control register input
    pub fn write_flags(&mut self, status: I2CFlags) {
        let mut flags: u8 = 0;

        if status.arbitration_lost {
            flags |= 0b010000;
        }
        if status.transaction_acknowledged {
            flags |= 0b001000;
        }
        if status.acknowledge_incoming {
            flags |= 0b000100;
        }
        if status.bus_claimed {
            flags |= 0b000010;
        }
        if status.statemachine_reset {
            flags |= 0b000001;
        }

        unsafe { self.flags_addr.write_volatile(flags) };
    }

    pub fn get_clock_divider(&mut self) -> u16 {
        unsafe { self.clk_div_addr.read_volatile() }
    }

    pub fn set_clock_divider(&mut self, clk_div: u16) {
        unsafe { self.clk_div_addr.write_volatile(clk_div) }
    }
}

impl ErrorType for I2C {
    type Error = I2CError;
}

impl embedded_hal::i2c::I2c<SevenBitAddress> for I2C {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let result = self.run_operations(address, operations);
        self.release_bus();
        if let Err(err) = result {
            log::debug!("i2c transaction with 0x{:02X} failed: {:?}", address, err);
        }
        result
    }
}

/// Check whether a device answers at `address`.
///
/// The probe is a single write of `payload`; a missing device shows up as
/// an address NACK.
pub fn probe<I: embedded_hal::i2c::I2c>(
    i2c: &mut I,
    address: u8,
    payload: &[u8],
) -> Result<(), I::Error> {
    i2c.write(address, payload)
}

fn check_bit(a: u32, index: u32) -> bool {
    let mask = 1 << index;
    a & mask == mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_packed() {
        let mut regs = [0u32; 3];
        let mut i2c = unsafe { I2C::new(regs.as_mut_ptr().cast()) };
        i2c.write_flags(I2CFlags {
            bus_busy: false,
            arbitration_lost: true,
            acknowledge_incoming: false,
            transaction_acknowledged: true,
            bus_claimed: true,
            statemachine_reset: false,
        });
        assert_eq!(regs[2] & 0xFF, 0b011010);
    }

    #[test]
    fn busy_bus_cannot_be_claimed() {
        let mut regs = [0u32; 3];
        regs[2] = 0b100000;
        let mut i2c = unsafe { I2C::new(regs.as_mut_ptr().cast()) };
        assert_eq!(i2c.claim_bus(), Err(I2CError::BusClaimedByOther));
    }

    #[test]
    fn missing_acknowledge_is_reported() {
        // RAM-backed flags never see the acknowledge bit set.
        let mut regs = [0u32; 3];
        let mut i2c = unsafe { I2C::new(regs.as_mut_ptr().cast()) };
        let err = embedded_hal::i2c::I2c::write(&mut i2c, 0x3C, &[0x81]).unwrap_err();
        assert_eq!(err, I2CError::AddressNotAcknowledged);
        assert_eq!(regs[0] & 0xFF, 0x3C << 1);
    }

    #[test]
    fn clock_divider() {
        let mut regs = [0u32; 3];
        let mut i2c = unsafe { I2C::new(regs.as_mut_ptr().cast()) };
        i2c.init(I2C::STANDARD_MODE_DIVIDER);
        assert_eq!(i2c.get_clock_divider(), 250);
    }
}
