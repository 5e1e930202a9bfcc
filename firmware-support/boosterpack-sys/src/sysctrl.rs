// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! System control block: peripheral clock gating, PLL and pin multiplexing.

use ufmt::derive::uDebug;

/// PLL reference input in hertz.
pub const PLL_CLOCKIN: u32 = 32_768;

const PLL_LOCK_SPINS: u32 = 0x0FFF;

const CGCR1_CLR_CNTL: u16 = 0x8000;
const CGCR1_M_MASK: u16 = 0x0FFF;
const CGCR2_RDBYPASS: u16 = 0x8000;
const CGCR2_RDRATIO_MASK: u16 = 0x003F;
const CGCR4_OUTDIVEN: u16 = 0x0200;
const CGCR4_ODRATIO_MASK: u16 = 0x003F;

const EBSR_PPMODE_SHIFT: u16 = 12;
const EBSR_PPMODE_MASK: u16 = 0x7 << EBSR_PPMODE_SHIFT;
const EBSR_SP1MODE_SHIFT: u16 = 10;
const EBSR_SP1MODE_MASK: u16 = 0x3 << EBSR_SP1MODE_SHIFT;

/// Parallel port pin multiplexing. Mode 6 routes GPIO 16 and 17, mode 2
/// routes GPIO 28, mode 1 is the power-on default used by the UART.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParallelPortMode {
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
    Mode4 = 4,
    Mode5 = 5,
    Mode6 = 6,
}

/// Serial port 1 pin multiplexing. Mode 1 routes I2S1 and GP[11:10].
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialPortMode {
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
}

/// Clock generator register values.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PllConfig {
    pub cgcr1: u16,
    pub cgcr2: u16,
    pub cgcr3: u16,
    pub cgcr4: u16,
}

impl PllConfig {
    /// 100 MHz from the 32.768 kHz input: M = 3048, reference divider
    /// bypassed, output divider off.
    pub const MHZ_100: PllConfig = PllConfig {
        cgcr1: 0x8BE8,
        cgcr2: 0x8000,
        cgcr3: 0x0806,
        cgcr4: 0x0000,
    };

    /// System clock in kHz produced by these register values from `clkin`
    /// hertz.
    pub fn system_clock_khz(&self, clkin: u32) -> u32 {
        let m = u32::from(self.cgcr1 & CGCR1_M_MASK);
        let rd = u32::from(self.cgcr2 & CGCR2_RDRATIO_MASK);
        let od = u32::from(self.cgcr4 & CGCR4_ODRATIO_MASK);

        let mut clk = clkin;
        if self.cgcr2 & CGCR2_RDBYPASS == 0 {
            clk /= rd + 4;
        }
        clk *= m + 4;
        if self.cgcr4 & CGCR4_OUTDIVEN != 0 {
            clk /= od + 1;
        }
        clk / 1000
    }
}

/// System level controls the diagnostics need.
pub trait SystemControl {
    /// Ungate the clocks of every peripheral.
    fn enable_peripheral_clocks(&mut self);
    fn set_parallel_port_mode(&mut self, mode: ParallelPortMode);
    fn set_serial_port1_mode(&mut self, mode: SerialPortMode);
    /// Reprogram the PLL and switch the system clock over to it.
    fn program_pll(&mut self, pll: &PllConfig);
    /// Current system clock in kHz.
    fn system_clock_khz(&self) -> u32;
}

#[derive(uDebug)]
pub struct SysCtrl {
    pcgcr1: *mut u32,
    pcgcr2: *mut u32,
    ccr2: *mut u32,
    cgcr1: *mut u32,
    cgcr2: *mut u32,
    cgcr3: *mut u32,
    cgcr4: *mut u32,
    ebsr: *mut u32,
}

impl SysCtrl {
    /// Create a new [`SysCtrl`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by either the memory mapped system control block or at valid
    /// read-writable memory.
    pub const unsafe fn new(base_addr: *mut u8) -> SysCtrl {
        let regs: *mut u32 = base_addr.cast();
        SysCtrl {
            pcgcr1: regs,
            pcgcr2: regs.add(1),
            ccr2: regs.add(2),
            cgcr1: regs.add(3),
            cgcr2: regs.add(4),
            cgcr3: regs.add(5),
            cgcr4: regs.add(6),
            ebsr: regs.add(7),
        }
    }

    fn read(reg: *mut u32) -> u16 {
        unsafe { reg.read_volatile() as u16 }
    }

    fn write(reg: *mut u32, value: u16) {
        unsafe { reg.write_volatile(value.into()) }
    }

    /// The clock generator registers as currently programmed.
    pub fn pll(&self) -> PllConfig {
        PllConfig {
            cgcr1: Self::read(self.cgcr1),
            cgcr2: Self::read(self.cgcr2),
            cgcr3: Self::read(self.cgcr3),
            cgcr4: Self::read(self.cgcr4),
        }
    }

    pub fn parallel_port_mode(&self) -> u16 {
        (Self::read(self.ebsr) & EBSR_PPMODE_MASK) >> EBSR_PPMODE_SHIFT
    }
}

impl SystemControl for SysCtrl {
    fn enable_peripheral_clocks(&mut self) {
        Self::write(self.pcgcr1, 0);
        Self::write(self.pcgcr2, 0);
    }

    fn set_parallel_port_mode(&mut self, mode: ParallelPortMode) {
        let ebsr = Self::read(self.ebsr) & !EBSR_PPMODE_MASK;
        Self::write(self.ebsr, ebsr | ((mode as u16) << EBSR_PPMODE_SHIFT));
    }

    fn set_serial_port1_mode(&mut self, mode: SerialPortMode) {
        let ebsr = Self::read(self.ebsr) & !EBSR_SP1MODE_MASK;
        Self::write(self.ebsr, ebsr | ((mode as u16) << EBSR_SP1MODE_SHIFT));
    }

    fn program_pll(&mut self, pll: &PllConfig) {
        // Run from the bypass clock while the PLL is reprogrammed.
        Self::write(self.ccr2, 0);
        Self::write(self.cgcr1, Self::read(self.cgcr1) & !CGCR1_CLR_CNTL);
        Self::write(self.cgcr1, pll.cgcr1);
        Self::write(self.cgcr2, pll.cgcr2);
        Self::write(self.cgcr3, pll.cgcr3);
        Self::write(self.cgcr4, pll.cgcr4);

        for _ in 0..PLL_LOCK_SPINS {
            core::hint::spin_loop();
        }

        Self::write(self.ccr2, 1);
    }

    fn system_clock_khz(&self) -> u32 {
        self.pll().system_clock_khz(PLL_CLOCKIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_for_100mhz_pll() {
        assert_eq!(PllConfig::MHZ_100.system_clock_khz(PLL_CLOCKIN), 100_007);
    }

    #[test]
    fn dividers_apply_when_enabled() {
        let pll = PllConfig {
            cgcr1: 0x8BE8,
            cgcr2: 0x0000,
            cgcr3: 0x0806,
            cgcr4: CGCR4_OUTDIVEN | 1,
        };
        // 32768 / 4 * 3052 / 2
        assert_eq!(pll.system_clock_khz(PLL_CLOCKIN), 12_500);
    }

    #[test]
    fn program_pll_switches_to_pll() {
        let mut regs = [0u32; 8];
        regs[3] = 0xFFFF;
        let mut sys = unsafe { SysCtrl::new(regs.as_mut_ptr().cast()) };
        sys.program_pll(&PllConfig::MHZ_100);
        assert_eq!(sys.pll(), PllConfig::MHZ_100);
        assert_eq!(sys.system_clock_khz(), 100_007);
        assert_eq!(regs[2], 1);
    }

    #[test]
    fn pin_mux_fields_are_independent() {
        let mut regs = [0u32; 8];
        regs[0] = 0xFFFF;
        let mut sys = unsafe { SysCtrl::new(regs.as_mut_ptr().cast()) };
        sys.enable_peripheral_clocks();
        sys.set_serial_port1_mode(SerialPortMode::Mode1);
        sys.set_parallel_port_mode(ParallelPortMode::Mode6);
        assert_eq!(sys.parallel_port_mode(), 6);
        sys.set_parallel_port_mode(ParallelPortMode::Mode2);
        assert_eq!(regs[7], (2 << 12) | (1 << 10));
        assert_eq!(regs[0], 0);
    }
}
