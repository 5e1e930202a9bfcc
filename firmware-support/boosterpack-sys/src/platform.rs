// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Board bring-up shared by every diagnostic binary.

use crate::character_device::CharacterDevice;
use crate::console::{Console, ConsoleRoute, InputSource};
use crate::sysctrl::{ParallelPortMode, PllConfig, SystemControl};
use crate::uart::{Uart, UartConfig};
use ufmt::derive::uDebug;

/// Delays and repeat counts used by the diagnostics.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Pause between two current monitor register operations.
    pub ina_settle_us: u32,
    /// Pause before and after every OLED transfer.
    pub oled_wait_us: u32,
    /// How long OLED messages stay up before the next step.
    pub display_hold_ms: u32,
    pub led_on_ms: u32,
    pub led_blinks: u32,
    /// Length of the audio tone in seconds.
    pub tone_secs: u32,
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        ina_settle_us: 1_000,
        oled_wait_us: 10,
        display_hold_ms: 5_000,
        led_on_ms: 250,
        led_blinks: 10,
        tone_secs: 5,
    };
}

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub route: ConsoleRoute,
    pub input: InputSource,
    /// Finish each diagnostic with a Y/y prompt.
    pub user_input: bool,
    pub pll: PllConfig,
    pub uart: UartConfig,
    pub timing: Timing,
}

impl PlatformConfig {
    /// Settings selected by the `serial-console` and `user-input` features.
    pub const fn from_features() -> PlatformConfig {
        let serial = cfg!(feature = "serial-console");
        PlatformConfig {
            route: if serial {
                ConsoleRoute::Uart
            } else {
                ConsoleRoute::Local
            },
            input: if serial {
                InputSource::Uart
            } else {
                InputSource::Local
            },
            user_input: cfg!(feature = "user-input"),
            pll: PllConfig::MHZ_100,
            uart: UartConfig::DEFAULT,
            timing: Timing::DEFAULT,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig::from_features()
    }
}

/// Bring up clocks and the UART and return the diagnostic console.
pub fn init_platform<S: SystemControl>(
    sys: &mut S,
    mut uart: Uart,
    local: CharacterDevice,
    config: &PlatformConfig,
) -> Console<Uart, CharacterDevice> {
    sys.enable_peripheral_clocks();
    sys.program_pll(&config.pll);
    let sysclk_khz = sys.system_clock_khz();
    log::info!("system clock {} kHz", sysclk_khz);

    // The UART pins sit on the parallel port in mode 1.
    sys.set_parallel_port_mode(ParallelPortMode::Mode1);
    uart.configure(&config.uart, sysclk_khz);

    Console::new(uart, local, config.route, config.input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysctrl::SysCtrl;

    #[test]
    fn features_off_use_local_console() {
        let config = PlatformConfig::from_features();
        assert_eq!(config.route, ConsoleRoute::Local);
        assert_eq!(config.input, InputSource::Local);
        assert!(!config.user_input);
        assert_eq!(config.uart.baud_rate, 115_200);
    }

    #[test]
    fn init_programs_clock_and_uart() {
        let mut sys_regs = [0u32; 8];
        let mut uart_regs = [0u32; 6];
        let mut sys = unsafe { SysCtrl::new(sys_regs.as_mut_ptr().cast()) };
        let uart = unsafe { Uart::new(uart_regs.as_mut_ptr().cast()) };
        let config = PlatformConfig {
            route: ConsoleRoute::Uart,
            input: InputSource::Uart,
            ..PlatformConfig::from_features()
        };
        let mut console = init_platform(&mut sys, uart, CharacterDevice, &config);
        assert_eq!(console.route(), ConsoleRoute::Uart);
        crate::msg!(console, "x").unwrap();
        assert_eq!(sys.system_clock_khz(), 100_007);
        assert_eq!(sys.parallel_port_mode(), 1);
        assert_eq!(uart_regs[2], 54);
        // Last byte of "x\r\n".
        assert_eq!(uart_regs[0], u32::from(b'\n'));
    }
}
