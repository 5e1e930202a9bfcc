// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::console::Terminal;
use crate::diagnostics::{confirm, run, step, TestInfo};
use crate::msg;
use crate::platform::PlatformConfig;
use crate::status::{TestError, TestStatus};
use crate::sysctrl::{ParallelPortMode, SystemControl};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

pub const INFO: TestInfo = TestInfo {
    title: "LED Test",
    name: "LED Test",
};

/// The three BoosterPack LEDs. `led0` and `led1` are reachable in parallel
/// port mode 6, `led2` only in mode 2.
pub struct Leds<P> {
    pub led0: P,
    pub led1: P,
    pub led2: P,
}

/// Blink each LED in turn.
pub fn led_test<C, S, P, D>(
    console: &mut C,
    sys: &mut S,
    leds: &mut Leds<P>,
    delay: &mut D,
    config: &PlatformConfig,
) -> TestStatus
where
    C: Terminal,
    S: SystemControl,
    P: OutputPin,
    P::Error: Into<TestError>,
    D: DelayNs,
{
    run(console, &INFO, |console| {
        sys.enable_peripheral_clocks();
        sys.set_parallel_port_mode(ParallelPortMode::Mode6);

        msg!(console, "\r\nCheck if all three LED's on the BoosterPack are toggling")?;

        let on_ms = config.timing.led_on_ms;
        let result: Result<(), TestError> = (0..config.timing.led_blinks).try_for_each(|_| {
            blink(console, &mut leds.led0, delay, on_ms, "LED 0")?;
            blink(console, &mut leds.led1, delay, on_ms, "LED 1")?;
            sys.set_parallel_port_mode(ParallelPortMode::Mode2);
            blink(console, &mut leds.led2, delay, on_ms, "LED 2")?;
            sys.set_parallel_port_mode(ParallelPortMode::Mode6);
            Ok(())
        });
        sys.set_parallel_port_mode(ParallelPortMode::Mode1);
        result?;

        confirm(
            console,
            config.user_input,
            "three LED's are blinking properly",
            "LED's are not blinking properly",
        )
    })
}

fn blink<C, P, D>(console: &mut C, led: &mut P, delay: &mut D, on_ms: u32, name: &str) -> Result<(), TestError>
where
    C: Terminal,
    P: OutputPin,
    P::Error: Into<TestError>,
    D: DelayNs,
{
    step(console, led.set_high(), format_args!("Turning on {}", name))?;
    delay.delay_ms(on_ms);
    step(console, led.set_low(), format_args!("Turning off {}", name))
}
