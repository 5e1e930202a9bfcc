// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::console::Terminal;
use crate::devices::oled::{Line, Oled, Orientation, OLED_ADDR};
use crate::diagnostics::{confirm, run, step, TestInfo};
use crate::msg;
use crate::platform::PlatformConfig;
use crate::status::{TestError, TestStatus};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const INFO: TestInfo = TestInfo {
    title: "OLED TEST",
    name: "OLED Test",
};

/// Detect the display, then show messages on each line and on both lines.
///
/// `hold` paces the steps so the operator can read the display; the display
/// driver keeps its own delay for bus timing.
pub fn oled_display_test<C, I, D, H>(
    console: &mut C,
    oled: &mut Oled<I, D>,
    hold: &mut H,
    config: &PlatformConfig,
) -> TestStatus
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
    H: DelayNs,
{
    run(console, &INFO, |console| {
        msg!(console, "Running OLED Device Detect Test...")?;
        step(
            console,
            oled.probe()
                .map_err(|_| TestError::NoDevice { address: OLED_ADDR }),
            format_args!("OLED detection"),
        )?;
        msg!(console, "OLED detection Successful\r\n")?;

        msg!(console, "Running OLED Display Test...")?;
        let hold_ms = config.timing.display_hold_ms;

        msg!(console, "\r\nDisplaying 'Cos tam' on first row...")?;
        single_line(console, oled, Line::First, "Cos tam")?;
        hold.delay_ms(hold_ms);

        msg!(console, "\r\nDisplaying 'Cos tam' on second row...")?;
        single_line(console, oled, Line::Second, "Cos tam")?;
        hold.delay_ms(hold_ms);

        msg!(
            console,
            "\r\nDisplaying 'Karol i Bartek' on first row and\r\n'BFF' on the second row\r\n"
        )?;
        both_lines(console, oled, "Karol i Bartek", "BFF")?;
        hold.delay_ms(hold_ms);

        msg!(console, "Scrolling OLED Display from Right to Left")?;
        for _ in 0..2 {
            step(console, oled.scroll_left(), format_args!("scroll_left: Left scroll"))?;
        }

        msg!(console, "OLED Display Test Completed")?;
        confirm(
            console,
            config.user_input,
            "the test messages are displayed properly on OLED",
            "Test messages are not displayed on the OLED",
        )
    })
}

fn prepare<C, I, D>(console: &mut C, oled: &mut Oled<I, D>) -> Result<(), TestError>
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
{
    step(console, oled.initialize(), format_args!("initialize: OLED module init"))?;
    step(console, oled.clear(), format_args!("clear: OLED screen clear"))
}

fn print_on<C, I, D>(console: &mut C, oled: &mut Oled<I, D>, line: Line, text: &str) -> Result<(), TestError>
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
{
    step(console, oled.set_line(line), format_args!("set_line: {:?} line", line))?;
    step(
        console,
        oled.set_orientation(Orientation::Horizontal),
        format_args!("set_orientation: Horizontal orientation"),
    )?;
    let printed = step(console, oled.print_string(text), format_args!("print_string: OLED print"))?;
    if printed < text.len() {
        log::warn!("oled: {} of {} characters fit on the line", printed, text.len());
    }
    Ok(())
}

fn single_line<C, I, D>(console: &mut C, oled: &mut Oled<I, D>, line: Line, text: &str) -> Result<(), TestError>
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
{
    prepare(console, oled)?;
    print_on(console, oled, line, text)
}

fn both_lines<C, I, D>(console: &mut C, oled: &mut Oled<I, D>, first: &str, second: &str) -> Result<(), TestError>
where
    C: Terminal,
    I: I2c,
    D: DelayNs,
{
    prepare(console, oled)?;
    print_on(console, oled, Line::First, first)?;
    print_on(console, oled, Line::Second, second)
}
