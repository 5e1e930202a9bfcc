// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::console::Terminal;
use crate::devices::aic3206::{play_tone, Aic3206, ToneConfig, ToneOutcome};
use crate::diagnostics::{confirm, run, step, TestInfo};
use crate::gpio::{Direction, Edge, Gpio, Pin};
use crate::i2s::{I2sConfig, I2sTransmit};
use crate::msg;
use crate::platform::PlatformConfig;
use crate::status::{TestError, TestStatus};
use crate::sysctrl::{ParallelPortMode, SerialPortMode, SystemControl};
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const INFO: TestInfo = TestInfo {
    title: "Audio Playback Test",
    name: "Audio Playback Test",
};

/// Play a sine tone on the headphone output until it ends or SW3 is pressed.
///
/// `stop` is raised by the GPIO interrupt handler, see
/// [`Gpio::service_interrupt`]. The I2S port is closed and the codec reset
/// once streaming ends, whether or not it succeeded.
#[allow(clippy::too_many_arguments)]
pub fn audio_playback_test<C, S, I, D, T>(
    console: &mut C,
    sys: &mut S,
    codec: &mut Aic3206<I, D>,
    i2s: &mut T,
    gpio: &mut Gpio,
    stop: &AtomicBool,
    config: &PlatformConfig,
) -> TestStatus
where
    C: Terminal,
    S: SystemControl,
    I: I2c,
    D: DelayNs,
    T: I2sTransmit,
    T::Error: Into<TestError>,
{
    run(console, &INFO, |console| {
        sys.enable_peripheral_clocks();
        sys.set_parallel_port_mode(ParallelPortMode::Mode1);
        sys.set_serial_port1_mode(SerialPortMode::Mode1);

        msg!(console, "Test outputs a sine tone on HEADPHONE port of BoosterPack")?;
        msg!(console, "Connect the headset to the HEADPHONE port of the BoosterPack")?;
        msg!(console, "Observe the Audio Tone at HEADPHONE port\r\n")?;
        msg!(console, "Starting the Audio Tone Play...")?;

        log::debug!("audio: configuring");
        step(
            console,
            codec.configure_playback().map_err(TestError::i2c),
            format_args!("AIC3206 playback configuration"),
        )?;

        i2s.open(&I2sConfig::CODEC);
        arm_stop_button(gpio, stop);
        let played = msg!(console, "Press SW3 on the BoosterPack for exiting from the test").map(|()| {
            log::debug!("audio: streaming");
            let tone = ToneConfig::seconds(config.timing.tone_secs);
            play_tone(i2s, &tone, stop)
        });

        i2s.close();
        gpio.disable_interrupt(Pin::SW3);
        let reset = codec.reset();
        log::debug!("audio: done");

        match step(console, played?, format_args!("Sine tone streaming"))? {
            ToneOutcome::Completed => {}
            ToneOutcome::Stopped(periods) => {
                log::info!("audio: stopped by SW3 after {} periods", periods);
                msg!(console, "Audio Tone Play stopped by SW3")?;
            }
        }
        step(
            console,
            reset.map_err(TestError::i2c),
            format_args!("AIC3206 reset"),
        )?;
        msg!(console, "Audio Tone Play Completed")?;

        confirm(
            console,
            config.user_input,
            "Audio output from the HEADPHONE port is proper",
            "No Audio stream is observed from the headset connected at the HEADPHONE port",
        )
    })
}

fn arm_stop_button(gpio: &mut Gpio, stop: &AtomicBool) {
    gpio.reset();
    gpio.config_bit(Pin::SW3, Direction::Input);
    stop.store(false, Ordering::Relaxed);
    gpio.enable_interrupt(Pin::SW3, Edge::Rising);
}
