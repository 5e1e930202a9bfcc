// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
use crate::character_device::CharacterDevice;
use crate::console::ConsoleRoute;
use crate::uart::Uart;

// The logger utilizes core::fmt to format the log messages because ufmt formatting is not
// compatible with (dependencies of) the log crate.
use core::fmt::Write;
use log::LevelFilter;

/// A global logger instance to be used with the `log` crate.
///
/// Use `set_logger` to set the output to be used for logging.
/// # Safety
/// Using this logger is only safe if there is only one thread of execution.
/// Even though `ConsoleLogger` is `Send` and `Sync`, the underlying devices are not `Send` or `Sync`.
pub static mut LOGGER: ConsoleLogger = ConsoleLogger {
    sink: None,
    display_level: LevelFilter::Trace,
    display_source: LevelFilter::Trace,
};

/// Output device of the [`ConsoleLogger`].
pub enum LogSink {
    Uart(Uart),
    Local(CharacterDevice),
}

impl LogSink {
    /// The sink matching a console `route`. Logs go to the UART whenever the
    /// console output does.
    pub fn for_route(route: ConsoleRoute, uart: Uart) -> LogSink {
        match route {
            ConsoleRoute::Uart | ConsoleRoute::All => LogSink::Uart(uart),
            ConsoleRoute::Local => LogSink::Local(CharacterDevice),
        }
    }
}

impl Write for LogSink {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        match self {
            LogSink::Uart(uart) => uart.write_str(s),
            LogSink::Local(dev) => dev.write_str(s),
        }
    }
}

/// Wrapper for the console devices to be used as a logger with the `log` crate.
/// Instead of making a new logger, use the `set_logger` method of the `LOGGER` instance.
/// # Safety
/// Using this logger is only safe if there is only one thread of execution.
/// Even though `ConsoleLogger` is `Send` and `Sync`, the underlying devices are not `Send` or `Sync`.
pub struct ConsoleLogger {
    sink: Option<LogSink>,
    /// Records at or above this level are prefixed with their level.
    pub display_level: LevelFilter,
    /// Records at or above this level are prefixed with their source location.
    pub display_source: LevelFilter,
}

impl ConsoleLogger {
    /// Set the logger to use the given output.
    /// # Safety
    /// Using this function and logger is only safe if there is only one thread of execution.
    /// This function is used to assign the device to a global (`static mut`), but the devices
    /// are not `Send` or `Sync`.
    pub unsafe fn set_logger(&mut self, sink: LogSink) {
        self.sink = Some(sink);
    }
}

/// Install [`LOGGER`] as the `log` backend, writing to `sink` and passing
/// records up to `level`.
///
/// # Safety
/// Same as [`ConsoleLogger::set_logger`]. Call once, before anything is logged.
pub unsafe fn install(sink: LogSink, level: LevelFilter) {
    let logger = &mut *core::ptr::addr_of_mut!(LOGGER);
    logger.set_logger(sink);
    logger.display_source = LevelFilter::Warn;
    log::set_logger_racy(logger).ok();
    log::set_max_level_racy(level);
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // SAFETY: single thread of execution, see `LOGGER`.
        let sink = unsafe { &mut *core::ptr::addr_of_mut!(LOGGER.sink) };
        // Records logged before a sink is installed are dropped.
        let Some(out) = sink else {
            return;
        };
        if record.level() <= self.display_level {
            let _ = write!(out, "{} | ", record.level());
        }
        if record.level() <= self.display_source {
            let _ = write!(
                out,
                "{}:{} - ",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0)
            );
        }
        let _ = write!(out, "{}\r\n", record.args());
    }

    fn flush(&self) {}
}

unsafe impl core::marker::Send for ConsoleLogger {}
unsafe impl core::marker::Sync for ConsoleLogger {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_follows_the_console_route() {
        let mut regs = [0u32; 8];
        let uart = unsafe { Uart::new(regs.as_mut_ptr().cast()) };
        assert!(matches!(
            LogSink::for_route(ConsoleRoute::Local, uart.clone()),
            LogSink::Local(_)
        ));
        assert!(matches!(
            LogSink::for_route(ConsoleRoute::Uart, uart.clone()),
            LogSink::Uart(_)
        ));
        assert!(matches!(
            LogSink::for_route(ConsoleRoute::All, uart),
            LogSink::Uart(_)
        ));
    }
}
