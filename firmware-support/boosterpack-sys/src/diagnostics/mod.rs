// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Board bring-up diagnostics.
//!
//! Every diagnostic prints a banner, runs its steps in order and stops at the
//! first failed step after naming it on the console. The outcome is printed
//! and collapsed to a [`TestStatus`].

pub mod audio_playback;
pub mod current_monitor;
pub mod led;
pub mod oled_display;

use crate::console::Terminal;
use crate::msg;
use crate::status::{TestError, TestStatus};
use core::fmt;

/// Console identity of a diagnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TestInfo {
    /// Banner heading.
    pub title: &'static str,
    /// Name used in the result lines.
    pub name: &'static str,
}

const BANNER_RULE: &str = "*************************************";

/// Run `body` between the banner and the result lines of `info`.
pub fn run<C, F>(console: &mut C, info: &TestInfo, body: F) -> TestStatus
where
    C: Terminal,
    F: FnOnce(&mut C) -> Result<(), TestError>,
{
    // Framing lines are best effort; a console failure inside `body` still
    // fails the test.
    let _ = msg!(console, "\r\n{}", BANNER_RULE);
    let _ = msg!(console, "{:^37}", info.title);
    let _ = msg!(console, "{}", BANNER_RULE);

    let result = body(console);
    let outcome = match &result {
        Ok(()) => "Passed",
        Err(err) => {
            log::debug!("{}: {:?}", info.name, err);
            "Failed"
        }
    };
    let _ = msg!(console, "\r\n{} {}!", info.name, outcome);
    let _ = msg!(console, "{} Completed!", info.name);

    TestStatus::from(result)
}

/// Name the failed step on the console and widen its error.
pub fn step<C, T, E>(console: &mut C, result: Result<T, E>, what: fmt::Arguments<'_>) -> Result<T, TestError>
where
    C: Terminal,
    E: Into<TestError>,
{
    result.map_err(|err| {
        let _ = msg!(console, "{} failed", what);
        err.into()
    })
}

/// Ask the operator to confirm the observed behaviour when `enabled`.
pub fn confirm<C: Terminal>(
    console: &mut C,
    enabled: bool,
    question: &str,
    rejection: &str,
) -> Result<(), TestError> {
    if !enabled {
        return Ok(());
    }
    if console.confirm(question)? {
        Ok(())
    } else {
        msg!(console, "{}", rejection)?;
        Err(TestError::Rejected)
    }
}
