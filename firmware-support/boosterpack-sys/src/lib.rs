// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

pub mod character_device;
pub mod console;
pub mod devices;
pub mod diagnostics;
pub mod gpio;
pub mod i2c;
pub mod i2s;
pub mod platform;
pub mod status;
pub mod sysctrl;
pub mod time;
pub mod uart;
