// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Drivers for the BoosterPack peripherals, generic over the `embedded-hal`
//! bus traits.

pub mod aic3206;
pub mod font;
pub mod ina219;
pub mod oled;
