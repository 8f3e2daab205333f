// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Nest device records and entities.
//!
//! This module provides type-safe representations of the values carried on
//! Nest device records and exposed on entities.
//!
//! # Types
//!
//! - [`DeviceId`] - Service-assigned device identifier
//! - [`NestTimestamp`] - Lifecycle timestamps (manufacture, replace-by, self-test)
//! - [`PowerSource`] - Wired/battery classification from the `wired_or_battery` code
//! - [`BinarySensorDeviceClass`] / [`SensorDeviceClass`] - Framework device classes

mod datetime;
mod device_class;
mod device_id;
mod power_source;

pub use datetime::{DateTimeParseError, NestTimestamp};
pub use device_class::{BinarySensorDeviceClass, SensorDeviceClass};
pub use device_id::DeviceId;
pub use power_source::PowerSource;
