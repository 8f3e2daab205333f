// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `NestoR` Lib - A Rust library to monitor Nest Protect alarms and Nest
//! temperature sensors.
//!
//! This library turns polled Nest device records into Home
//! Assistant-style sensor entities. Device state arrives from the outside
//! (an API poller, a test fixture) through a [`DeviceDataSource`]; the
//! entities translate record fields into sensor states on demand.
//!
//! # Supported Features
//!
//! - **Binary sensors**: CO and smoke alarm states, motion, occupancy,
//!   line power, plus derived `health` and `device` verdicts
//! - **Value sensors**: raw status codes, battery readings, and a
//!   self-test summary per Protect
//! - **Temperature sensors**: readings in degrees Celsius with the battery
//!   level as an extra attribute
//! - **Pluggable data source**: entities read snapshots from any
//!   [`DeviceDataSource`]; [`DeviceDataStore`] is the bundled in-memory one
//!
//! # Quick Start
//!
//! ## Building the entity set
//!
//! ```
//! use nestor_lib::{binary_sensor, sensor, DeviceDataStore, DeviceId, Entity, ProtectState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> nestor_lib::Result<()> {
//!     let source = Arc::new(DeviceDataStore::new().with_protect(
//!         DeviceId::new("18B4300000000001"),
//!         ProtectState::new()
//!             .with_name("Hallway Protect")
//!             .with_co_status(0)
//!             .with_smoke_status(0),
//!     ));
//!
//!     let mut entities = binary_sensor::setup_platform(&source);
//!     entities.extend(sensor::setup_platform(&source));
//!
//!     for entity in &mut entities {
//!         entity.update().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Reading a single sensor
//!
//! ```
//! use nestor_lib::binary_sensor::{ProtectBinarySensor, ProtectBinarySensorKind};
//! use nestor_lib::{DeviceDataStore, DeviceId, ProtectState};
//! use std::sync::Arc;
//!
//! let source = Arc::new(DeviceDataStore::new().with_protect(
//!     DeviceId::new("18B4300000000001"),
//!     ProtectState::new().with_name("Hallway Protect").with_smoke_status(0),
//! ));
//!
//! let smoke = ProtectBinarySensor::new(
//!     Arc::clone(&source),
//!     DeviceId::new("18B4300000000001"),
//!     ProtectBinarySensorKind::SmokeStatus,
//! );
//!
//! assert_eq!(smoke.is_on(), Some(false));
//! ```
//!
//! ## Feeding new device data
//!
//! Whoever polls the Nest service pushes fresh records into the store;
//! entities pick the change up on their next read:
//!
//! ```
//! use nestor_lib::{DeviceDataStore, DeviceId, ProtectState};
//!
//! let store = DeviceDataStore::new()
//!     .with_protect(DeviceId::new("p1"), ProtectState::new().with_smoke_status(0));
//!
//! store.update_protect(&DeviceId::new("p1"), |state| {
//!     state.smoke_status = Some(2);
//! })?;
//! # Ok::<(), nestor_lib::Error>(())
//! ```

pub mod binary_sensor;
mod entity;
pub mod error;
pub mod sensor;
pub mod source;
pub mod state;
pub mod types;

pub use binary_sensor::{ProtectBinarySensor, ProtectBinarySensorKind};
pub use entity::Entity;
pub use error::{Error, ParseError, Result};
pub use sensor::{ProtectSensor, ProtectSensorKind, TemperatureSensor};
pub use source::{DeviceDataSource, DeviceDataStore};
pub use state::{ProtectState, TemperatureSensorState};
pub use types::{
    BinarySensorDeviceClass, DateTimeParseError, DeviceId, NestTimestamp, PowerSource,
    SensorDeviceClass,
};
