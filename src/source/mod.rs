// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device data sources.
//!
//! Sensor adapters never talk to the Nest service themselves. They read
//! device records from a shared [`DeviceDataSource`] and delegate polling to
//! its [`refresh`](DeviceDataSource::refresh) method, exactly as the host
//! framework expects: one upstream client, many read-only entities.
//!
//! The crate ships [`DeviceDataStore`], an in-memory source. A cloud client
//! typically owns a store, writes records into it as polls land, and
//! implements [`DeviceDataSource`] by delegating reads to the store while
//! performing its own network poll in `refresh`.
//!
//! # Examples
//!
//! ```
//! use nestor_lib::source::{DeviceDataSource, DeviceDataStore};
//! use nestor_lib::state::ProtectState;
//! use nestor_lib::types::DeviceId;
//!
//! let store = DeviceDataStore::new().with_protect(
//!     DeviceId::new("p1"),
//!     ProtectState::new().with_name("Hallway Protect").with_co_status(0),
//! );
//!
//! let ids = store.protects();
//! assert_eq!(ids.len(), 1);
//! assert_eq!(store.protect(&ids[0]).unwrap().co_status, Some(0));
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::state::{ProtectState, TemperatureSensorState};
use crate::types::DeviceId;

/// Shared state source for sensor adapters.
///
/// This trait stands in for the external API client that owns device
/// records: indexed read access per device, enumeration of known device
/// IDs, and a refresh operation that performs the actual upstream poll.
///
/// Record getters return cloned snapshots, so no lock guard escapes the
/// source and adapters can hold results across awaits.
#[async_trait]
pub trait DeviceDataSource: Send + Sync {
    /// Returns the IDs of all known Protect devices.
    fn protects(&self) -> Vec<DeviceId>;

    /// Returns the IDs of all known temperature sensor devices.
    fn temperature_sensors(&self) -> Vec<DeviceId>;

    /// Returns a snapshot of the record for a Protect device, if known.
    fn protect(&self, device_id: &DeviceId) -> Option<ProtectState>;

    /// Returns a snapshot of the record for a temperature sensor, if known.
    fn temperature_sensor(&self, device_id: &DeviceId) -> Option<TemperatureSensorState>;

    /// Refreshes device records from the upstream service.
    ///
    /// Entities call this from their own `update` before reading values.
    ///
    /// # Errors
    ///
    /// Implementations return whatever failure their upstream poll hits;
    /// entities propagate it unchanged.
    async fn refresh(&self) -> Result<()>;
}

/// In-memory device record store.
///
/// Keeps one record per device behind a read/write lock, keyed by
/// [`DeviceId`] in a sorted map so enumeration order is stable. Reads hand
/// out cloned snapshots; writes replace or patch whole records.
///
/// The store's [`refresh`](DeviceDataSource::refresh) is a no-op because
/// there is nothing upstream of it. A client owning network access wraps or
/// embeds a store and provides the real refresh.
#[derive(Debug, Default)]
pub struct DeviceDataStore {
    records: RwLock<Records>,
}

#[derive(Debug, Default)]
struct Records {
    protects: BTreeMap<DeviceId, ProtectState>,
    temperature_sensors: BTreeMap<DeviceId, TemperatureSensorState>,
}

impl DeviceDataStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a Protect record.
    #[must_use]
    pub fn with_protect(mut self, device_id: DeviceId, state: ProtectState) -> Self {
        self.records.get_mut().protects.insert(device_id, state);
        self
    }

    /// Seeds the store with a temperature sensor record.
    #[must_use]
    pub fn with_temperature_sensor(
        mut self,
        device_id: DeviceId,
        state: TemperatureSensorState,
    ) -> Self {
        self.records
            .get_mut()
            .temperature_sensors
            .insert(device_id, state);
        self
    }

    /// Inserts or replaces the record for a Protect device.
    pub fn insert_protect(&self, device_id: DeviceId, state: ProtectState) {
        tracing::debug!(device_id = %device_id, "Storing Protect record");
        self.records.write().protects.insert(device_id, state);
    }

    /// Inserts or replaces the record for a temperature sensor.
    pub fn insert_temperature_sensor(&self, device_id: DeviceId, state: TemperatureSensorState) {
        tracing::debug!(device_id = %device_id, "Storing temperature sensor record");
        self.records
            .write()
            .temperature_sensors
            .insert(device_id, state);
    }

    /// Patches the record for a Protect device in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no record exists for the ID.
    pub fn update_protect(
        &self,
        device_id: &DeviceId,
        patch: impl FnOnce(&mut ProtectState),
    ) -> Result<()> {
        let mut records = self.records.write();
        let state = records
            .protects
            .get_mut(device_id)
            .ok_or(Error::DeviceNotFound)?;
        patch(state);
        Ok(())
    }

    /// Patches the record for a temperature sensor in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no record exists for the ID.
    pub fn update_temperature_sensor(
        &self,
        device_id: &DeviceId,
        patch: impl FnOnce(&mut TemperatureSensorState),
    ) -> Result<()> {
        let mut records = self.records.write();
        let state = records
            .temperature_sensors
            .get_mut(device_id)
            .ok_or(Error::DeviceNotFound)?;
        patch(state);
        Ok(())
    }

    /// Removes the record for a Protect device.
    ///
    /// Returns the removed record, or `None` if the ID was unknown.
    pub fn remove_protect(&self, device_id: &DeviceId) -> Option<ProtectState> {
        self.records.write().protects.remove(device_id)
    }

    /// Removes the record for a temperature sensor.
    ///
    /// Returns the removed record, or `None` if the ID was unknown.
    pub fn remove_temperature_sensor(
        &self,
        device_id: &DeviceId,
    ) -> Option<TemperatureSensorState> {
        self.records.write().temperature_sensors.remove(device_id)
    }
}

#[async_trait]
impl DeviceDataSource for DeviceDataStore {
    fn protects(&self) -> Vec<DeviceId> {
        self.records.read().protects.keys().cloned().collect()
    }

    fn temperature_sensors(&self) -> Vec<DeviceId> {
        self.records
            .read()
            .temperature_sensors
            .keys()
            .cloned()
            .collect()
    }

    fn protect(&self, device_id: &DeviceId) -> Option<ProtectState> {
        self.records.read().protects.get(device_id).cloned()
    }

    fn temperature_sensor(&self, device_id: &DeviceId) -> Option<TemperatureSensorState> {
        self.records
            .read()
            .temperature_sensors
            .get(device_id)
            .cloned()
    }

    async fn refresh(&self) -> Result<()> {
        // Nothing upstream of an in-memory store
        tracing::trace!("Refresh requested on in-memory store");
        Ok(())
    }
}
