// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polled entity surface.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

/// A host-facing sensor entity.
///
/// This is the surface a home-automation host polls: identity, current
/// state, and extra attributes. All sensor adapters in this crate implement
/// it, so a host can hold them uniformly as `Box<dyn Entity>` and drive
/// them through one loop.
///
/// Identity and state getters return `Option`/`Null` rather than failing
/// when the underlying device record has not been populated yet; an entity
/// in that situation simply reads as unknown.
///
/// # Examples
///
/// ```
/// use nestor_lib::{binary_sensor, sensor, DeviceDataStore, DeviceId, Entity, ProtectState};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> nestor_lib::Result<()> {
/// let source = Arc::new(DeviceDataStore::new().with_protect(
///     DeviceId::new("p1"),
///     ProtectState::new().with_name("Hallway Protect").with_smoke_status(0),
/// ));
///
/// let mut entities = binary_sensor::setup_platform(&source);
/// entities.extend(sensor::setup_platform(&source));
///
/// for entity in &mut entities {
///     entity.update().await?;
///     println!(
///         "{} [{}] = {}",
///         entity.name().unwrap_or_default(),
///         entity.platform(),
///         entity.state_json()
///     );
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Entity: Send + Sync {
    /// Returns the display name, if the device record provides one.
    fn name(&self) -> Option<String>;

    /// Returns the unique ID, if it can be derived from the device record.
    fn unique_id(&self) -> Option<String>;

    /// Returns the host platform this entity belongs to
    /// (`"binary_sensor"` or `"sensor"`).
    fn platform(&self) -> &'static str;

    /// Returns the current state as a JSON value.
    ///
    /// Unknown states are `Value::Null`.
    fn state_json(&self) -> Value;

    /// Returns the extra state attributes.
    ///
    /// Entities without extra attributes return an empty map.
    fn extra_attributes(&self) -> Map<String, Value>;

    /// Polls the entity.
    ///
    /// Delegates to the shared data source's refresh, then recomputes any
    /// cached attributes from the fresh record.
    ///
    /// # Errors
    ///
    /// Propagates the data source's refresh failure unchanged.
    async fn update(&mut self) -> Result<()>;
}
