// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary sensor entities for Protect devices.
//!
//! Each Protect exposes one boolean-valued entity per monitored field:
//! alarm states (CO, smoke), presence (motion, occupancy), line power, and
//! two derived pseudo-sensors (`health`, `device`). The `is_on` rules are
//! fixed per field and read straight off the shared device record.
//!
//! # Examples
//!
//! ```
//! use nestor_lib::binary_sensor::{ProtectBinarySensor, ProtectBinarySensorKind};
//! use nestor_lib::{DeviceDataStore, DeviceId, ProtectState};
//! use std::sync::Arc;
//!
//! let source = Arc::new(DeviceDataStore::new().with_protect(
//!     DeviceId::new("p1"),
//!     ProtectState::new().with_name("Hallway Protect").with_smoke_status(2),
//! ));
//!
//! let smoke = ProtectBinarySensor::new(
//!     Arc::clone(&source),
//!     DeviceId::new("p1"),
//!     ProtectBinarySensorKind::SmokeStatus,
//! );
//!
//! assert_eq!(smoke.is_on(), Some(true));
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::entity::Entity;
use crate::error::Result;
use crate::source::DeviceDataSource;
use crate::state::ProtectState;
use crate::types::{BinarySensorDeviceClass, DeviceId};

/// The monitored fields a Protect exposes as binary sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectBinarySensorKind {
    /// CO alarm state (status code above zero).
    CoStatus,
    /// Smoke alarm state (status code above zero).
    SmokeStatus,
    /// Motion detected (negation of the record's quiet flag).
    Motion,
    /// Mains power present.
    LinePower,
    /// Structure occupied (negation of the record's away flag).
    Occupancy,
    /// Device health verdict from self-tests and the replace-by date.
    Health,
    /// Device presence, keyed off the serial number.
    Device,
}

impl ProtectBinarySensorKind {
    /// All kinds, in platform creation order.
    pub const ALL: [Self; 7] = [
        Self::CoStatus,
        Self::SmokeStatus,
        Self::Motion,
        Self::LinePower,
        Self::Occupancy,
        Self::Health,
        Self::Device,
    ];

    /// Returns the device record field this kind reads.
    ///
    /// The two pseudo-sensors (`health`, `device`) derive their state from
    /// several fields; their names here are the sensor-type tokens used in
    /// entity IDs.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::CoStatus => "co_status",
            Self::SmokeStatus => "smoke_status",
            Self::Motion => "auto_away",
            Self::LinePower => "line_power_present",
            Self::Occupancy => "home_away_input",
            Self::Health => "health",
            Self::Device => "device",
        }
    }

    /// Returns the human-readable label used in entity names.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CoStatus => "CO Status",
            Self::SmokeStatus => "Smoke Status",
            Self::Motion => "Motion",
            Self::LinePower => "Line Power",
            Self::Occupancy => "Occupancy",
            Self::Health => "Health",
            Self::Device => "Device",
        }
    }

    /// Returns the device class for this kind.
    #[must_use]
    pub const fn device_class(&self) -> BinarySensorDeviceClass {
        match self {
            Self::CoStatus => BinarySensorDeviceClass::Gas,
            Self::SmokeStatus => BinarySensorDeviceClass::Smoke,
            Self::Motion => BinarySensorDeviceClass::Motion,
            Self::LinePower => BinarySensorDeviceClass::Power,
            Self::Occupancy => BinarySensorDeviceClass::Occupancy,
            Self::Health => BinarySensorDeviceClass::Problem,
            Self::Device => BinarySensorDeviceClass::Connectivity,
        }
    }

    /// Extra attribute keys this kind carries, if any.
    const fn attribute_keys(self) -> &'static [&'static str] {
        match self {
            Self::Health => &[
                "component_wifi_test_passed",
                "component_co_test_passed",
                "component_smoke_test_passed",
                "component_speaker_test_passed",
                "component_led_test_passed",
                "last_audio_self_test_end_utc_secs",
            ],
            Self::Device => &[
                "manufactured_on",
                "replace_by",
                "serial_number",
                "power_source",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for ProtectBinarySensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Binary sensor entity for one (device, field) pair.
///
/// Holds a shared handle to the data source and reads a fresh record
/// snapshot on every property access. The only state kept locally is the
/// cached extra-attribute map, refreshed by [`Entity::update`].
#[derive(Debug)]
pub struct ProtectBinarySensor<S: DeviceDataSource> {
    source: Arc<S>,
    device_id: DeviceId,
    kind: ProtectBinarySensorKind,
    extra_attributes: Map<String, Value>,
}

impl<S: DeviceDataSource> ProtectBinarySensor<S> {
    /// Creates a binary sensor for one monitored field of a device.
    ///
    /// Attribute-carrying kinds start with their keys present and `null`
    /// until the first update.
    #[must_use]
    pub fn new(source: Arc<S>, device_id: DeviceId, kind: ProtectBinarySensorKind) -> Self {
        let extra_attributes = kind
            .attribute_keys()
            .iter()
            .map(|key| ((*key).to_string(), Value::Null))
            .collect();

        Self {
            source,
            device_id,
            kind,
            extra_attributes,
        }
    }

    /// Returns the device this sensor reads.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the monitored field.
    #[must_use]
    pub const fn kind(&self) -> ProtectBinarySensorKind {
        self.kind
    }

    /// Returns the device class for this sensor.
    #[must_use]
    pub const fn device_class(&self) -> BinarySensorDeviceClass {
        self.kind.device_class()
    }

    /// Returns whether the sensor is on, or `None` when unknown.
    ///
    /// The per-field rules:
    ///
    /// - CO / smoke: status code above zero.
    /// - Motion / occupancy: negation of the record's quiet/away flag.
    /// - Line power: raw flag.
    /// - `device`: serial number present.
    /// - `health`: healthy unless all five self-tests pass and the
    ///   replace-by date has passed; see [`Self::is_on_at`].
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.is_on_at(Utc::now())
    }

    /// Like [`Self::is_on`], with an explicit reference instant for the
    /// health kind's replace-by comparison.
    #[must_use]
    pub fn is_on_at(&self, now: DateTime<Utc>) -> Option<bool> {
        let state = self.state()?;

        match self.kind {
            ProtectBinarySensorKind::CoStatus => state.co_status.map(|code| code > 0),
            ProtectBinarySensorKind::SmokeStatus => state.smoke_status.map(|code| code > 0),
            ProtectBinarySensorKind::Motion => state.auto_away.map(|quiet| !quiet),
            ProtectBinarySensorKind::LinePower => state.line_power_present,
            ProtectBinarySensorKind::Occupancy => state.home_away_input.map(|away| !away),
            ProtectBinarySensorKind::Device => Some(state.serial_number.is_some()),
            ProtectBinarySensorKind::Health => health_is_on(&state, now),
        }
    }

    fn state(&self) -> Option<ProtectState> {
        self.source.protect(&self.device_id)
    }

    /// Computes the attribute map for the current record.
    fn computed_attributes(&self) -> Map<String, Value> {
        let state = self.state().unwrap_or_default();
        let mut attrs = Map::new();

        match self.kind {
            ProtectBinarySensorKind::Health => {
                insert_flag(&mut attrs, "component_wifi_test_passed", state.wifi_test_passed);
                insert_flag(&mut attrs, "component_co_test_passed", state.co_test_passed);
                insert_flag(&mut attrs, "component_smoke_test_passed", state.smoke_test_passed);
                insert_flag(&mut attrs, "component_speaker_test_passed", state.speaker_test_passed);
                insert_flag(&mut attrs, "component_led_test_passed", state.led_test_passed);
                attrs.insert(
                    "last_audio_self_test_end_utc_secs".to_string(),
                    state
                        .last_audio_self_test_end
                        .map_or(Value::Null, Value::from),
                );
            }
            ProtectBinarySensorKind::Device => {
                let power_source = state.power_source();
                attrs.insert(
                    "manufactured_on".to_string(),
                    state
                        .born_on_date
                        .as_ref()
                        .map_or(Value::Null, |date| Value::from(date.to_string())),
                );
                attrs.insert(
                    "replace_by".to_string(),
                    state
                        .replace_by_date
                        .as_ref()
                        .map_or(Value::Null, |date| Value::from(date.to_string())),
                );
                attrs.insert(
                    "serial_number".to_string(),
                    state.serial_number.map_or(Value::Null, Value::from),
                );
                attrs.insert(
                    "power_source".to_string(),
                    Value::from(power_source.to_string()),
                );
            }
            _ => {}
        }

        attrs
    }
}

/// Health verdict from self-test flags and the replace-by date.
///
/// The wifi flag doubles as the "any self-test data received" marker; until
/// it arrives the verdict is unknown. When the replace-by date has not been
/// reported, the flags alone decide.
fn health_is_on(state: &ProtectState, now: DateTime<Utc>) -> Option<bool> {
    if state.wifi_test_passed.is_none() {
        return None;
    }

    let tests_passed = state.all_self_tests_passed();

    match &state.replace_by_date {
        None => Some(!tests_passed),
        Some(replace_by) => Some(!(tests_passed && replace_by.is_past(now))),
    }
}

fn insert_flag(attrs: &mut Map<String, Value>, key: &str, flag: Option<bool>) {
    attrs.insert(key.to_string(), flag.map_or(Value::Null, Value::from));
}

#[async_trait]
impl<S: DeviceDataSource> Entity for ProtectBinarySensor<S> {
    /// Display name: `"{device name} {label}"`.
    fn name(&self) -> Option<String> {
        let name = self.state()?.name?;
        Some(format!("{name} {}", self.kind.label()))
    }

    /// Unique ID: `"{device name} {field name}"`, the service's historical
    /// format for these entities.
    fn unique_id(&self) -> Option<String> {
        let name = self.state()?.name?;
        Some(format!("{name} {}", self.kind.field_name()))
    }

    fn platform(&self) -> &'static str {
        "binary_sensor"
    }

    fn state_json(&self) -> Value {
        self.is_on().map_or(Value::Null, Value::from)
    }

    fn extra_attributes(&self) -> Map<String, Value> {
        self.extra_attributes.clone()
    }

    async fn update(&mut self) -> Result<()> {
        self.source.refresh().await?;

        if !self.kind.attribute_keys().is_empty() {
            self.extra_attributes = self.computed_attributes();
        }

        Ok(())
    }
}

/// Builds the binary sensor entities for every known Protect device.
///
/// One entity per (device, kind) pair, in [`ProtectBinarySensorKind::ALL`]
/// order, for every device the source enumerates.
pub fn setup_platform<S: DeviceDataSource + 'static>(source: &Arc<S>) -> Vec<Box<dyn Entity>> {
    tracing::info!("Adding Protect binary sensors");

    let mut entities: Vec<Box<dyn Entity>> = Vec::new();
    for device_id in source.protects() {
        tracing::info!(device_id = %device_id, "Adding Protect binary sensors for device");
        for kind in ProtectBinarySensorKind::ALL {
            entities.push(Box::new(ProtectBinarySensor::new(
                Arc::clone(source),
                device_id.clone(),
                kind,
            )));
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DeviceDataStore;

    fn sensor_for(
        kind: ProtectBinarySensorKind,
        state: ProtectState,
    ) -> ProtectBinarySensor<DeviceDataStore> {
        let source = Arc::new(DeviceDataStore::new().with_protect(DeviceId::new("p1"), state));
        ProtectBinarySensor::new(source, DeviceId::new("p1"), kind)
    }

    fn healthy_state() -> ProtectState {
        ProtectState::new()
            .with_name("Hallway Protect")
            .with_self_tests(true, true, true, true, true)
    }

    #[test]
    fn kind_field_names() {
        assert_eq!(ProtectBinarySensorKind::CoStatus.field_name(), "co_status");
        assert_eq!(ProtectBinarySensorKind::Motion.field_name(), "auto_away");
        assert_eq!(
            ProtectBinarySensorKind::LinePower.field_name(),
            "line_power_present"
        );
        assert_eq!(
            ProtectBinarySensorKind::Occupancy.field_name(),
            "home_away_input"
        );
        assert_eq!(ProtectBinarySensorKind::Device.field_name(), "device");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ProtectBinarySensorKind::CoStatus.label(), "CO Status");
        assert_eq!(ProtectBinarySensorKind::SmokeStatus.label(), "Smoke Status");
        assert_eq!(ProtectBinarySensorKind::Motion.label(), "Motion");
        assert_eq!(ProtectBinarySensorKind::LinePower.label(), "Line Power");
        assert_eq!(ProtectBinarySensorKind::Occupancy.label(), "Occupancy");
        assert_eq!(ProtectBinarySensorKind::Health.label(), "Health");
        assert_eq!(ProtectBinarySensorKind::Device.label(), "Device");
    }

    #[test]
    fn kind_device_classes() {
        assert_eq!(
            ProtectBinarySensorKind::CoStatus.device_class(),
            BinarySensorDeviceClass::Gas
        );
        assert_eq!(
            ProtectBinarySensorKind::SmokeStatus.device_class(),
            BinarySensorDeviceClass::Smoke
        );
        assert_eq!(
            ProtectBinarySensorKind::Motion.device_class(),
            BinarySensorDeviceClass::Motion
        );
        assert_eq!(
            ProtectBinarySensorKind::LinePower.device_class(),
            BinarySensorDeviceClass::Power
        );
        assert_eq!(
            ProtectBinarySensorKind::Occupancy.device_class(),
            BinarySensorDeviceClass::Occupancy
        );
        assert_eq!(
            ProtectBinarySensorKind::Health.device_class(),
            BinarySensorDeviceClass::Problem
        );
        assert_eq!(
            ProtectBinarySensorKind::Device.device_class(),
            BinarySensorDeviceClass::Connectivity
        );
    }

    mod alarm_states {
        use super::*;

        #[test]
        fn co_status_is_on_above_zero() {
            let state = ProtectState::new().with_co_status(0);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::CoStatus, state).is_on(),
                Some(false)
            );

            let state = ProtectState::new().with_co_status(2);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::CoStatus, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn smoke_status_is_on_above_zero() {
            let state = ProtectState::new().with_smoke_status(3);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::SmokeStatus, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn missing_status_reads_unknown() {
            let sensor = sensor_for(ProtectBinarySensorKind::CoStatus, ProtectState::new());
            assert_eq!(sensor.is_on(), None);
            assert_eq!(sensor.state_json(), Value::Null);
        }

        #[test]
        fn missing_record_reads_unknown() {
            let source = Arc::new(DeviceDataStore::new());
            let sensor = ProtectBinarySensor::new(
                source,
                DeviceId::new("ghost"),
                ProtectBinarySensorKind::SmokeStatus,
            );
            assert_eq!(sensor.is_on(), None);
        }
    }

    mod presence {
        use super::*;

        #[test]
        fn motion_negates_quiet_flag() {
            let state = ProtectState::new().with_auto_away(true);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Motion, state).is_on(),
                Some(false)
            );

            let state = ProtectState::new().with_auto_away(false);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Motion, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn occupancy_negates_away_flag() {
            let state = ProtectState::new().with_home_away_input(true);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Occupancy, state).is_on(),
                Some(false)
            );
        }

        #[test]
        fn line_power_passes_through() {
            let state = ProtectState::new().with_line_power_present(true);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::LinePower, state).is_on(),
                Some(true)
            );

            let state = ProtectState::new().with_line_power_present(false);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::LinePower, state).is_on(),
                Some(false)
            );
        }
    }

    mod device_presence {
        use super::*;

        #[test]
        fn on_when_serial_present() {
            let state = ProtectState::new().with_serial_number("09AA01AC481605C5");
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Device, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn off_when_serial_missing() {
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Device, ProtectState::new()).is_on(),
                Some(false)
            );
        }
    }

    mod health {
        use super::*;

        #[test]
        fn unknown_before_any_self_test_report() {
            let state = ProtectState::new().with_replace_by_date(
                "2015-01-01T00:00:00".parse().unwrap(),
            );
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Health, state).is_on(),
                None
            );
        }

        #[test]
        fn flags_alone_decide_when_date_missing() {
            let state = healthy_state();
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Health, state).is_on(),
                Some(false)
            );

            let state = ProtectState::new().with_self_tests(true, false, true, true, true);
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Health, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn on_while_replacement_not_due() {
            let state = healthy_state()
                .with_replace_by_date("2101-01-01T00:00:00".parse().unwrap());
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Health, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn off_when_replacement_overdue() {
            let state = healthy_state()
                .with_replace_by_date("2015-01-01T00:00:00".parse().unwrap());
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Health, state).is_on(),
                Some(false)
            );
        }

        #[test]
        fn on_when_any_test_failed_with_date_present() {
            // A failed flag forces the verdict on regardless of the date
            let state = ProtectState::new()
                .with_self_tests(true, true, false, true, true)
                .with_replace_by_date("2015-01-01T00:00:00".parse().unwrap());
            assert_eq!(
                sensor_for(ProtectBinarySensorKind::Health, state).is_on(),
                Some(true)
            );
        }

        #[test]
        fn verdict_flips_at_replace_by_instant() {
            let state = healthy_state()
                .with_replace_by_date("2031-05-17T00:00:00Z".parse().unwrap());
            let sensor = sensor_for(ProtectBinarySensorKind::Health, state);

            let before = "2031-05-16T23:59:59Z".parse::<DateTime<Utc>>().unwrap();
            let after = "2031-05-17T00:00:01Z".parse::<DateTime<Utc>>().unwrap();
            assert_eq!(sensor.is_on_at(before), Some(true));
            assert_eq!(sensor.is_on_at(after), Some(false));
        }
    }

    mod identity {
        use super::*;

        #[test]
        fn name_appends_label() {
            let sensor = sensor_for(ProtectBinarySensorKind::CoStatus, healthy_state());
            assert_eq!(sensor.name().as_deref(), Some("Hallway Protect CO Status"));
        }

        #[test]
        fn unique_id_appends_field_name() {
            let sensor = sensor_for(ProtectBinarySensorKind::CoStatus, healthy_state());
            assert_eq!(sensor.unique_id().as_deref(), Some("Hallway Protect co_status"));
        }

        #[test]
        fn identity_unknown_without_record_name() {
            let sensor = sensor_for(ProtectBinarySensorKind::CoStatus, ProtectState::new());
            assert_eq!(sensor.name(), None);
            assert_eq!(sensor.unique_id(), None);
        }

        #[test]
        fn platform_is_binary_sensor() {
            let sensor = sensor_for(ProtectBinarySensorKind::CoStatus, ProtectState::new());
            assert_eq!(sensor.platform(), "binary_sensor");
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn health_attributes_start_null() {
            let sensor = sensor_for(ProtectBinarySensorKind::Health, healthy_state());
            let attrs = sensor.extra_attributes();
            assert_eq!(attrs.len(), 6);
            assert_eq!(attrs["component_wifi_test_passed"], Value::Null);
            assert_eq!(attrs["last_audio_self_test_end_utc_secs"], Value::Null);
        }

        #[test]
        fn device_attributes_start_null() {
            let sensor = sensor_for(ProtectBinarySensorKind::Device, healthy_state());
            let attrs = sensor.extra_attributes();
            assert_eq!(attrs.len(), 4);
            assert_eq!(attrs["power_source"], Value::Null);
        }

        #[test]
        fn plain_kinds_have_no_attributes() {
            let sensor = sensor_for(ProtectBinarySensorKind::CoStatus, healthy_state());
            assert!(sensor.extra_attributes().is_empty());
        }

        #[tokio::test]
        async fn update_populates_health_attributes() {
            let state = healthy_state().with_last_audio_self_test_end("1705314600");
            let mut sensor = sensor_for(ProtectBinarySensorKind::Health, state);

            sensor.update().await.unwrap();

            let attrs = sensor.extra_attributes();
            assert_eq!(attrs["component_wifi_test_passed"], Value::Bool(true));
            assert_eq!(attrs["component_led_test_passed"], Value::Bool(true));
            assert_eq!(
                attrs["last_audio_self_test_end_utc_secs"],
                Value::from("1705314600")
            );
        }

        #[tokio::test]
        async fn update_populates_device_attributes() {
            let state = ProtectState::new()
                .with_name("Hallway Protect")
                .with_born_on_date("2021-05-17T00:00:00".parse().unwrap())
                .with_replace_by_date("2031-05-17T00:00:00".parse().unwrap())
                .with_serial_number("09AA01AC481605C5")
                .with_wired_or_battery(0);
            let mut sensor = sensor_for(ProtectBinarySensorKind::Device, state);

            sensor.update().await.unwrap();

            let attrs = sensor.extra_attributes();
            assert_eq!(attrs["manufactured_on"], Value::from("2021-05-17 00:00:00"));
            assert_eq!(attrs["replace_by"], Value::from("2031-05-17 00:00:00"));
            assert_eq!(attrs["serial_number"], Value::from("09AA01AC481605C5"));
            assert_eq!(attrs["power_source"], Value::from("Wired"));
        }

        #[tokio::test]
        async fn update_reports_unknown_power_source() {
            let mut sensor = sensor_for(ProtectBinarySensorKind::Device, healthy_state());
            sensor.update().await.unwrap();

            let attrs = sensor.extra_attributes();
            assert_eq!(attrs["power_source"], Value::from("Unknown"));
            assert_eq!(attrs["serial_number"], Value::Null);
        }
    }

    mod platform_setup {
        use super::*;

        #[tokio::test]
        async fn one_entity_per_device_and_kind() {
            let source = Arc::new(
                DeviceDataStore::new()
                    .with_protect(DeviceId::new("p1"), healthy_state())
                    .with_protect(DeviceId::new("p2"), ProtectState::new().with_name("Kitchen")),
            );

            let mut entities = setup_platform(&source);
            assert_eq!(entities.len(), 14);
            assert!(entities.iter().all(|e| e.platform() == "binary_sensor"));

            for entity in &mut entities {
                entity.update().await.unwrap();
            }
        }

        #[test]
        fn no_devices_no_entities() {
            let source = Arc::new(DeviceDataStore::new());
            assert!(setup_platform(&source).is_empty());
        }
    }
}
