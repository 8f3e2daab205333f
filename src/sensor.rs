// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value sensor entities for Protect devices and standalone temperature
//! sensors.
//!
//! Protect value sensors pass their record field through untranslated, with
//! one exception: the `health` kind renders the combined self-test verdict
//! as a short status string. Temperature sensors report degrees Celsius and
//! carry the battery level as an extra attribute.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::entity::Entity;
use crate::error::Result;
use crate::source::DeviceDataSource;
use crate::state::{ProtectState, TemperatureSensorState};
use crate::types::{DeviceId, SensorDeviceClass};

/// State reported by the `health` kind when all five self-tests pass.
pub const HEALTH_OK: &str = "OK";

/// State reported by the `health` kind when any self-test fails or has not
/// been reported.
pub const HEALTH_TEST_FAILURE: &str = "Test failure";

/// Unit of measurement for temperature sensors.
pub const TEMPERATURE_UNIT: &str = "°C";

/// The record fields a Protect exposes as value sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectSensorKind {
    /// CO alarm status code.
    CoStatus,
    /// Smoke alarm status code.
    SmokeStatus,
    /// Battery health code.
    BatteryHealthState,
    /// Battery charge level.
    BatteryLevel,
    /// Quiet-period flag.
    AutoAway,
    /// Mains power flag.
    LinePower,
    /// Away flag.
    HomeAwayInput,
    /// Combined self-test verdict, rendered as a status string.
    Health,
}

impl ProtectSensorKind {
    /// All kinds, in platform creation order.
    pub const ALL: [Self; 8] = [
        Self::CoStatus,
        Self::SmokeStatus,
        Self::BatteryHealthState,
        Self::BatteryLevel,
        Self::AutoAway,
        Self::LinePower,
        Self::HomeAwayInput,
        Self::Health,
    ];

    /// Returns the device record field this kind reads.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::CoStatus => "co_status",
            Self::SmokeStatus => "smoke_status",
            Self::BatteryHealthState => "battery_health_state",
            Self::BatteryLevel => "battery_level",
            Self::AutoAway => "auto_away",
            Self::LinePower => "line_power_present",
            Self::HomeAwayInput => "home_away_input",
            Self::Health => "health",
        }
    }

    /// Returns the device class for this kind, where one applies.
    #[must_use]
    pub const fn device_class(&self) -> Option<SensorDeviceClass> {
        match self {
            Self::BatteryLevel => Some(SensorDeviceClass::Battery),
            Self::CoStatus => Some(SensorDeviceClass::CarbonMonoxide),
            _ => None,
        }
    }

    /// Extra attribute keys this kind carries, if any.
    ///
    /// The `health` kind republishes the raw self-test record fields under
    /// their wire names.
    const fn attribute_keys(self) -> &'static [&'static str] {
        match self {
            Self::Health => &[
                "component_wifi_test_passed",
                "component_co_test_passed",
                "component_smoke_test_passed",
                "component_speaker_test_passed",
                "component_led_test_passed",
                "last_audio_self_test_end_utc_secs",
                "device_born_on_date_utc_secs",
                "replace_by_date_utc_secs",
                "serial_number",
                "wired_or_battery",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for ProtectSensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Value sensor entity for one (device, field) pair.
#[derive(Debug)]
pub struct ProtectSensor<S: DeviceDataSource> {
    source: Arc<S>,
    device_id: DeviceId,
    kind: ProtectSensorKind,
    extra_attributes: Map<String, Value>,
}

impl<S: DeviceDataSource> ProtectSensor<S> {
    /// Creates a value sensor for one record field of a device.
    #[must_use]
    pub fn new(source: Arc<S>, device_id: DeviceId, kind: ProtectSensorKind) -> Self {
        let extra_attributes = kind
            .attribute_keys()
            .iter()
            .map(|key| ((*key).to_string(), Value::Null))
            .collect();

        if kind == ProtectSensorKind::Health {
            tracing::debug!(device_id = %device_id, "Created health sensor");
        }

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
    pub const fn kind(&self) -> ProtectSensorKind {
        self.kind
    }

    /// Returns the device class for this sensor, where one applies.
    #[must_use]
    pub const fn device_class(&self) -> Option<SensorDeviceClass> {
        self.kind.device_class()
    }

    /// Returns the sensor value.
    ///
    /// Fields pass through untranslated; a missing field or device record
    /// reads as null. The `health` kind is the exception: it always reports
    /// [`HEALTH_OK`] or [`HEALTH_TEST_FAILURE`], treating missing self-test
    /// flags as failures.
    #[must_use]
    pub fn value(&self) -> Value {
        let state = self.state();

        match self.kind {
            ProtectSensorKind::Health => {
                let passed = state.unwrap_or_default().all_self_tests_passed();
                Value::from(if passed { HEALTH_OK } else { HEALTH_TEST_FAILURE })
            }
            ProtectSensorKind::CoStatus => state
                .and_then(|state| state.co_status)
                .map_or(Value::Null, Value::from),
            ProtectSensorKind::SmokeStatus => state
                .and_then(|state| state.smoke_status)
                .map_or(Value::Null, Value::from),
            ProtectSensorKind::BatteryHealthState => state
                .and_then(|state| state.battery_health_state)
                .map_or(Value::Null, Value::from),
            ProtectSensorKind::BatteryLevel => state
                .and_then(|state| state.battery_level)
                .map_or(Value::Null, Value::from),
            ProtectSensorKind::AutoAway => state
                .and_then(|state| state.auto_away)
                .map_or(Value::Null, Value::from),
            ProtectSensorKind::LinePower => state
                .and_then(|state| state.line_power_present)
                .map_or(Value::Null, Value::from),
            ProtectSensorKind::HomeAwayInput => state
                .and_then(|state| state.home_away_input)
                .map_or(Value::Null, Value::from),
        }
    }

    fn state(&self) -> Option<ProtectState> {
        self.source.protect(&self.device_id)
    }

    /// Computes the attribute map for the current record.
    fn computed_attributes(&self) -> Map<String, Value> {
        let state = self.state().unwrap_or_default();
        let mut attrs = Map::new();

        attrs.insert(
            "component_wifi_test_passed".to_string(),
            state.wifi_test_passed.map_or(Value::Null, Value::from),
        );
        attrs.insert(
            "component_co_test_passed".to_string(),
            state.co_test_passed.map_or(Value::Null, Value::from),
        );
        attrs.insert(
            "component_smoke_test_passed".to_string(),
            state.smoke_test_passed.map_or(Value::Null, Value::from),
        );
        attrs.insert(
            "component_speaker_test_passed".to_string(),
            state.speaker_test_passed.map_or(Value::Null, Value::from),
        );
        attrs.insert(
            "component_led_test_passed".to_string(),
            state.led_test_passed.map_or(Value::Null, Value::from),
        );
        attrs.insert(
            "last_audio_self_test_end_utc_secs".to_string(),
            state
                .last_audio_self_test_end
                .map_or(Value::Null, Value::from),
        );
        attrs.insert(
            "device_born_on_date_utc_secs".to_string(),
            state
                .born_on_date
                .as_ref()
                .map_or(Value::Null, |date| Value::from(date.to_string())),
        );
        attrs.insert(
            "replace_by_date_utc_secs".to_string(),
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
            "wired_or_battery".to_string(),
            state.wired_or_battery.map_or(Value::Null, Value::from),
        );

        attrs
    }
}

#[async_trait]
impl<S: DeviceDataSource> Entity for ProtectSensor<S> {
    /// Display name: `"{device name} {field name}"`.
    fn name(&self) -> Option<String> {
        let name = self.state()?.name?;
        Some(format!("{name} {}", self.kind.field_name()))
    }

    /// Unique ID: `"{device id}_{field name}"`. Available even before the
    /// device record arrives.
    fn unique_id(&self) -> Option<String> {
        Some(format!("{}_{}", self.device_id, self.kind.field_name()))
    }

    fn platform(&self) -> &'static str {
        "sensor"
    }

    fn state_json(&self) -> Value {
        self.value()
    }

    fn extra_attributes(&self) -> Map<String, Value> {
        self.extra_attributes.clone()
    }

    async fn update(&mut self) -> Result<()> {
        self.source.refresh().await?;

        if !self.kind.attribute_keys().is_empty() {
            self.extra_attributes = self.computed_attributes();
            tracing::debug!(device_id = %self.device_id, "Updated health sensor attributes");
        }

        Ok(())
    }
}

/// Temperature sensor entity for one standalone sensor puck.
#[derive(Debug)]
pub struct TemperatureSensor<S: DeviceDataSource> {
    source: Arc<S>,
    device_id: DeviceId,
}

impl<S: DeviceDataSource> TemperatureSensor<S> {
    /// Creates a temperature sensor reading one device record.
    #[must_use]
    pub const fn new(source: Arc<S>, device_id: DeviceId) -> Self {
        Self { source, device_id }
    }

    /// Returns the device this sensor reads.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the current temperature in degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.state()?.temperature
    }

    /// Returns the unit of measurement.
    #[must_use]
    pub const fn unit_of_measurement(&self) -> &'static str {
        TEMPERATURE_UNIT
    }

    /// Returns the device class.
    #[must_use]
    pub const fn device_class(&self) -> SensorDeviceClass {
        SensorDeviceClass::Temperature
    }

    fn state(&self) -> Option<TemperatureSensorState> {
        self.source.temperature_sensor(&self.device_id)
    }
}

#[async_trait]
impl<S: DeviceDataSource> Entity for TemperatureSensor<S> {
    /// Display name: the record's name field.
    fn name(&self) -> Option<String> {
        self.state()?.name
    }

    /// Unique ID: the device ID itself.
    fn unique_id(&self) -> Option<String> {
        Some(self.device_id.to_string())
    }

    fn platform(&self) -> &'static str {
        "sensor"
    }

    fn state_json(&self) -> Value {
        self.temperature().map_or(Value::Null, Value::from)
    }

    /// Battery level, read fresh from the record on every call.
    fn extra_attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert(
            "battery_level".to_string(),
            self.state()
                .and_then(|state| state.battery_level)
                .map_or(Value::Null, Value::from),
        );
        attrs
    }

    async fn update(&mut self) -> Result<()> {
        self.source.refresh().await
    }
}

/// Builds the value sensor entities for every known device.
///
/// Temperature sensors come first, then one Protect sensor per
/// (device, kind) pair in [`ProtectSensorKind::ALL`] order.
pub fn setup_platform<S: DeviceDataSource + 'static>(source: &Arc<S>) -> Vec<Box<dyn Entity>> {
    let mut entities: Vec<Box<dyn Entity>> = Vec::new();

    tracing::info!("Adding temperature sensors");
    for device_id in source.temperature_sensors() {
        tracing::info!(device_id = %device_id, "Adding temperature sensor");
        entities.push(Box::new(TemperatureSensor::new(
            Arc::clone(source),
            device_id,
        )));
    }

    tracing::info!("Adding Protect sensors");
    for device_id in source.protects() {
        tracing::info!(device_id = %device_id, "Adding Protect sensors for device");
        for kind in ProtectSensorKind::ALL {
            entities.push(Box::new(ProtectSensor::new(
                Arc::clone(source),
                device_id.clone(),
                kind,
            )));
        }
    }

    entities
}
