// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protect device record.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{NestTimestamp, PowerSource};

/// State record for a Nest Protect smoke and CO alarm.
///
/// This struct mirrors the device record the Nest service reports for a
/// Protect. All fields are optional because values may not be known until
/// the first successful poll; consumers must treat a missing field as
/// "unknown", never as an error.
///
/// Field names on the wire are preserved through serde renames, so records
/// round-trip against the service's JSON shape.
///
/// # Examples
///
/// ```
/// use nestor_lib::state::ProtectState;
///
/// let json = r#"{"name":"Hallway Protect","co_status":0,"smoke_status":0}"#;
/// let state = ProtectState::from_json(json).unwrap();
/// assert_eq!(state.name.as_deref(), Some("Hallway Protect"));
/// assert_eq!(state.co_status, Some(0));
/// assert_eq!(state.battery_level, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectState {
    /// Display name assigned to the device.
    #[serde(default)]
    pub name: Option<String>,

    /// CO alarm status code (0 = clear, higher values indicate an event).
    #[serde(default)]
    pub co_status: Option<i64>,

    /// Smoke alarm status code (0 = clear, higher values indicate an event).
    #[serde(default)]
    pub smoke_status: Option<i64>,

    /// Heat status code. Reported by the service but not mapped to an
    /// entity; carried for completeness.
    #[serde(default)]
    pub heat_status: Option<i64>,

    /// Battery health code.
    #[serde(default)]
    pub battery_health_state: Option<i64>,

    /// Battery charge level.
    #[serde(default)]
    pub battery_level: Option<f64>,

    /// Whether the device considers its surroundings quiet (no motion).
    #[serde(default)]
    pub auto_away: Option<bool>,

    /// Whether mains power is present.
    #[serde(default)]
    pub line_power_present: Option<bool>,

    /// Whether the structure is set to away.
    #[serde(default)]
    pub home_away_input: Option<bool>,

    /// Wifi self-test result.
    #[serde(rename = "component_wifi_test_passed", default)]
    pub wifi_test_passed: Option<bool>,

    /// CO sensor self-test result.
    #[serde(rename = "component_co_test_passed", default)]
    pub co_test_passed: Option<bool>,

    /// Smoke sensor self-test result.
    #[serde(rename = "component_smoke_test_passed", default)]
    pub smoke_test_passed: Option<bool>,

    /// Speaker self-test result.
    #[serde(rename = "component_speaker_test_passed", default)]
    pub speaker_test_passed: Option<bool>,

    /// LED self-test result.
    #[serde(rename = "component_led_test_passed", default)]
    pub led_test_passed: Option<bool>,

    /// When the last audio self-test finished, as reported by the service.
    #[serde(rename = "last_audio_self_test_end_utc_secs", default)]
    pub last_audio_self_test_end: Option<String>,

    /// Manufacture date.
    #[serde(rename = "device_born_on_date_utc_secs", default)]
    pub born_on_date: Option<NestTimestamp>,

    /// Manufacturer-recommended replacement date.
    #[serde(rename = "replace_by_date_utc_secs", default)]
    pub replace_by_date: Option<NestTimestamp>,

    /// Device serial number.
    #[serde(default)]
    pub serial_number: Option<String>,

    /// Power source code (0 = wired, 1 = battery).
    #[serde(default)]
    pub wired_or_battery: Option<i64>,
}

impl ProtectState {
    /// Creates a new empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a record from the service's JSON shape.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the payload is not valid JSON or a
    /// present field has the wrong type (including malformed timestamps).
    pub fn from_json(payload: &str) -> Result<Self, ParseError> {
        serde_json::from_str(payload).map_err(ParseError::Json)
    }

    /// Returns true if all five self-test components passed.
    ///
    /// A missing flag counts as a failure, matching how the service's
    /// half-populated records behave before the first full poll.
    #[must_use]
    pub fn all_self_tests_passed(&self) -> bool {
        self.wifi_test_passed.unwrap_or(false)
            && self.co_test_passed.unwrap_or(false)
            && self.smoke_test_passed.unwrap_or(false)
            && self.speaker_test_passed.unwrap_or(false)
            && self.led_test_passed.unwrap_or(false)
    }

    /// Returns the power source derived from the `wired_or_battery` code.
    #[must_use]
    pub fn power_source(&self) -> PowerSource {
        self.wired_or_battery
            .map_or(PowerSource::Unknown, PowerSource::from_code)
    }

    // ========== Builder setters ==========

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the CO status code.
    #[must_use]
    pub fn with_co_status(mut self, code: i64) -> Self {
        self.co_status = Some(code);
        self
    }

    /// Sets the smoke status code.
    #[must_use]
    pub fn with_smoke_status(mut self, code: i64) -> Self {
        self.smoke_status = Some(code);
        self
    }

    /// Sets the heat status code.
    #[must_use]
    pub fn with_heat_status(mut self, code: i64) -> Self {
        self.heat_status = Some(code);
        self
    }

    /// Sets the battery health code.
    #[must_use]
    pub fn with_battery_health_state(mut self, code: i64) -> Self {
        self.battery_health_state = Some(code);
        self
    }

    /// Sets the battery charge level.
    #[must_use]
    pub fn with_battery_level(mut self, level: f64) -> Self {
        self.battery_level = Some(level);
        self
    }

    /// Sets the auto-away flag.
    #[must_use]
    pub fn with_auto_away(mut self, quiet: bool) -> Self {
        self.auto_away = Some(quiet);
        self
    }

    /// Sets the line power flag.
    #[must_use]
    pub fn with_line_power_present(mut self, present: bool) -> Self {
        self.line_power_present = Some(present);
        self
    }

    /// Sets the home/away flag.
    #[must_use]
    pub fn with_home_away_input(mut self, away: bool) -> Self {
        self.home_away_input = Some(away);
        self
    }

    /// Sets all five self-test flags at once.
    #[must_use]
    pub fn with_self_tests(
        mut self,
        wifi: bool,
        co: bool,
        smoke: bool,
        speaker: bool,
        led: bool,
    ) -> Self {
        self.wifi_test_passed = Some(wifi);
        self.co_test_passed = Some(co);
        self.smoke_test_passed = Some(smoke);
        self.speaker_test_passed = Some(speaker);
        self.led_test_passed = Some(led);
        self
    }

    /// Sets the last audio self-test timestamp.
    #[must_use]
    pub fn with_last_audio_self_test_end(mut self, when: impl Into<String>) -> Self {
        self.last_audio_self_test_end = Some(when.into());
        self
    }

    /// Sets the manufacture date.
    #[must_use]
    pub fn with_born_on_date(mut self, date: NestTimestamp) -> Self {
        self.born_on_date = Some(date);
        self
    }

    /// Sets the replacement date.
    #[must_use]
    pub fn with_replace_by_date(mut self, date: NestTimestamp) -> Self {
        self.replace_by_date = Some(date);
        self
    }

    /// Sets the serial number.
    #[must_use]
    pub fn with_serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    /// Sets the power source code.
    #[must_use]
    pub fn with_wired_or_battery(mut self, code: i64) -> Self {
        self.wired_or_battery = Some(code);
        self
    }
}
