// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature sensor device record.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// State record for a Nest Temperature Sensor.
///
/// All fields are optional because values may not be known until the first
/// successful poll.
///
/// # Examples
///
/// ```
/// use nestor_lib::state::TemperatureSensorState;
///
/// let state = TemperatureSensorState::new()
///     .with_name("Bedroom")
///     .with_temperature(21.5)
///     .with_battery_level(84.0);
///
/// assert_eq!(state.temperature, Some(21.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSensorState {
    /// Display name assigned to the device.
    #[serde(default)]
    pub name: Option<String>,

    /// Current temperature reading in degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Battery charge level.
    #[serde(default)]
    pub battery_level: Option<f64>,
}

impl TemperatureSensorState {
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
    /// present field has the wrong type.
    pub fn from_json(payload: &str) -> Result<Self, ParseError> {
        serde_json::from_str(payload).map_err(ParseError::Json)
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the temperature reading.
    #[must_use]
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    /// Sets the battery charge level.
    #[must_use]
    pub fn with_battery_level(mut self, level: f64) -> Self {
        self.battery_level = Some(level);
        self
    }
}
