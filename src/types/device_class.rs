// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device class vocabularies for exposed entities.
//!
//! Home-automation frameworks use device classes to pick icons, display
//! units, and state wording for a sensor. The variants here cover the
//! classes Nest Protect and temperature devices map to; the serialized
//! form is the framework's snake_case wire name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device class for binary sensors.
///
/// # Examples
///
/// ```
/// use nestor_lib::types::BinarySensorDeviceClass;
///
/// assert_eq!(BinarySensorDeviceClass::Smoke.as_str(), "smoke");
/// assert_eq!(BinarySensorDeviceClass::Connectivity.to_string(), "connectivity");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinarySensorDeviceClass {
    /// Device reachability.
    Connectivity,
    /// Gas detection (used for CO alarm state).
    Gas,
    /// Motion detection.
    Motion,
    /// Room occupancy.
    Occupancy,
    /// Mains power presence.
    Power,
    /// Generic problem indication.
    Problem,
    /// Smoke detection.
    Smoke,
}

impl BinarySensorDeviceClass {
    /// Returns the framework wire name for this class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Gas => "gas",
            Self::Motion => "motion",
            Self::Occupancy => "occupancy",
            Self::Power => "power",
            Self::Problem => "problem",
            Self::Smoke => "smoke",
        }
    }
}

impl fmt::Display for BinarySensorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Device class for value sensors.
///
/// # Examples
///
/// ```
/// use nestor_lib::types::SensorDeviceClass;
///
/// assert_eq!(SensorDeviceClass::CarbonMonoxide.as_str(), "carbon_monoxide");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorDeviceClass {
    /// Battery charge percentage.
    Battery,
    /// Carbon monoxide reading.
    CarbonMonoxide,
    /// Temperature reading.
    Temperature,
}

impl SensorDeviceClass {
    /// Returns the framework wire name for this class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::CarbonMonoxide => "carbon_monoxide",
            Self::Temperature => "temperature",
        }
    }
}

impl fmt::Display for SensorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_wire_names() {
        assert_eq!(BinarySensorDeviceClass::Connectivity.as_str(), "connectivity");
        assert_eq!(BinarySensorDeviceClass::Gas.as_str(), "gas");
        assert_eq!(BinarySensorDeviceClass::Motion.as_str(), "motion");
        assert_eq!(BinarySensorDeviceClass::Occupancy.as_str(), "occupancy");
        assert_eq!(BinarySensorDeviceClass::Power.as_str(), "power");
        assert_eq!(BinarySensorDeviceClass::Problem.as_str(), "problem");
        assert_eq!(BinarySensorDeviceClass::Smoke.as_str(), "smoke");
    }

    #[test]
    fn sensor_wire_names() {
        assert_eq!(SensorDeviceClass::Battery.as_str(), "battery");
        assert_eq!(SensorDeviceClass::CarbonMonoxide.as_str(), "carbon_monoxide");
        assert_eq!(SensorDeviceClass::Temperature.as_str(), "temperature");
    }

    #[test]
    fn serde_matches_as_str() {
        let json = serde_json::to_string(&BinarySensorDeviceClass::Connectivity).unwrap();
        assert_eq!(json, "\"connectivity\"");

        let json = serde_json::to_string(&SensorDeviceClass::CarbonMonoxide).unwrap();
        assert_eq!(json, "\"carbon_monoxide\"");

        let back: SensorDeviceClass = serde_json::from_str("\"temperature\"").unwrap();
        assert_eq!(back, SensorDeviceClass::Temperature);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            BinarySensorDeviceClass::Smoke.to_string(),
            BinarySensorDeviceClass::Smoke.as_str()
        );
        assert_eq!(
            SensorDeviceClass::Battery.to_string(),
            SensorDeviceClass::Battery.as_str()
        );
    }
}
