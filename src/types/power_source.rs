// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power source classification for Protect devices.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a Protect device is powered.
///
/// The Nest service reports this as a numeric code on the device record
/// (`wired_or_battery`): `0` for mains-wired units, `1` for battery units.
/// Any other code, or a missing field, maps to [`PowerSource::Unknown`].
///
/// # Examples
///
/// ```
/// use nestor_lib::types::PowerSource;
///
/// assert_eq!(PowerSource::from_code(0), PowerSource::Wired);
/// assert_eq!(PowerSource::from_code(1), PowerSource::Battery);
/// assert_eq!(PowerSource::from_code(42), PowerSource::Unknown);
///
/// assert_eq!(PowerSource::Battery.to_string(), "Battery Operated");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerSource {
    /// Mains-wired unit.
    Wired,
    /// Battery-powered unit.
    Battery,
    /// Power source not reported or not recognized.
    #[default]
    Unknown,
}

impl PowerSource {
    /// Maps the service's `wired_or_battery` code to a power source.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Wired,
            1 => Self::Battery,
            _ => Self::Unknown,
        }
    }

    /// Returns the human-readable label for this power source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wired => "Wired",
            Self::Battery => "Battery Operated",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
