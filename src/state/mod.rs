// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state records.
//!
//! These structs mirror the per-device records the Nest service reports:
//! a mapping of field names to raw values, with every field optional until
//! the first successful poll fills it in. Sensor adapters only read these
//! records; mutation is the owning data source's job.
//!
//! # Examples
//!
//! ```
//! use nestor_lib::state::ProtectState;
//!
//! let state = ProtectState::new()
//!     .with_name("Hallway Protect")
//!     .with_co_status(0)
//!     .with_smoke_status(0);
//!
//! assert_eq!(state.co_status, Some(0));
//! assert_eq!(state.battery_level, None);
//! ```

mod protect;
mod temperature;

pub use protect::ProtectState;
pub use temperature::TemperatureSensorState;
