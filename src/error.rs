// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `NestoR` library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: device record parsing, timestamp handling, and state refresh
//! delegation.

use thiserror::Error;

use crate::types::DateTimeParseError;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when reading
/// Nest device state.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while parsing a device record.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The upstream data source failed to refresh device state.
    #[error("refresh failed: {0}")]
    Refresh(String),

    /// Device was not found in the data source.
    #[error("device not found")]
    DeviceNotFound,
}

/// Errors related to parsing device records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp field could not be parsed.
    #[error("timestamp error: {0}")]
    Timestamp(#[from] DateTimeParseError),
}

impl From<DateTimeParseError> for Error {
    fn from(err: DateTimeParseError) -> Self {
        Self::Parse(ParseError::Timestamp(err))
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
