// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datetime type for Nest device records.
//!
//! The Nest service reports device lifecycle timestamps (manufacture date,
//! replace-by date, last self-test) in more than one shape depending on the
//! endpoint and firmware generation. This module provides a single type that
//! parses all of them.
//!
//! # Supported Formats
//!
//! - ISO 8601 without timezone: `"2031-05-17T10:30:00"`
//! - ISO 8601 with timezone: `"2031-05-17T10:30:00+01:00"`
//! - Space-separated: `"2031-05-17 10:30:00"`
//! - Unix epoch seconds: `"1705318200"`
//! - Unix epoch milliseconds: `"1705318200000"`
//!
//! # Examples
//!
//! ```
//! use nestor_lib::types::NestTimestamp;
//!
//! // Parse ISO 8601 without timezone
//! let ts: NestTimestamp = "2031-05-17T10:30:00".parse().unwrap();
//! assert!(ts.timezone_offset().is_none());
//!
//! // Parse ISO 8601 with timezone
//! let ts: NestTimestamp = "2031-05-17T10:30:00+01:00".parse().unwrap();
//! assert!(ts.timezone_offset().is_some());
//!
//! // Format using chrono's format method
//! println!("Replace by: {}", ts.naive().format("%Y-%m-%d"));
//! ```

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing a datetime string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    input: String,
}

impl DateTimeParseError {
    /// Creates a new parse error for the given input.
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// Returns the input string that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to parse datetime: '{}' (expected ISO 8601 or Unix epoch)",
            self.input
        )
    }
}

impl std::error::Error for DateTimeParseError {}

/// A timestamp parsed from a Nest device record.
///
/// This type provides access to both the naive datetime (without timezone)
/// and the timezone-aware datetime when the timezone is known.
///
/// # Timezone Availability
///
/// The timezone is available in these cases:
/// - The timestamp included a timezone offset (e.g., `+01:00`)
/// - The timestamp was in Unix epoch format (interpreted as UTC)
///
/// When the timestamp is a bare ISO 8601 datetime without timezone,
/// only the naive datetime is available.
///
/// # Expiry Checks
///
/// Protect devices carry a replace-by date; [`NestTimestamp::is_past`]
/// compares against a reference instant for the end-of-life check:
///
/// ```
/// use chrono::Utc;
/// use nestor_lib::types::NestTimestamp;
///
/// let replace_by: NestTimestamp = "2015-01-01T00:00:00".parse().unwrap();
/// assert!(replace_by.is_past(Utc::now()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestTimestamp {
    /// The naive datetime (without timezone).
    naive: NaiveDateTime,
    /// The timezone offset in seconds east of UTC, if known.
    offset_secs: Option<i32>,
}

impl NestTimestamp {
    /// Parses a Nest timestamp string.
    ///
    /// This is a convenience method that returns `Option<Self>`.
    /// For error details, use the `FromStr` implementation instead.
    ///
    /// # Supported Formats
    ///
    /// - `"2031-05-17T10:30:00"` - ISO 8601 without timezone
    /// - `"2031-05-17T10:30:00+01:00"` - ISO 8601 with timezone
    /// - `"2031-05-17T10:30:00Z"` - ISO 8601 with UTC timezone
    /// - `"2031-05-17 10:30:00"` - space-separated, no timezone
    /// - `"1705318200"` - Unix epoch in seconds (UTC)
    /// - `"1705318200000"` - Unix epoch in milliseconds (UTC)
    ///
    /// # Examples
    ///
    /// ```
    /// use nestor_lib::types::NestTimestamp;
    ///
    /// let ts = NestTimestamp::parse("2031-05-17T10:30:00").unwrap();
    /// println!("Naive: {}", ts.naive());
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Parses a Unix epoch timestamp (seconds or milliseconds).
    fn parse_epoch(s: &str) -> Option<Self> {
        let timestamp: i64 = s.parse().ok()?;
        Self::from_epoch(timestamp)
    }

    /// Converts a Unix epoch value (seconds or milliseconds) into a timestamp.
    fn from_epoch(timestamp: i64) -> Option<Self> {
        // Reject negative timestamps (before 1970)
        if timestamp < 0 {
            return None;
        }

        // Distinguish between seconds and milliseconds based on magnitude
        // Seconds: 10 digits (until year 2286)
        // Milliseconds: 13 digits
        let datetime = if timestamp > 9_999_999_999 {
            // Milliseconds
            let secs = timestamp / 1000;
            // Safe: (0..999) * 1_000_000 fits in u32
            let nsecs = u32::try_from((timestamp % 1000) * 1_000_000).ok()?;
            Utc.timestamp_opt(secs, nsecs).single()?
        } else {
            // Seconds
            Utc.timestamp_opt(timestamp, 0).single()?
        };

        Some(Self {
            naive: datetime.naive_utc(),
            offset_secs: Some(0), // UTC
        })
    }

    /// Parses an ISO 8601 datetime with timezone.
    fn parse_iso_with_tz(s: &str) -> Option<Self> {
        let datetime = DateTime::parse_from_rfc3339(s).ok()?;
        Some(Self {
            naive: datetime.naive_local(),
            offset_secs: Some(datetime.offset().local_minus_utc()),
        })
    }

    /// Parses an ISO 8601 datetime without timezone.
    fn parse_iso_naive(s: &str) -> Option<Self> {
        let formats = [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
        ];

        for fmt in &formats {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self {
                    naive,
                    offset_secs: None,
                });
            }
        }

        None
    }

    /// Returns the naive datetime (without timezone information).
    ///
    /// This is always available regardless of whether the original
    /// timestamp included timezone information. Use chrono's `format()`
    /// method for custom formatting.
    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    /// Returns the timezone offset, if known.
    ///
    /// The offset is available when:
    /// - The original timestamp included a timezone offset
    /// - The timestamp was in Unix epoch format (UTC)
    #[must_use]
    pub fn timezone_offset(&self) -> Option<FixedOffset> {
        self.offset_secs.and_then(FixedOffset::east_opt)
    }

    /// Returns the timezone-aware datetime, if the timezone is known.
    ///
    /// # Returns
    ///
    /// Returns `Some(DateTime<FixedOffset>)` if the timezone was known,
    /// `None` if only the naive datetime is available.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.timezone_offset()
            .and_then(|tz| self.naive.and_local_timezone(tz).single())
    }

    /// Returns true if the timezone is known.
    #[must_use]
    pub const fn has_timezone(&self) -> bool {
        self.offset_secs.is_some()
    }

    /// Returns true if this timestamp lies before the given instant.
    ///
    /// Timezone-aware timestamps are compared as instants. Naive timestamps
    /// are compared against the instant's UTC wall clock, matching how the
    /// Nest service reports bare datetimes.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use nestor_lib::types::NestTimestamp;
    ///
    /// let past: NestTimestamp = "2015-01-01 00:00:00".parse().unwrap();
    /// let future: NestTimestamp = "2101-01-01 00:00:00".parse().unwrap();
    ///
    /// assert!(past.is_past(Utc::now()));
    /// assert!(!future.is_past(Utc::now()));
    /// ```
    #[must_use]
    pub fn is_past(&self, instant: DateTime<Utc>) -> bool {
        match self.to_datetime() {
            Some(dt) => dt.with_timezone(&Utc) < instant,
            None => self.naive < instant.naive_utc(),
        }
    }
}

impl FromStr for NestTimestamp {
    type Err = DateTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // Try epoch formats first (all digits)
        if !s.is_empty()
            && s.chars().all(|c| c.is_ascii_digit())
            && let Some(ts) = Self::parse_epoch(s)
        {
            return Ok(ts);
        }

        // Try ISO 8601 with timezone
        if let Some(ts) = Self::parse_iso_with_tz(s) {
            return Ok(ts);
        }

        // Try ISO 8601 without timezone
        Self::parse_iso_naive(s).ok_or_else(|| DateTimeParseError::new(s))
    }
}

impl From<NaiveDateTime> for NestTimestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self {
            naive,
            offset_secs: None,
        }
    }
}

impl From<DateTime<FixedOffset>> for NestTimestamp {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self {
            naive: datetime.naive_local(),
            offset_secs: Some(datetime.offset().local_minus_utc()),
        }
    }
}

impl From<DateTime<Utc>> for NestTimestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self {
            naive: datetime.naive_utc(),
            offset_secs: Some(0),
        }
    }
}

impl std::fmt::Display for NestTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(dt) = self.to_datetime() {
            write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S %:z"))
        } else {
            write!(f, "{}", self.naive.format("%Y-%m-%d %H:%M:%S"))
        }
    }
}

impl Serialize for NestTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Emit a form the deserializer accepts back
        match self.to_datetime() {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => {
                serializer.serialize_str(&self.naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
        }
    }
}

struct NestTimestampVisitor;

impl Visitor<'_> for NestTimestampVisitor {
    type Value = NestTimestamp;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("an ISO 8601 datetime string or a Unix epoch number")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(de::Error::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        NestTimestamp::from_epoch(value)
            .ok_or_else(|| de::Error::custom(format!("epoch timestamp out of range: {value}")))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let value = i64::try_from(value)
            .map_err(|_| de::Error::custom(format!("epoch timestamp out of range: {value}")))?;
        self.visit_i64(value)
    }
}

impl<'de> Deserialize<'de> for NestTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NestTimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_iso_without_timezone() {
        let ts: NestTimestamp = "2031-05-17T10:30:00".parse().unwrap();
        assert_eq!(ts.naive().year(), 2031);
        assert_eq!(ts.naive().month(), 5);
        assert_eq!(ts.naive().day(), 17);
        assert_eq!(ts.naive().hour(), 10);
        assert_eq!(ts.naive().minute(), 30);
        assert!(ts.timezone_offset().is_none());
        assert!(ts.to_datetime().is_none());
    }

    #[test]
    fn parse_iso_with_positive_offset() {
        let ts: NestTimestamp = "2031-05-17T10:30:00+01:00".parse().unwrap();
        assert_eq!(ts.naive().hour(), 10);
        assert!(ts.has_timezone());
        let offset = ts.timezone_offset().unwrap();
        assert_eq!(offset.local_minus_utc(), 3600); // +1 hour
    }

    #[test]
    fn parse_iso_with_utc() {
        let ts: NestTimestamp = "2031-05-17T10:30:00Z".parse().unwrap();
        assert!(ts.has_timezone());
        let offset = ts.timezone_offset().unwrap();
        assert_eq!(offset.local_minus_utc(), 0);
    }

    #[test]
    fn parse_space_separated() {
        let ts: NestTimestamp = "2031-05-17 10:30:00".parse().unwrap();
        assert_eq!(ts.naive().hour(), 10);
        assert!(!ts.has_timezone());
    }

    #[test]
    fn parse_epoch_seconds() {
        // 2024-01-15 10:30:00 UTC
        let ts: NestTimestamp = "1705314600".parse().unwrap();
        assert!(ts.has_timezone());
        assert_eq!(ts.naive().year(), 2024);
        assert_eq!(ts.naive().month(), 1);
        assert_eq!(ts.naive().day(), 15);
    }

    #[test]
    fn parse_epoch_milliseconds() {
        // 2024-01-15 10:30:00.123 UTC
        let ts: NestTimestamp = "1705314600123".parse().unwrap();
        assert!(ts.has_timezone());
        assert_eq!(ts.naive().year(), 2024);
    }

    #[test]
    fn parse_invalid_returns_error() {
        let err = "not a date".parse::<NestTimestamp>().unwrap_err();
        assert_eq!(err.input(), "not a date");
        assert!(err.to_string().contains("failed to parse datetime"));

        assert!("".parse::<NestTimestamp>().is_err());
        assert!("2031-13-45".parse::<NestTimestamp>().is_err());
    }

    #[test]
    fn parse_with_fractional_seconds() {
        let ts: NestTimestamp = "2031-05-17T10:30:00.123".parse().unwrap();
        assert_eq!(ts.naive().hour(), 10);
    }

    #[test]
    fn is_past_naive() {
        let past: NestTimestamp = "2015-01-01 00:00:00".parse().unwrap();
        let future: NestTimestamp = "2101-01-01 00:00:00".parse().unwrap();
        assert!(past.is_past(Utc::now()));
        assert!(!future.is_past(Utc::now()));
    }

    #[test]
    fn is_past_with_timezone() {
        let past: NestTimestamp = "2015-01-01T00:00:00+05:00".parse().unwrap();
        let future: NestTimestamp = "2101-01-01T00:00:00-05:00".parse().unwrap();
        assert!(past.is_past(Utc::now()));
        assert!(!future.is_past(Utc::now()));
    }

    #[test]
    fn is_past_at_reference_instant() {
        let ts: NestTimestamp = "2031-05-17T10:30:00Z".parse().unwrap();
        let before = DateTime::parse_from_rfc3339("2031-05-17T10:29:59Z")
            .unwrap()
            .with_timezone(&Utc);
        let after = DateTime::parse_from_rfc3339("2031-05-17T10:30:01Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(!ts.is_past(before));
        assert!(ts.is_past(after));
    }

    #[test]
    fn display_without_timezone() {
        let ts: NestTimestamp = "2031-05-17T10:30:00".parse().unwrap();
        assert_eq!(format!("{ts}"), "2031-05-17 10:30:00");
    }

    #[test]
    fn display_with_timezone() {
        let ts: NestTimestamp = "2031-05-17T10:30:00+01:00".parse().unwrap();
        assert_eq!(format!("{ts}"), "2031-05-17 10:30:00 +01:00");
    }

    #[test]
    fn from_naive_datetime() {
        let naive =
            NaiveDateTime::parse_from_str("2031-05-17 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let ts = NestTimestamp::from(naive);
        assert!(!ts.has_timezone());
        assert_eq!(ts.naive(), naive);
    }

    #[test]
    fn from_datetime_with_offset() {
        let datetime = DateTime::parse_from_rfc3339("2031-05-17T10:30:00+01:00").unwrap();
        let ts = NestTimestamp::from(datetime);
        assert!(ts.has_timezone());
        assert_eq!(ts.to_datetime(), Some(datetime));
    }

    #[test]
    fn serde_string_round_trip() {
        let ts: NestTimestamp = "2031-05-17T10:30:00+01:00".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: NestTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn serde_naive_round_trip() {
        let ts: NestTimestamp = "2031-05-17 10:30:00".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: NestTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn deserialize_from_epoch_number() {
        let ts: NestTimestamp = serde_json::from_str("1705314600").unwrap();
        assert_eq!(ts.naive().year(), 2024);
        assert!(ts.has_timezone());
    }

    #[test]
    fn deserialize_from_string() {
        let ts: NestTimestamp = serde_json::from_str("\"2031-05-17T10:30:00\"").unwrap();
        assert_eq!(ts.naive().year(), 2031);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<NestTimestamp>("\"eventually\"").is_err());
        assert!(serde_json::from_str::<NestTimestamp>("true").is_err());
    }

    #[test]
    fn parse_convenience_method() {
        assert!(NestTimestamp::parse("2031-05-17T10:30:00").is_some());
        assert!(NestTimestamp::parse("invalid").is_none());
    }

    #[test]
    fn error_display() {
        let err = "bad input".parse::<NestTimestamp>().unwrap_err();
        assert!(err.to_string().contains("bad input"));
        assert!(err.to_string().contains("ISO 8601"));
    }
}
