//! XSD dateTime with timezone preservation
//!
//! Property values of datatype `xsd:dateTime` keep the original lexical form
//! so a decode → encode round trip reproduces the input byte-for-byte, while
//! comparison uses the normalized UTC instant. `xsd:dateTimeStamp` slots use
//! the same type plus a timezone-required constraint: a value without an
//! explicit offset fails validation there.

use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// XSD dateTime value
///
/// Stores the normalized UTC instant (for comparison), the original timezone
/// offset (None when the input carried no timezone), and the original string
/// (for round-trip serialization).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DateTime {
    instant: ChronoDateTime<Utc>,
    tz_offset_secs: Option<i32>,
    original: String,
}

impl DateTime {
    /// Parse an XSD dateTime string
    ///
    /// Accepts:
    /// - RFC3339/ISO8601 with timezone: `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+05:00`
    /// - Without timezone (treated as UTC for comparison): `2024-01-15T10:30:00`
    /// - With fractional seconds: `2024-01-15T10:30:00.123Z`
    pub fn parse(s: &str) -> Result<Self, String> {
        if let Ok(dt) = ChronoDateTime::parse_from_rfc3339(s) {
            return Ok(Self {
                instant: dt.with_timezone(&Utc),
                tz_offset_secs: Some(dt.offset().local_minus_utc()),
                original: s.to_string(),
            });
        }

        // Offset without a colon, not covered by RFC3339
        for fmt in &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"] {
            if let Ok(dt) = ChronoDateTime::parse_from_str(s, fmt) {
                return Ok(Self {
                    instant: dt.with_timezone(&Utc),
                    tz_offset_secs: Some(dt.offset().local_minus_utc()),
                    original: s.to_string(),
                });
            }
        }

        // No timezone
        for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self {
                    instant: ndt.and_utc(),
                    tz_offset_secs: None,
                    original: s.to_string(),
                });
            }
        }

        Err(format!("Cannot parse dateTime: {}", s))
    }

    /// Build from a UTC instant; the lexical form is RFC3339 with `Z`
    pub fn from_utc(instant: ChronoDateTime<Utc>) -> Self {
        Self {
            instant,
            tz_offset_secs: Some(0),
            original: instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }

    /// Get the normalized UTC instant
    pub fn instant(&self) -> ChronoDateTime<Utc> {
        self.instant
    }

    /// Get the original timezone offset, if the input carried one
    pub fn tz_offset(&self) -> Option<FixedOffset> {
        self.tz_offset_secs.and_then(FixedOffset::east_opt)
    }

    /// True when the input carried an explicit timezone offset
    pub fn has_timezone(&self) -> bool {
        self.tz_offset_secs.is_some()
    }

    /// Get the original string representation
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        // Same instant, regardless of lexical form
        self.instant == other.instant
    }
}

impl Eq for DateTime {}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
