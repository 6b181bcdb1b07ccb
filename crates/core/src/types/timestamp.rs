//! Backend timestamps.
//!
//! The Java services serialize `LocalDateTime` without an offset
//! (`2025-03-14T09:26:53.589`), while the gateway and a few DTOs emit RFC 3339
//! (`2025-03-14T09:26:53Z`). [`Timestamp`] accepts both and keeps the wall
//! clock value.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse any of the formats the backend emits.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.naive_utc()));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Self(dt));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
    }

    /// Date-only rendering used in tables (`14 Mar 2025`).
    #[must_use]
    pub fn date_label(&self) -> String {
        self.0.format("%-d %b %Y").to_string()
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_date_time() {
        let ts = Timestamp::parse("2025-03-14T09:26:53.589").unwrap();
        assert_eq!(ts.date_label(), "14 Mar 2025");
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = Timestamp::parse("2025-01-02T23:30:00+05:30").unwrap();
        assert_eq!(ts.to_string(), "2025-01-02T18:00:00");
    }

    #[test]
    fn test_parse_date_only() {
        assert!(Timestamp::parse("2024-12-31").is_some());
        assert!(Timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let err = serde_json::from_str::<Timestamp>("\"not a date\"").unwrap_err();
        assert!(err.to_string().contains("unrecognised timestamp"));
    }
}
