use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Sub;

use super::SessionError;

/// Absolute capture time in milliseconds since the Unix epoch.
///
/// Radar exports carry ISO-8601 strings, sometimes without a zone suffix;
/// those are read as UTC. Plain numbers are taken as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    pub fn parse(text: &str) -> Result<Self, SessionError> {
        let trimmed = text.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(parsed.timestamp_millis()));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(naive.and_utc().timestamp_millis()));
            }
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| SessionError::Timestamp(trimmed.to_string()))
    }

    pub fn offset(self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Wall-clock label shown next to the scrub control.
    pub fn clock_label(self) -> String {
        match self.to_datetime() {
            Some(datetime) => datetime.format("%H:%M:%S%.3f").to_string(),
            None => "00:00:00".into(),
        }
    }
}

impl Sub for Timestamp {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.0.saturating_sub(rhs.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(
                f,
                "{}",
                datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_datetime() {
            Some(datetime) => {
                serializer.serialize_str(&datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_i64(self.0),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(millis) => Ok(Self(millis)),
            RawTimestamp::Fractional(millis) if millis.is_finite() => Ok(Self(millis.round() as i64)),
            RawTimestamp::Fractional(millis) => Err(serde::de::Error::custom(format!(
                "non-finite timestamp {millis}"
            ))),
            RawTimestamp::Text(text) => Timestamp::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zoned_and_naive_iso_strings() {
        let zoned = Timestamp::parse("2025-03-20T14:20:00.250Z").unwrap();
        let naive = Timestamp::parse("2025-03-20T14:20:00.250").unwrap();
        assert_eq!(zoned, naive);
        assert_eq!(
            Timestamp::parse("2025-03-20 14:20:01").unwrap() - zoned,
            750
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Timestamp::parse("yesterday"),
            Err(SessionError::Timestamp(_))
        ));
    }

    #[test]
    fn deserializes_numbers_as_millis() {
        let stamp: Timestamp = serde_json::from_str("1500").unwrap();
        assert_eq!(stamp.as_millis(), 1500);
        let stamp: Timestamp = serde_json::from_str("\"2025-03-20T14:20:00Z\"").unwrap();
        assert_eq!(stamp.clock_label(), "14:20:00.000");
    }
}
