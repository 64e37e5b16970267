//! Serde helpers for the backend's loosely typed JSON.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

/// Parses RFC 3339 timestamps or naive ISO timestamps (assumed UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Timestamps that may lack an offset. The backend emits naive UTC datetimes.
pub mod naive_utc {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc, de, parse_timestamp};

    /// Serializes as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    /// Deserializes from RFC 3339 or a naive ISO datetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a recognizable timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// Mood strings in any case. Unknown or null moods become `None`.
pub mod lenient_mood {
    use super::{Deserializer, Serializer, Visitor, de, fmt};
    use crate::domain::entities::Mood;

    /// Serializes the mood in upper case, `null` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &Option<Mood>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(mood) => serializer.serialize_str(&mood.label().to_uppercase()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes a mood without failing on unexpected values.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input is not a string or null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Mood>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MoodVisitor;

        impl<'de> Visitor<'de> for MoodVisitor {
            type Value = Option<Mood>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mood string or null")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.parse().ok())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_option(MoodVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Mood;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(default, with = "lenient_mood")]
        mood: Option<Mood>,
        #[serde(with = "naive_utc")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-01-02T03:04:05").is_some());
        assert!(parse_timestamp("2024-01-02T03:04:05.5").is_some());
        assert!(parse_timestamp("2024-01-02T03:04:05+02:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_missing_mood_defaults_to_none() {
        let w: Wrapper = serde_json::from_str(r#"{"at":"2024-01-02T03:04:05"}"#).unwrap();
        assert!(w.mood.is_none());
    }

    #[test]
    fn test_null_mood_is_none() {
        let w: Wrapper =
            serde_json::from_str(r#"{"mood":null,"at":"2024-01-02T03:04:05"}"#).unwrap();
        assert!(w.mood.is_none());
    }

    #[test]
    fn test_mood_serializes_upper_case() {
        let w = Wrapper {
            mood: Some(Mood::Low),
            at: parse_timestamp("2024-01-02T03:04:05Z").unwrap(),
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["mood"], "LOW");
        assert_eq!(json["at"], "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result = serde_json::from_str::<Wrapper>(r#"{"at":"soon"}"#);
        assert!(result.is_err());
    }
}
