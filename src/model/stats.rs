//! Aggregate run statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Counters and timing for a whole run
///
/// Either copied from a snapshot (and then authoritative) or accumulated by
/// the replay driver while it walks the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub suites: u64,
    #[serde(default)]
    pub tests: u64,
    #[serde(default)]
    pub passes: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub failures: u64,
    #[serde(default = "epoch", with = "timestamp")]
    pub start: DateTime<Utc>,
    #[serde(default = "epoch", with = "timestamp")]
    pub end: DateTime<Utc>,
    /// Wall-clock duration in milliseconds
    #[serde(default)]
    pub duration: u64,
    /// Fields we do not interpret, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Stats {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Stats {
    /// All counters zero, both timestamps at the Unix epoch
    pub fn zeroed() -> Self {
        Self {
            suites: 0,
            tests: 0,
            passes: 0,
            pending: 0,
            failures: 0,
            start: epoch(),
            end: epoch(),
            duration: 0,
            extra: Map::new(),
        }
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Timestamps serialize as ISO-8601 with millisecond precision (`2020-01-02T03:04:05.678Z`)
/// and deserialize from that text, from epoch milliseconds, or from `null`.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(DateTime::<Utc>::UNIX_EPOCH),
            Value::String(s) => parse(&s).map_err(D::Error::custom),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {n}"))),
            other => Err(D::Error::custom(format!("invalid timestamp: {other}"))),
        }
    }

    /// Parse a serialized timestamp
    pub fn parse(s: &str) -> Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("invalid timestamp '{s}': {e}"))
    }
}
