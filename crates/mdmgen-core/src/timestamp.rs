//! Serde adapter for record timestamps.
//!
//! Whole seconds render as `YYYY-MM-DDTHH:MM:SS`; anything finer always
//! carries six fractional digits.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

const WHOLE_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const MICROSECONDS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn format(value: &NaiveDateTime) -> String {
    let pattern = if value.nanosecond() == 0 {
        WHOLE_SECONDS
    } else {
        MICROSECONDS
    };
    value.format(pattern).to_string()
}

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse::<NaiveDateTime>().map_err(serde::de::Error::custom)
}
