//! Work-shift tags.
//!
//! 1st shift runs roughly 6:30am to 3:30pm, 2nd shift covers the rest of the
//! day including the overnight hours.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// First hour (inclusive) of 1st shift.
pub const FIRST_SHIFT_START: u32 = 6;
/// First hour of 2nd shift.
pub const SECOND_SHIFT_START: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shift {
    First,
    Second,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown shift '{0}' (expected 1st or 2nd)")]
pub struct UnknownShift(pub String);

impl Shift {
    /// Shift owning a local wall-clock hour (0-23).
    pub fn for_hour(hour: u32) -> Self {
        if (FIRST_SHIFT_START..SECOND_SHIFT_START).contains(&hour) {
            Shift::First
        } else {
            Shift::Second
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::First => "1st",
            Shift::Second => "2nd",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = UnknownShift;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1st" | "first" | "1" => Ok(Shift::First),
            "2nd" | "second" | "2" => Ok(Shift::Second),
            _ => Err(UnknownShift(s.to_string())),
        }
    }
}

impl Serialize for Shift {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Shift {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
