//! Wall-clock seam.
//!
//! Shift classification and archiving depend on the shop's local time.
//! Services only see this trait, so the server picks the time zone at
//! startup and tests pin the clock to a fixed instant.

use std::sync::RwLock;

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + 'static {
    /// Current time, carrying the offset of the shop's wall clock.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local time zone.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A fixed UTC offset, for servers whose host clock is not the shop's.
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock that only moves when told to. Used for testing.
pub struct FixedClock {
    now: RwLock<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Parse an RFC 3339 instant, e.g. `2025-10-14T21:00:00-05:00`.
    pub fn at(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?))
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse a `+HH:MM` / `-HH:MM` offset string.
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
