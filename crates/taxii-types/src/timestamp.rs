use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An RFC 3339 instant with nanosecond precision and total ordering.
///
/// TAXII uses timestamps in three distinct roles: object versions (the STIX
/// `modified`/`created` field), `date_added` stamps assigned by the server,
/// and the `added_after` filter bound. All three share the same value type.
///
/// Sub-second digits are preserved on parse and emitted on display, so a
/// stamp that was bumped on the nanosecond axis for monotonicity never
/// collapses into an earlier one when round-tripped through its string form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wrap an existing `chrono` instant.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Parse an RFC 3339 string such as `2016-11-03T12:30:59.000Z`.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| TypeError::InvalidTimestamp {
                value: value.to_string(),
            })
    }

    /// The underlying `chrono` instant.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Nanoseconds since the UNIX epoch.
    ///
    /// Returns 0 for instants outside the representable range (years
    /// ~1677–2262); TAXII content does not carry such dates.
    pub fn as_nanos(&self) -> i64 {
        self.0.timestamp_nanos_opt().unwrap_or(0)
    }

    /// Rebuild a timestamp from an epoch-nanosecond count.
    pub fn from_nanos(nanos: i64) -> Self {
        Self(Utc.timestamp_nanos(nanos))
    }

    /// Returns a timestamp one nanosecond later.
    pub fn next_nano(&self) -> Self {
        Self::from_nanos(self.as_nanos() + 1)
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}
