use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Nanoseconds since the Unix epoch.
///
/// Zero is reserved as the "unknown" marker: log records sometimes carry no
/// timestamp at all, and consumers must treat zero as absent rather than as
/// 1970-01-01T00:00:00Z.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimestampNs(pub u64);

impl TimestampNs {
    pub const UNKNOWN: TimestampNs = TimestampNs(0);

    pub fn is_known(self) -> bool {
        self.0 != 0
    }

    /// Shift back by an elapsed duration in whole milliseconds, saturating
    /// at zero. Used for providers that report only a completion time plus
    /// how long the operation ran.
    pub fn minus_millis(self, elapsed_ms: u64) -> TimestampNs {
        TimestampNs(self.0.saturating_sub(elapsed_ms.saturating_mul(1_000_000)))
    }
}

impl fmt::Display for TimestampNs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an ISO-8601 UTC timestamp (e.g. `2024-11-03T10:15:30.5Z`) into
/// nanoseconds since the epoch.
///
/// The whole-second part is parsed with a fixed format. The fractional part
/// is right-padded with zeros to nine digits (truncated past nine) and
/// appended as-is, so sub-second precision survives without a float
/// round-trip. Empty or unparseable input yields [`TimestampNs::UNKNOWN`].
/// Only the `Z` and `+00:00` zone spellings are recognized; provider logs
/// write UTC exclusively.
pub fn parse_timestamp_ns(raw: &str) -> TimestampNs {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return TimestampNs::UNKNOWN;
    }

    let stripped = trimmed
        .strip_suffix('Z')
        .or_else(|| trimmed.strip_suffix("+00:00"))
        .unwrap_or(trimmed);

    let (whole, frac) = match stripped.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (stripped, ""),
    };

    let Ok(dt) = NaiveDateTime::parse_from_str(whole, "%Y-%m-%dT%H:%M:%S") else {
        return TimestampNs::UNKNOWN;
    };
    let secs = dt.and_utc().timestamp();
    if secs < 0 {
        return TimestampNs::UNKNOWN;
    }

    let mut digits: String = frac
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(9)
        .collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    let frac_ns: u64 = digits.parse().unwrap_or(0);

    TimestampNs(secs as u64 * 1_000_000_000 + frac_ns)
}

/// Normalize an optional timestamp field.
pub fn parse_opt_timestamp_ns(raw: Option<&str>) -> TimestampNs {
    raw.map(parse_timestamp_ns).unwrap_or(TimestampNs::UNKNOWN)
}
