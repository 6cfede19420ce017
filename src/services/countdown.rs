//! # services::countdown
//!
//! Trial countdown: whole seconds left until a fixed instant, shown as
//! `HH:MM:SS`. Hours are not wrapped at 24.

use chrono::{DateTime, FixedOffset, Utc};

/// Parse an RFC 3339 target such as `2026-02-27T00:30:00+08:00`.
pub fn parse_target(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}

/// Whole seconds until `target`, never negative.
pub fn remaining(target: DateTime<FixedOffset>, now: DateTime<Utc>) -> u64 {
    let millis = target.with_timezone(&Utc).signed_duration_since(now).num_milliseconds();
    (millis.max(0) / 1000) as u64
}

pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
