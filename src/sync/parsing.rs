use chrono::{Duration, NaiveDateTime};

use crate::sync::error::SyncError;

const DETECTION_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a recording-relative anchor in subtitle clock form
/// (`HH:MM:SS,mmm`), falling back to free-form durations like `4m 40s`.
pub fn parse_anchor_duration(s: &str) -> Result<Duration, SyncError> {
    let s = s.trim();

    if let Some(duration) = parse_subtitle_clock(s) {
        return Ok(duration);
    }

    humantime::parse_duration(s)
        .ok()
        .and_then(|d| Duration::from_std(d).ok())
        .ok_or_else(|| SyncError::AnchorFormat {
            input: s.to_string(),
        })
}

fn parse_subtitle_clock(s: &str) -> Option<Duration> {
    let (clock, millis) = s.split_once(',')?;

    let mut fields = clock.split(':');
    let hours: i64 = fields.next()?.parse().ok()?;
    let minutes: i64 = fields.next()?.parse().ok()?;
    let seconds: i64 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    let millis: i64 = millis.parse().ok()?;

    Some(
        Duration::hours(hours)
            + Duration::minutes(minutes)
            + Duration::seconds(seconds)
            + Duration::milliseconds(millis),
    )
}

/// Parse a detection-clock timestamp (`YYYY-MM-DDTHH:MM:SS[.ffffff]`).
///
/// Both clocks are naive wall-clock frames: a trailing `Z` is tolerated and
/// stripped, numeric UTC offsets are rejected.
pub fn parse_detection_timestamp(s: &str) -> Result<NaiveDateTime, SyncError> {
    let trimmed = s.trim();
    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    NaiveDateTime::parse_from_str(naive, DETECTION_TIMESTAMP_FORMAT).map_err(|_| {
        SyncError::Timestamp {
            input: s.to_string(),
        }
    })
}
