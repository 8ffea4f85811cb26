use std::fmt;

use chrono::{Duration, NaiveDateTime};

use crate::sync::error::SyncError;
use crate::telemetry::TelemetrySeries;

/// Constant difference between the detection clock and the telemetry clock
/// (detection minus telemetry), established from one operator-confirmed
/// correspondence point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockOffset(Duration);

impl ClockOffset {
    /// `anchor` is the duration since recording start that the operator
    /// matched against `detection_time` in the detection clock's frame.
    pub fn compute(
        series: &TelemetrySeries,
        anchor: Duration,
        detection_time: NaiveDateTime,
    ) -> Result<Self, SyncError> {
        let start = series.first().ok_or(SyncError::InvalidAnchor)?;
        let series_anchor = start.timestamp + anchor;
        Ok(ClockOffset(detection_time - series_anchor))
    }

    /// Translate a detection-clock timestamp into the telemetry clock's frame.
    pub fn corrected(&self, detection_time: NaiveDateTime) -> NaiveDateTime {
        detection_time - self.0
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.num_milliseconds();
        let sign = if millis < 0 { '-' } else { '+' };
        let abs = millis.abs();
        write!(f, "{}{}.{:03}s", sign, abs / 1000, abs % 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryRecord;
    use chrono::NaiveDate;

    fn series_starting_at(h: u32, m: u32, s: u32) -> TelemetrySeries {
        TelemetrySeries::from_records(vec![TelemetryRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 8, 24)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap(),
            latitude_deg: -23.0,
            longitude_deg: -46.9,
            altitude_m: 100,
        }])
    }

    fn detection(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 24)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn computes_offset_from_anchor_pair() {
        let series = series_starting_at(10, 0, 0);
        let offset =
            ClockOffset::compute(&series, Duration::seconds(5), detection(10, 0, 7)).unwrap();
        assert_eq!(offset.as_duration(), Duration::seconds(2));
    }

    #[test]
    fn offset_round_trips_through_correction() {
        let series = series_starting_at(10, 0, 0);
        let anchor = Duration::seconds(5);
        let sync_point = detection(10, 0, 7);
        let offset = ClockOffset::compute(&series, anchor, sync_point).unwrap();

        assert_eq!(
            offset.corrected(sync_point),
            series.first().unwrap().timestamp + anchor
        );
    }

    #[test]
    fn negative_offset_when_detection_clock_lags() {
        let series = series_starting_at(10, 0, 0);
        let offset =
            ClockOffset::compute(&series, Duration::seconds(5), detection(10, 0, 2)).unwrap();
        assert_eq!(offset.as_duration(), Duration::seconds(-3));
        assert_eq!(offset.to_string(), "-3.000s");
    }

    #[test]
    fn empty_series_is_invalid_anchor() {
        let empty = TelemetrySeries::from_records(Vec::new());
        let result = ClockOffset::compute(&empty, Duration::seconds(5), detection(10, 0, 7));
        assert!(matches!(result, Err(SyncError::InvalidAnchor)));
    }

    #[test]
    fn displays_signed_milliseconds() {
        let series = series_starting_at(10, 0, 0);
        let offset =
            ClockOffset::compute(&series, Duration::milliseconds(4750), detection(10, 0, 7))
                .unwrap();
        assert_eq!(offset.to_string(), "+2.250s");
    }
}
