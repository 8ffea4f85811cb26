use chrono::{Duration, NaiveDateTime};

use crate::sync::error::SyncError;
use crate::sync::offset::ClockOffset;
use crate::telemetry::{TelemetryRecord, TelemetrySeries};

/// One loaded and calibrated recording: an immutable series plus the clock
/// offset computed for it. Queries take `&self` and are safe to run
/// concurrently.
#[derive(Debug, Clone)]
pub struct SyncSession {
    series: TelemetrySeries,
    offset: ClockOffset,
}

/// Nearest match for one corrected query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryResult {
    pub record: TelemetryRecord,
    /// The query time translated into the telemetry clock's frame.
    pub corrected: NaiveDateTime,
    /// Signed gap between the matched record and the corrected query time.
    /// Positive means the matched sample is later.
    pub residual: Duration,
}

impl QueryResult {
    /// Residual in milliseconds, for precision reporting.
    pub fn residual_ms(&self) -> f64 {
        self.residual
            .num_microseconds()
            .map(|us| us as f64 / 1000.0)
            .unwrap_or_else(|| self.residual.num_milliseconds() as f64)
    }
}

impl SyncSession {
    pub fn new(series: TelemetrySeries, offset: ClockOffset) -> Result<Self, SyncError> {
        if series.is_empty() {
            return Err(SyncError::EmptyStore);
        }
        Ok(Self { series, offset })
    }

    /// Calibrate against one correspondence point and build the session.
    pub fn calibrate(
        series: TelemetrySeries,
        anchor: Duration,
        detection_time: NaiveDateTime,
    ) -> Result<Self, SyncError> {
        let offset = ClockOffset::compute(&series, anchor, detection_time)?;
        Self::new(series, offset)
    }

    pub fn offset(&self) -> ClockOffset {
        self.offset
    }

    pub fn series(&self) -> &TelemetrySeries {
        &self.series
    }

    /// First and last record timestamps.
    pub fn span(&self) -> Result<(NaiveDateTime, NaiveDateTime), SyncError> {
        match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) => Ok((first.timestamp, last.timestamp)),
            _ => Err(SyncError::EmptyStore),
        }
    }

    /// Nearest record at the corrected time for `detection_time`.
    pub fn query(&self, detection_time: NaiveDateTime) -> Result<QueryResult, SyncError> {
        let corrected = self.offset.corrected(detection_time);
        let record = self
            .series
            .nearest(corrected)
            .ok_or(SyncError::EmptyStore)?;

        Ok(QueryResult {
            record: *record,
            corrected,
            residual: record.timestamp - corrected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(h: u32, m: u32, s: u32, lat: f64, lon: f64, alt: i32) -> TelemetryRecord {
        TelemetryRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 8, 24)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap(),
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_m: alt,
        }
    }

    fn detection(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 24)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn calibrated_session() -> SyncSession {
        let series = TelemetrySeries::from_records(vec![
            record(10, 0, 0, -23.0, -46.9, 100),
            record(10, 0, 10, -23.1, -46.95, 105),
        ]);
        SyncSession::calibrate(series, Duration::seconds(5), detection(10, 0, 7)).unwrap()
    }

    #[test]
    fn query_corrects_and_matches_nearest() {
        let session = calibrated_session();
        assert_eq!(session.offset().as_duration(), Duration::seconds(2));

        let result = session.query(detection(10, 0, 11)).unwrap();
        assert_eq!(result.corrected, detection(10, 0, 9));
        assert_eq!(result.record.timestamp, detection(10, 0, 10));
        assert_eq!(result.record.altitude_m, 105);
        assert_eq!(result.residual_ms(), 1000.0);
    }

    #[test]
    fn residual_is_signed() {
        let session = calibrated_session();

        // Corrects to 10:00:01, so the match at 10:00:00 lies in the past.
        let result = session.query(detection(10, 0, 3)).unwrap();
        assert_eq!(result.record.timestamp, detection(10, 0, 0));
        assert_eq!(result.residual, Duration::seconds(-1));
        assert_eq!(result.residual_ms(), -1000.0);
    }

    #[test]
    fn residual_matches_definition() {
        let session = calibrated_session();
        let result = session.query(detection(10, 0, 11)).unwrap();
        assert_eq!(result.residual, result.record.timestamp - result.corrected);
    }

    #[test]
    fn empty_series_cannot_calibrate() {
        let empty = TelemetrySeries::from_records(Vec::new());
        let result = SyncSession::calibrate(empty, Duration::seconds(5), detection(10, 0, 7));
        assert!(matches!(result, Err(SyncError::InvalidAnchor)));
    }

    #[test]
    fn span_reports_recording_bounds() {
        let session = calibrated_session();
        let (start, end) = session.span().unwrap();
        assert_eq!(start, detection(10, 0, 0));
        assert_eq!(end, detection(10, 0, 10));
    }
}
