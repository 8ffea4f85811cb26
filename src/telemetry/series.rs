use chrono::NaiveDateTime;

use crate::telemetry::record::TelemetryRecord;

/// Timestamp-ordered, read-only collection of telemetry records.
#[derive(Debug, Clone)]
pub struct TelemetrySeries {
    records: Vec<TelemetryRecord>,
}

impl TelemetrySeries {
    /// Build a series from parsed records, sorting by timestamp. The sort is
    /// stable, so records sharing a timestamp keep their source order.
    pub fn from_records(mut records: Vec<TelemetryRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    pub fn first(&self) -> Option<&TelemetryRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&TelemetryRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with the minimum absolute timestamp distance to `target`.
    /// When two records are equidistant the earlier one wins.
    pub fn nearest(&self, target: NaiveDateTime) -> Option<&TelemetryRecord> {
        let idx = self.records.partition_point(|r| r.timestamp < target);
        let after = self.records.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.records.get(i));

        match (before, after) {
            (Some(b), Some(a)) => {
                if target - b.timestamp <= a.timestamp - target {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(b), None) => Some(b),
            (None, a) => a,
        }
    }
}
