use std::fs;
use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime};

use crate::telemetry::error::TelemetryError;
use crate::telemetry::record::{southern_hemisphere_latitude, TelemetryRecord};
use crate::telemetry::series::TelemetrySeries;

const DATE_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";
const SUBTITLE_CLOCK_FORMAT: &str = "%H:%M:%S,%3f";

/// Load a telemetry subtitle file into a timestamp-sorted series.
pub fn load_telemetry(path: &Path) -> Result<TelemetrySeries, TelemetryError> {
    let content = fs::read_to_string(path)?;
    let records = parse_telemetry(&content)?;

    log::info!(
        "Loaded {} telemetry records from {}",
        records.len(),
        path.display()
    );

    Ok(TelemetrySeries::from_records(records))
}

/// Extract GPS records from raw subtitle text, in source order.
///
/// An entry is recognized only as a run of four lines: a sequence number, a
/// `HH:MM:SS,mmm --> HH:MM:SS,mmm` range, a `HOME(...)` line ending in an
/// absolute date-time, and a `GPS(lon,lat,alt)` line. Anything else is
/// skipped.
pub fn parse_telemetry(content: &str) -> Result<Vec<TelemetryRecord>, TelemetryError> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    let mut i = 0;

    while i + 4 <= lines.len() {
        match parse_entry(&lines[i..i + 4]) {
            Some(record) => {
                records.push(record);
                i += 4;
            }
            None => i += 1,
        }
    }

    if records.is_empty() {
        return Err(TelemetryError::NoData);
    }

    Ok(records)
}

fn parse_entry(lines: &[&str]) -> Option<TelemetryRecord> {
    if !is_sequence_number(lines[0]) || !is_time_range(lines[1]) {
        return None;
    }

    let timestamp = parse_home_line(lines[2])?;
    let (longitude_deg, latitude_deg, altitude_m) = parse_gps_line(lines[3])?;

    Some(TelemetryRecord {
        timestamp,
        latitude_deg,
        longitude_deg,
        altitude_m,
    })
}

fn is_sequence_number(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

fn is_time_range(line: &str) -> bool {
    match line.split_once("-->") {
        Some((start, end)) => is_subtitle_clock(start.trim()) && is_subtitle_clock(end.trim()),
        None => false,
    }
}

fn is_subtitle_clock(s: &str) -> bool {
    NaiveTime::parse_from_str(s, SUBTITLE_CLOCK_FORMAT).is_ok()
}

/// `HOME(lon,lat) YYYY.MM.DD HH:MM:SS` carries the absolute telemetry clock.
fn parse_home_line(line: &str) -> Option<NaiveDateTime> {
    let rest = line.strip_prefix("HOME(")?;
    let (_, tail) = rest.split_once(')')?;
    NaiveDateTime::parse_from_str(tail.trim(), DATE_TIME_FORMAT).ok()
}

/// `GPS(longitude,latitude,altitude)`; the latitude field arrives unsigned.
fn parse_gps_line(line: &str) -> Option<(f64, f64, i32)> {
    let rest = line.strip_prefix("GPS(")?;
    let (inner, _) = rest.split_once(')')?;

    let mut fields = inner.split(',');
    let longitude: f64 = fields.next()?.trim().parse().ok()?;
    let latitude: f64 = fields.next()?.trim().parse().ok()?;
    let altitude: i32 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() {
        return None;
    }

    Some((longitude, southern_hemisphere_latitude(latitude), altitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    const SAMPLE: &str = "\
1
00:00:00,000 --> 00:00:01,000
HOME(-46.9438,-23.0575) 2025.08.24 17:18:23
GPS(-46.9438,23.0575,15)

2
00:00:01,000 --> 00:00:02,000
HOME(-46.9438,-23.0575) 2025.08.24 17:18:24
GPS(-46.9440,23.0576,16)
";

    #[test]
    fn parses_all_valid_entries() {
        let records = parse_telemetry(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].timestamp,
            NaiveDateTime::parse_from_str("2025.08.24 17:18:23", DATE_TIME_FORMAT).unwrap()
        );
        assert_eq!(records[1].altitude_m, 16);
    }

    #[test]
    fn reintroduces_latitude_sign() {
        let records = parse_telemetry(SAMPLE).unwrap();
        assert_eq!(records[0].latitude_deg, -23.0575);
        assert_eq!(records[0].longitude_deg, -46.9438);
    }

    #[test]
    fn skips_malformed_entries() {
        let text = "\
1
00:00:00,000 --> 00:00:01,000
HOME(-46.9438,-23.0575) 2025.08.24 17:18:23
GPS(not,a,coordinate)

2
00:00:01,000 --> 00:00:02,000
HOME(-46.9438,-23.0575) 2025.08.24 17:18:24
GPS(-46.9440,23.0576,16)
";
        let records = parse_telemetry(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].altitude_m, 16);
    }

    #[test]
    fn ignores_trailing_payload_after_gps_triple() {
        let text = "\
1
00:00:00,000 --> 00:00:01,000
HOME(-46.9438,-23.0575) 2025.08.24 17:18:23
GPS(-46.9438,23.0575,15) BAROMETER:14.8
";
        let records = parse_telemetry(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].altitude_m, 15);
    }

    #[test]
    fn empty_input_is_no_data() {
        assert!(matches!(parse_telemetry(""), Err(TelemetryError::NoData)));
    }

    #[test]
    fn unrecognized_text_is_no_data() {
        let result = parse_telemetry("just some\nprose lines\nwith no telemetry");
        assert!(matches!(result, Err(TelemetryError::NoData)));
    }

    #[test]
    fn loads_file_into_sorted_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.srt");
        std::fs::write(&path, SAMPLE).unwrap();

        let series = load_telemetry(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.first().unwrap().timestamp <= series.last().unwrap().timestamp);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_telemetry(&dir.path().join("absent.srt"));
        match result {
            Err(TelemetryError::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("expected IO error, got {:?}", other),
        }
    }
}
