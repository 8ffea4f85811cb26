use chrono::NaiveDateTime;

/// A single GPS sample extracted from the telemetry stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub timestamp: NaiveDateTime,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: i32,
}

/// The recording convention strips the sign from southern-hemisphere
/// latitudes in the GPS line; the stored value must carry it again.
pub fn southern_hemisphere_latitude(magnitude: f64) -> f64 {
    -magnitude.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reintroduces_stripped_sign() {
        assert_eq!(southern_hemisphere_latitude(23.05), -23.05);
    }

    #[test]
    fn keeps_already_signed_latitude_southern() {
        assert_eq!(southern_hemisphere_latitude(-23.05), -23.05);
    }
}
