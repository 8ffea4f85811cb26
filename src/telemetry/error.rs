use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no telemetry entries found in source")]
    NoData,
}
