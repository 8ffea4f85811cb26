use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid anchor duration: {input}")]
    AnchorFormat { input: String },
    #[error("invalid timestamp: {input}")]
    Timestamp { input: String },
    #[error("cannot anchor an empty series")]
    InvalidAnchor,
    #[error("no records to query")]
    EmptyStore,
}
