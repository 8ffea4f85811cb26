mod error;
mod offset;
mod parsing;
mod session;

pub use error::SyncError;
pub use offset::ClockOffset;
pub use parsing::{parse_anchor_duration, parse_detection_timestamp};
pub use session::{QueryResult, SyncSession};
