mod error;
mod parser;
mod record;
mod series;

pub use error::TelemetryError;
pub use parser::{load_telemetry, parse_telemetry};
pub use record::{southern_hemisphere_latitude, TelemetryRecord};
pub use series::TelemetrySeries;
