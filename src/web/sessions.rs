use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::sync::{
    parse_anchor_duration, parse_detection_timestamp, QueryResult, SyncError, SyncSession,
};
use crate::telemetry::{load_telemetry, TelemetryError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
    #[error("session not found: {0}")]
    NotFound(String),
}

/// Summary of one calibrated session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionEntry {
    pub id: String,
    pub telemetry: String,
    pub records: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Detection clock minus telemetry clock, in milliseconds.
    pub offset_ms: i64,
    pub created: DateTime<Utc>,
}

struct Held {
    entry: SessionEntry,
    session: Arc<SyncSession>,
}

/// In-memory registry of calibrated sessions. Sessions are immutable once
/// created; the lock guards only the map, queries run lock-free on a cloned
/// `Arc`.
pub struct SessionRegistry {
    base: PathBuf,
    sessions: RwLock<HashMap<String, Held>>,
}

impl SessionRegistry {
    pub fn new(base: PathBuf) -> Self {
        Self {
            base,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Load a telemetry file under the base folder, calibrate against the
    /// given correspondence point, and register the resulting session.
    pub fn create(
        &self,
        telemetry: &str,
        anchor: &str,
        detection_time: &str,
    ) -> Result<SessionEntry, RegistryError> {
        let anchor = parse_anchor_duration(anchor)?;
        let detection_time = parse_detection_timestamp(detection_time)?;

        let path = self.base.join(telemetry);
        let series = load_telemetry(&path)?;
        let session = SyncSession::calibrate(series, anchor, detection_time)?;
        let (start, end) = session.span()?;

        let entry = SessionEntry {
            id: uuid::Uuid::new_v4().to_string(),
            telemetry: telemetry.to_string(),
            records: session.series().len(),
            start,
            end,
            offset_ms: session.offset().as_duration().num_milliseconds(),
            created: Utc::now(),
        };

        log::info!(
            "Session {} calibrated over {} records, offset {}",
            entry.id,
            entry.records,
            session.offset()
        );

        let held = Held {
            entry: entry.clone(),
            session: Arc::new(session),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(entry.id.clone(), held);

        Ok(entry)
    }

    pub fn list(&self) -> Vec<SessionEntry> {
        let mut entries: Vec<SessionEntry> = self
            .sessions
            .read()
            .unwrap()
            .values()
            .map(|h| h.entry.clone())
            .collect();
        entries.sort_by_key(|e| e.created);
        entries
    }

    pub fn get(&self, id: &str) -> Result<SessionEntry, RegistryError> {
        self.sessions
            .read()
            .unwrap()
            .get(id)
            .map(|h| h.entry.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<(), RegistryError> {
        self.sessions
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn query(&self, id: &str, detection_time: &str) -> Result<QueryResult, RegistryError> {
        let session = self.session(id)?;
        let detection_time = parse_detection_timestamp(detection_time)?;
        Ok(session.query(detection_time)?)
    }

    /// Clone out the session so the query runs without holding the map lock.
    fn session(&self, id: &str) -> Result<Arc<SyncSession>, RegistryError> {
        self.sessions
            .read()
            .unwrap()
            .get(id)
            .map(|h| h.session.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }
}
