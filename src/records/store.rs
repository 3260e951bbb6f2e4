//! JSON-file backed session history.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::RecordSink;
use crate::storage::{self, StoreError};
use crate::types::SessionRecord;

/// Session history persisted as a JSON array.
///
/// The whole file is rewritten on every change.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    records: Vec<SessionRecord>,
}

impl SessionStore {
    /// Opens the store, loading existing records if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records: Vec<SessionRecord> = storage::read_json_or_default(&path)?;
        debug!("loaded {} session records from {}", records.len(), path.display());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        storage::write_json(&self.path, &self.records)
    }
}

impl RecordSink for SessionStore {
    fn append(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.records.push(record);
        self.save()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        self.save()
    }

    fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}
