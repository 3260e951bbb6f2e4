//! Session history for the Pomodoro timer.
//!
//! The cycle writes into a [`RecordSink`]: an append-only list of
//! [`SessionRecord`]s that can only be bulk-cleared.
//!
//! - `store`: JSON-file backed sink used by the CLI
//! - `summary`: totals shown alongside the history

pub mod store;
pub mod summary;

pub use store::SessionStore;
pub use summary::RecordSummary;

use crate::storage::StoreError;
use crate::types::SessionRecord;

/// Append-only sink for finished intervals.
pub trait RecordSink: Send {
    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be persisted. The record is
    /// still kept in memory.
    fn append(&mut self, record: SessionRecord) -> Result<(), StoreError>;

    /// Removes every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty history could not be persisted.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// All records, oldest first.
    fn records(&self) -> &[SessionRecord];
}

/// In-memory sink, used for tests and for sessions without persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecords {
    records: Vec<SessionRecord>,
}

impl MemoryRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemoryRecords {
    fn append(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.records.push(record);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }

    fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionKind;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_memory_records_append_and_clear() {
        let now = Local.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap();
        let mut sink = MemoryRecords::new();

        sink.append(SessionRecord::new(SessionKind::Work, now, now, 60, 60, true))
            .unwrap();
        sink.append(SessionRecord::new(SessionKind::Break, now, now, 30, 5, false))
            .unwrap();
        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.records()[1].kind, SessionKind::Break);

        sink.clear().unwrap();
        assert!(sink.records().is_empty());
    }
}
