//! Totals derived from the session history.

use chrono::NaiveDate;

use crate::types::SessionRecord;

/// Aggregate view over a set of session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordSummary {
    /// Seconds across every completed interval, work and break alike
    pub total_completed_seconds: u64,
    /// Completed work sessions on the given day
    pub day_work_sessions: usize,
    /// Seconds of completed work on the given day
    pub day_work_seconds: u64,
}

impl RecordSummary {
    /// Summarizes `records` with per-day figures for `day`.
    pub fn compute(records: &[SessionRecord], day: NaiveDate) -> Self {
        let total_completed_seconds = records
            .iter()
            .filter(|r| r.completed)
            .map(|r| u64::from(r.actual_seconds))
            .sum();

        let day_work: Vec<&SessionRecord> = records
            .iter()
            .filter(|r| r.date == day && r.is_completed_work())
            .collect();

        Self {
            total_completed_seconds,
            day_work_sessions: day_work.len(),
            day_work_seconds: day_work.iter().map(|r| u64::from(r.actual_seconds)).sum(),
        }
    }
}

/// Splits seconds into whole (hours, minutes).
pub fn hours_minutes(seconds: u64) -> (u64, u64) {
    (seconds / 3600, (seconds % 3600) / 60)
}
