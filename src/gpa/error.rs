//! GPA calculator error types.

use thiserror::Error;

use crate::storage::StoreError;

/// Errors raised by the grade scale, GPA calculation and record book.
#[derive(Debug, Error)]
pub enum GpaError {
    /// Grade points outside the 0.0-4.0 range.
    #[error("grade points must be between 0.0 and 4.0, got {0}")]
    PointsOutOfRange(f64),

    /// Empty grade label.
    #[error("grade label cannot be empty")]
    EmptyGrade,

    /// Grade not present in the scale.
    #[error("unknown grade: {grade} (available: {available})")]
    UnknownGrade { grade: String, available: String },

    /// Removing the grade would leave the scale empty.
    #[error("the grade scale must keep at least one grade")]
    EmptyScale,

    /// Credit hours must be positive.
    #[error("credit hours must be greater than 0, got {0}")]
    InvalidCredits(f64),

    /// A calculation needs at least one course.
    #[error("enter at least one course with valid credit hours")]
    NoCourses,

    /// A course could not be parsed from `GRADE:CREDITS`.
    #[error("invalid course '{0}', expected GRADE:CREDITS (e.g. A-:3)")]
    InvalidCourse(String),

    /// No record with the given id.
    #[error("no GPA record with id {0}")]
    RecordNotFound(u32),

    /// Empty record name.
    #[error("record name cannot be empty")]
    EmptyName,

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for GPA operations.
pub type Result<T> = std::result::Result<T, GpaError>;
