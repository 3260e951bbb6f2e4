//! GPA calculator.
//!
//! - `scale`: editable grade-to-points mapping and the GPA calculation
//! - `book`: named records of courses with their last computed GPA

pub mod book;
pub mod error;
pub mod scale;

pub use book::{GpaBook, GpaRecord};
pub use error::GpaError;
pub use scale::{Course, GradeScale};
