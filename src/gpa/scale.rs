//! Grade scale and GPA calculation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{GpaError, Result};
use crate::storage;

/// Highest grade point value accepted by the scale.
pub const MAX_POINTS: f64 = 4.0;

const DEFAULT_SCALE: [(&str, f64); 11] = [
    ("A+", 4.0),
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D", 1.0),
    ("F", 0.0),
];

fn normalize(grade: &str) -> String {
    grade.trim().to_uppercase()
}

// ============================================================================
// Course
// ============================================================================

/// One course: a grade and its credit hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub grade: String,
    pub credits: f64,
}

impl Course {
    /// Creates a course, normalizing the grade label.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty grade or non-positive credits.
    pub fn new(grade: &str, credits: f64) -> Result<Self> {
        let grade = normalize(grade);
        if grade.is_empty() {
            return Err(GpaError::EmptyGrade);
        }
        if !credits.is_finite() || credits <= 0.0 {
            return Err(GpaError::InvalidCredits(credits));
        }
        Ok(Self { grade, credits })
    }
}

impl FromStr for Course {
    type Err = GpaError;

    /// Parses `GRADE:CREDITS`, e.g. `A-:3` or `b+:1.5`.
    fn from_str(s: &str) -> Result<Self> {
        let (grade, credits) = s
            .rsplit_once(':')
            .ok_or_else(|| GpaError::InvalidCourse(s.to_string()))?;
        let credits: f64 = credits
            .trim()
            .parse()
            .map_err(|_| GpaError::InvalidCourse(s.to_string()))?;
        Course::new(grade, credits)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.grade, self.credits)
    }
}

// ============================================================================
// GradeScale
// ============================================================================

/// Mapping from grade label to grade points. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeScale {
    grades: BTreeMap<String, f64>,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            grades: DEFAULT_SCALE
                .iter()
                .map(|(grade, points)| ((*grade).to_string(), *points))
                .collect(),
        }
    }
}

impl GradeScale {
    /// Loads the scale, falling back to the default when none is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is unreadable.
    pub fn load(path: &Path) -> Result<Self> {
        let scale: Self = storage::read_json_or_default(path)?;
        if scale.grades.is_empty() {
            debug!("saved grade scale is empty, using default");
            return Ok(Self::default());
        }
        Ok(scale)
    }

    /// Persists the scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        storage::write_json(path, self)?;
        Ok(())
    }

    /// Points for a grade, if the scale knows it.
    pub fn points(&self, grade: &str) -> Option<f64> {
        self.grades.get(&normalize(grade)).copied()
    }

    /// Adds or updates a grade.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty label or points outside 0.0-4.0.
    pub fn set(&mut self, grade: &str, points: f64) -> Result<()> {
        let grade = normalize(grade);
        if grade.is_empty() {
            return Err(GpaError::EmptyGrade);
        }
        if !(0.0..=MAX_POINTS).contains(&points) {
            return Err(GpaError::PointsOutOfRange(points));
        }
        self.grades.insert(grade, points);
        Ok(())
    }

    /// Removes a grade, returning its points.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown grade or if it is the last one.
    pub fn remove(&mut self, grade: &str) -> Result<f64> {
        let key = normalize(grade);
        if !self.grades.contains_key(&key) {
            return Err(self.unknown(&key));
        }
        if self.grades.len() == 1 {
            return Err(GpaError::EmptyScale);
        }
        Ok(self.grades.remove(&key).unwrap_or_default())
    }

    /// Restores the default scale.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Grades ordered by points, highest first.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut grades: Vec<(&str, f64)> = self
            .grades
            .iter()
            .map(|(grade, points)| (grade.as_str(), *points))
            .collect();
        grades.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        grades
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Credit-weighted mean of grade points.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown grade, non-positive credits or when
    /// there are no courses.
    pub fn calculate(&self, courses: &[Course]) -> Result<f64> {
        let mut total_points = 0.0;
        let mut total_credits = 0.0;

        for course in courses {
            let points = self
                .points(&course.grade)
                .ok_or_else(|| self.unknown(&course.grade))?;
            if !course.credits.is_finite() || course.credits <= 0.0 {
                return Err(GpaError::InvalidCredits(course.credits));
            }
            total_points += points * course.credits;
            total_credits += course.credits;
        }

        if total_credits == 0.0 {
            return Err(GpaError::NoCourses);
        }
        Ok(total_points / total_credits)
    }

    fn unknown(&self, grade: &str) -> GpaError {
        let available = self
            .sorted()
            .iter()
            .map(|(g, _)| *g)
            .collect::<Vec<_>>()
            .join(", ");
        GpaError::UnknownGrade {
            grade: grade.to_string(),
            available,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
