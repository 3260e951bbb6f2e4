//! Persisted collection of named GPA records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{GpaError, Result};
use super::scale::{Course, GradeScale};
use crate::storage;

/// A named set of courses and the GPA last computed for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpaRecord {
    pub name: String,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub gpa: f64,
}

impl GpaRecord {
    /// Total credit hours across the record's courses.
    pub fn total_credits(&self) -> f64 {
        self.courses.iter().map(|c| c.credits).sum()
    }
}

/// GPA records keyed by a positive id, persisted as a JSON object.
#[derive(Debug)]
pub struct GpaBook {
    path: PathBuf,
    records: BTreeMap<u32, GpaRecord>,
}

impl GpaBook {
    /// Opens the book, loading existing records if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records: BTreeMap<u32, GpaRecord> = storage::read_json_or_default(&path)?;
        debug!("loaded {} GPA records from {}", records.len(), path.display());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty record and returns its id.
    ///
    /// Ids continue from the highest existing id; the default name is
    /// `Record <id>`.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name or if saving fails.
    pub fn create(&mut self, name: Option<&str>) -> Result<u32> {
        let id = self.records.keys().next_back().map_or(1, |last| last + 1);
        let name = match name {
            Some(name) => validate_name(name)?,
            None => format!("Record {id}"),
        };
        self.records.insert(
            id,
            GpaRecord {
                name,
                courses: Vec::new(),
                gpa: 0.0,
            },
        );
        self.save()?;
        info!(id, "GPA record created");
        Ok(id)
    }

    /// Renames a record.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id, a blank name or if saving fails.
    pub fn rename(&mut self, id: u32, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        self.get_mut(id)?.name = name;
        self.save()
    }

    /// Deletes a record, returning it.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id or if saving fails.
    pub fn delete(&mut self, id: u32) -> Result<GpaRecord> {
        let removed = self
            .records
            .remove(&id)
            .ok_or(GpaError::RecordNotFound(id))?;
        self.save()?;
        Ok(removed)
    }

    /// Replaces a record's courses and stores the recomputed GPA.
    ///
    /// Nothing is changed if the courses do not validate against `scale`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id, invalid courses or if saving fails.
    pub fn update_courses(&mut self, id: u32, courses: Vec<Course>, scale: &GradeScale) -> Result<f64> {
        if !self.records.contains_key(&id) {
            return Err(GpaError::RecordNotFound(id));
        }
        let gpa = scale.calculate(&courses)?;

        let record = self.get_mut(id)?;
        record.courses = courses;
        record.gpa = gpa;
        self.save()?;
        Ok(gpa)
    }

    /// Looks up a record.
    ///
    /// # Errors
    ///
    /// Returns `GpaError::RecordNotFound` for an unknown id.
    pub fn get(&self, id: u32) -> Result<&GpaRecord> {
        self.records.get(&id).ok_or(GpaError::RecordNotFound(id))
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut GpaRecord> {
        self.records.get_mut(&id).ok_or(GpaError::RecordNotFound(id))
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &GpaRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn save(&self) -> Result<()> {
        storage::write_json(&self.path, &self.records)?;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GpaError::EmptyName);
    }
    Ok(name.to_string())
}
