//! Local file storage shared by the toolbox tools.
//!
//! Every tool keeps its data in a single directory:
//! - `pomodoro_records.json`: timer session history
//! - `gpa_records.json` / `gpa_settings.json`: GPA book and grade scale
//! - `expenses.txt` / `budgets.txt`: expense ledger and monthly budgets

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "study-toolbox";

// ============================================================================
// StoreError
// ============================================================================

/// Errors raised while reading or writing tool data files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON file did not contain the expected data.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A line of a flat file could not be parsed.
    #[error("{path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// No data directory could be determined.
    #[error("could not determine a data directory; pass --data-dir")]
    NoDataDir,
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true if the stored data exists but is unreadable as data.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Json { .. } | Self::Malformed { .. })
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// DataDir
// ============================================================================

/// Resolved location of the toolbox data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the data directory.
    ///
    /// An explicit path wins; otherwise the platform data directory is used,
    /// falling back to `~/.study-toolbox`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if neither a data nor a home
    /// directory can be found.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }
        if let Some(data) = dirs::data_dir() {
            return Ok(Self::new(data.join(APP_DIR_NAME)));
        }
        let home = dirs::home_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(home.join(format!(".{APP_DIR_NAME}"))))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_records(&self) -> PathBuf {
        self.root.join("pomodoro_records.json")
    }

    pub fn gpa_records(&self) -> PathBuf {
        self.root.join("gpa_records.json")
    }

    pub fn grade_scale(&self) -> PathBuf {
        self.root.join("gpa_settings.json")
    }

    pub fn expenses(&self) -> PathBuf {
        self.root.join("expenses.txt")
    }

    pub fn budgets(&self) -> PathBuf {
        self.root.join("budgets.txt")
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Reads a JSON file, returning `T::default()` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match read_to_string_opt(path)? {
        Some(contents) => serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(T::default()),
    }
}

/// Writes a value as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let serialized = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_string(path, &serialized)
}

/// Reads a text file, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns an error for any I/O failure other than a missing file.
pub fn read_to_string_opt(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            Ok(None)
        }
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Writes a text file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }
    fs::write(path, contents).map_err(|e| StoreError::io(path, e))?;
    debug!("wrote {}", path.display());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
