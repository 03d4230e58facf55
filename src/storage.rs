use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::domain::{RosterError, ValidationError};

/// Write-only CSV export.
pub mod csv;
/// Reloadable JSON persistence.
pub mod json;

pub use csv::CsvExport;
pub use json::JsonFile;

/// Errors raised while saving, loading or exporting a roster.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The data file is not a valid JSON roster.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The data file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The roster could not be serialized.
    #[error("failed to serialize roster: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A stored record failed validation.
    #[error("record {index} is invalid: {source}")]
    Invalid {
        /// Zero-based position of the record in the file.
        index: usize,
        /// Why it was rejected.
        source: ValidationError,
    },

    /// The stored records break a roster invariant (e.g. a repeated id).
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Writes `contents` to `path` without ever exposing a half-written file.
///
/// The data goes to a temporary file in the destination directory, which is
/// then renamed over `path`. If anything fails, the previous file is left
/// intact. Parent directories are created if they don't exist.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PersistenceError> {
    let io_error = |source: io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}
