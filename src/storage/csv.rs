//! Flat CSV export.
//!
//! The export is for other tools. It is never read back.

use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::{
    domain::{Employee, Roster},
    storage::{write_atomically, PersistenceError},
};

const HEADER: &str = "ID,FirstName,LastName,Department,HireDate";

/// A CSV file the roster is exported to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    path: PathBuf,
}

impl CsvExport {
    /// Refers to the file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The file's location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one header row, then one row per employee in store order.
    ///
    /// An empty roster produces a file holding just the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self, roster), fields(path = %self.path.display(), count = roster.len()))]
    pub fn export(&self, roster: &Roster) -> Result<(), PersistenceError> {
        write_atomically(&self.path, render(roster).as_bytes())?;
        tracing::info!("exported employees");
        Ok(())
    }
}

/// Renders the roster as CSV text.
#[must_use]
pub fn render(roster: &Roster) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + roster.len() * 64);
    out.push_str(HEADER);
    out.push('\n');
    for employee in roster {
        out.push_str(&row(employee));
        out.push('\n');
    }
    out
}

fn row(employee: &Employee) -> String {
    format!(
        "{},{},{},{},{}",
        employee.id(),
        quote(employee.first_name()),
        quote(employee.last_name()),
        quote(employee.department()),
        quote(&employee.hire_date().format("%Y-%m-%d").to_string()),
    )
}

fn quote(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    format!("\"{escaped}\"")
}
