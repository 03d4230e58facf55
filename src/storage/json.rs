//! The reloadable roster file.
//!
//! The file is a pretty-printed JSON array of objects:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "firstName": "Ada",
//!     "lastName": "Lovelace",
//!     "department": "Engineering",
//!     "hireDate": "2020-01-15"
//!   }
//! ]
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    domain::{Employee, Roster, ValidationError},
    storage::{write_atomically, PersistenceError},
};

/// An employee as stored on disk.
///
/// Fields are unvalidated until converted back into an [`Employee`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonEmployee {
    id: i64,
    first_name: String,
    last_name: String,
    department: String,
    #[serde(
        serialize_with = "date_as_string",
        deserialize_with = "date_from_string"
    )]
    hire_date: NaiveDate,
}

impl From<&Employee> for JsonEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id().get(),
            first_name: employee.first_name().to_string(),
            last_name: employee.last_name().to_string(),
            department: employee.department().to_string(),
            hire_date: employee.hire_date(),
        }
    }
}

impl JsonEmployee {
    fn into_employee(self, today: NaiveDate) -> Result<Employee, ValidationError> {
        Employee::new_as_of(
            self.id,
            &self.first_name,
            &self.last_name,
            &self.department,
            self.hire_date,
            today,
        )
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by `serialize_with`
fn date_as_string<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

/// Accepts `YYYY-MM-DD`, plus the timestamp forms older files used
/// (`YYYY-MM-DDTHH:MM:SS[.fff]`, optionally with an offset). Only the
/// calendar date is kept.
fn date_from_string<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid date '{s}': expected YYYY-MM-DD"))
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// The JSON file a roster is saved to and loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Refers to the file at `path`. Nothing is read yet.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The file's location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the roster, validating hire dates against today's local date.
    ///
    /// # Errors
    ///
    /// See [`JsonFile::load_as_of`].
    pub fn load(&self) -> Result<Roster, PersistenceError> {
        self.load_as_of(Local::now().date_naive())
    }

    /// Loads the roster, validating hire dates against `today`.
    ///
    /// A missing file yields an empty roster. Every record is re-validated,
    /// and the department suggestions are rebuilt from the loaded records.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the file exists but cannot be read
    /// - the file is not a JSON array of employee objects
    /// - any record fails validation
    /// - two records share an id
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load_as_of(&self, today: NaiveDate) -> Result<Roster, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("no data file found, starting with an empty roster");
                return Ok(Roster::new());
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let roster = self.parse(&content, today)?;
        tracing::info!(count = roster.len(), "loaded employees");
        Ok(roster)
    }

    fn parse(&self, content: &str, today: NaiveDate) -> Result<Roster, PersistenceError> {
        let records: Vec<JsonEmployee> =
            serde_json::from_str(content).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let employees = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .into_employee(today)
                    .map_err(|source| PersistenceError::Invalid { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Roster::from_employees(employees)?)
    }

    /// Saves every employee in store order, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be serialized or the file cannot
    /// be written. A failed save leaves any previous file untouched.
    #[instrument(skip(self, roster), fields(path = %self.path.display(), count = roster.len()))]
    pub fn save(&self, roster: &Roster) -> Result<(), PersistenceError> {
        let content = render(roster)?;
        write_atomically(&self.path, content.as_bytes())?;
        tracing::info!("saved employees");
        Ok(())
    }
}

fn render(roster: &Roster) -> Result<String, PersistenceError> {
    let records: Vec<JsonEmployee> = roster.iter().map(JsonEmployee::from).collect();
    let mut content =
        serde_json::to_string_pretty(&records).map_err(PersistenceError::Serialize)?;
    content.push('\n');
    Ok(content)
}
