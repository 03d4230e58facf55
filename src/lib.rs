//! Employee Roster Management
//!
//! Employees are held in memory, saved to a JSON file for reloading, and
//! exported to CSV for everyone else.

pub mod domain;
pub use domain::{
    Config, Employee, EmployeeId, Roster, RosterError, SortKey, Statistics, ValidationError,
};

/// File persistence for the roster.
pub mod storage;
pub use storage::{CsvExport, JsonFile, PersistenceError};
