//! Domain models for the employee roster.
//!
//! This module contains the employee record with its validation rules, the
//! in-memory roster that owns the records, and application configuration.

/// Employee record and validation.
pub mod employee;
pub use employee::{Employee, EmployeeId, Field, Name, ValidationError};

/// The in-memory roster.
pub mod roster;
pub use roster::{Roster, RosterError, SortKey, Statistics, UnknownSortKey};

mod config;
pub use config::{Config, ConfigError, Theme, CONFIG_FILE};
