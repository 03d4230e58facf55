use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
};

use chrono::{Local, NaiveDate};
use non_empty_string::NonEmptyString;

/// The identity key of an employee.
///
/// Always a positive integer. Two employees with the same id are the same
/// employee, whatever their other fields say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmployeeId(i64);

impl EmployeeId {
    /// Creates an id from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] if `id` is zero or negative.
    pub const fn new(id: i64) -> Result<Self, ValidationError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(ValidationError::InvalidId(id))
        }
    }

    /// Returns the id as a plain integer. Always greater than zero.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trimmed, non-blank piece of text.
///
/// Used for first names, last names and departments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(NonEmptyString);

impl Name {
    /// Trims `s` and wraps it.
    ///
    /// Returns `None` if nothing is left after trimming.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        NonEmptyString::new(s.trim().to_string()).ok().map(Self)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields of an [`Employee`], for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The identity key.
    Id,
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Department name.
    Department,
    /// Date of hire.
    HireDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Department => "department",
            Self::HireDate => "hire date",
        })
    }
}

/// Reasons an employee record can be rejected.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The id was zero or negative.
    #[error("invalid ID {0}: must be a positive integer")]
    InvalidId(i64),

    /// The first name was empty or whitespace.
    #[error("first name cannot be empty or whitespace")]
    InvalidFirstName,

    /// The last name was empty or whitespace.
    #[error("last name cannot be empty or whitespace")]
    InvalidLastName,

    /// The department was empty or whitespace.
    #[error("department cannot be empty or whitespace")]
    InvalidDepartment,

    /// The hire date lies after the current date.
    #[error("hire date {hire_date} cannot be in the future (today is {today})")]
    FutureHireDate {
        /// The rejected date.
        hire_date: NaiveDate,
        /// The date validation ran against.
        today: NaiveDate,
    },
}

impl ValidationError {
    /// The field that failed validation.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::InvalidId(_) => Field::Id,
            Self::InvalidFirstName => Field::FirstName,
            Self::InvalidLastName => Field::LastName,
            Self::InvalidDepartment => Field::Department,
            Self::FutureHireDate { .. } => Field::HireDate,
        }
    }
}

/// An employee record.
///
/// Every `Employee` in existence passed full validation when it was built;
/// there are no setters. Editing a record means building a new one and
/// swapping it in (see [`Roster::update`](crate::Roster::update)).
///
/// Equality and hashing use the id alone.
#[derive(Debug, Clone)]
pub struct Employee {
    id: EmployeeId,
    first_name: Name,
    last_name: Name,
    department: Name,
    hire_date: NaiveDate,
}

impl Employee {
    /// Validates the fields against today's local date and builds an
    /// employee.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, checking the id,
    /// first name, last name, department and hire date in that order.
    pub fn new(
        id: i64,
        first_name: &str,
        last_name: &str,
        department: &str,
        hire_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let today = Local::now().date_naive();
        Self::new_as_of(id, first_name, last_name, department, hire_date, today)
    }

    /// Like [`Employee::new`], but validates the hire date against `today`.
    ///
    /// # Errors
    ///
    /// See [`Employee::new`].
    pub fn new_as_of(
        id: i64,
        first_name: &str,
        last_name: &str,
        department: &str,
        hire_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let id = EmployeeId::new(id)?;
        let first_name = Name::new(first_name).ok_or(ValidationError::InvalidFirstName)?;
        let last_name = Name::new(last_name).ok_or(ValidationError::InvalidLastName)?;
        let department = Name::new(department).ok_or(ValidationError::InvalidDepartment)?;

        if hire_date > today {
            return Err(ValidationError::FutureHireDate { hire_date, today });
        }

        Ok(Self {
            id,
            first_name,
            last_name,
            department,
            hire_date,
        })
    }

    /// The identity key.
    #[must_use]
    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    /// Alias of [`Employee::id`] for use as a map key.
    #[must_use]
    pub const fn key(&self) -> EmployeeId {
        self.id
    }

    /// Given name, trimmed.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name, trimmed.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Department, trimmed.
    #[must_use]
    pub fn department(&self) -> &str {
        self.department.as_str()
    }

    /// Date of hire.
    #[must_use]
    pub const fn hire_date(&self) -> NaiveDate {
        self.hire_date
    }

    /// Whole days between the hire date and `today`.
    #[must_use]
    pub fn tenure_days(&self, today: NaiveDate) -> i64 {
        (today - self.hire_date).num_days()
    }

    /// Case-insensitive substring match against the names and department.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [self.first_name(), self.last_name(), self.department()]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Employee {}

impl Hash for Employee {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {} {}, Dept: {}, Hired: {}",
            self.id,
            self.first_name,
            self.last_name,
            self.department,
            self.hire_date.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_fields_are_trimmed() {
        let employee =
            Employee::new_as_of(7, "  Ada ", "\tLovelace", " Eng  ", date(2020, 1, 2), today())
                .unwrap();

        assert_eq!(employee.id().get(), 7);
        assert_eq!(employee.first_name(), "Ada");
        assert_eq!(employee.last_name(), "Lovelace");
        assert_eq!(employee.department(), "Eng");
        assert_eq!(employee.hire_date(), date(2020, 1, 2));
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        for id in [0, -1, i64::MIN] {
            let error =
                Employee::new_as_of(id, "Ada", "Lovelace", "Eng", date(2020, 1, 1), today())
                    .unwrap_err();
            assert_eq!(error, ValidationError::InvalidId(id));
            assert_eq!(error.field(), Field::Id);
        }
    }

    #[test]
    fn blank_text_fields_are_rejected() {
        let hired = date(2020, 1, 1);
        assert_eq!(
            Employee::new_as_of(1, "   ", "Lovelace", "Eng", hired, today()).unwrap_err(),
            ValidationError::InvalidFirstName
        );
        assert_eq!(
            Employee::new_as_of(1, "Ada", "", "Eng", hired, today()).unwrap_err(),
            ValidationError::InvalidLastName
        );
        assert_eq!(
            Employee::new_as_of(1, "Ada", "Lovelace", "\n", hired, today()).unwrap_err(),
            ValidationError::InvalidDepartment
        );
    }

    #[test]
    fn first_failure_wins() {
        let error = Employee::new_as_of(0, "", "", "", date(2099, 1, 1), today()).unwrap_err();
        assert_eq!(error, ValidationError::InvalidId(0));

        let error = Employee::new_as_of(1, "Ada", "", "", date(2099, 1, 1), today()).unwrap_err();
        assert_eq!(error, ValidationError::InvalidLastName);
    }

    #[test]
    fn hire_date_today_is_allowed_but_tomorrow_is_not() {
        assert!(Employee::new_as_of(1, "Ada", "Lovelace", "Eng", today(), today()).is_ok());

        let tomorrow = today().succ_opt().unwrap();
        let error =
            Employee::new_as_of(1, "Ada", "Lovelace", "Eng", tomorrow, today()).unwrap_err();
        assert_eq!(
            error,
            ValidationError::FutureHireDate {
                hire_date: tomorrow,
                today: today()
            }
        );
        assert_eq!(error.field(), Field::HireDate);
    }

    #[test]
    fn equality_uses_id_only() {
        let a =
            Employee::new_as_of(1, "Ada", "Lovelace", "Eng", date(2020, 1, 1), today()).unwrap();
        let b =
            Employee::new_as_of(1, "Grace", "Hopper", "Navy", date(1999, 9, 9), today()).unwrap();
        let c =
            Employee::new_as_of(2, "Ada", "Lovelace", "Eng", date(2020, 1, 1), today()).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let by_key: HashMap<_, _> = [&a, &b, &c].into_iter().map(|e| (e.key(), e)).collect();
        assert_eq!(by_key.len(), 2);
        assert_eq!(by_key[&a.key()].first_name(), "Grace");

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_round_trips_as_signed_integer() {
        assert_eq!(EmployeeId::new(i64::MAX).unwrap().get(), i64::MAX);
        assert_eq!(EmployeeId::new(1).unwrap().to_string(), "1");
        assert_eq!(EmployeeId::new(0), Err(ValidationError::InvalidId(0)));
    }

    #[test]
    fn display_is_canonical() {
        let employee =
            Employee::new_as_of(42, "Ada", "Lovelace", "Eng", date(2020, 3, 4), today()).unwrap();
        assert_eq!(
            employee.to_string(),
            "ID: 42, Name: Ada Lovelace, Dept: Eng, Hired: 2020-03-04"
        );
    }

    #[test]
    fn tenure_counts_days() {
        let employee =
            Employee::new_as_of(1, "Ada", "Lovelace", "Eng", date(2024, 5, 1), today()).unwrap();
        assert_eq!(employee.tenure_days(today()), 31);
    }
}
