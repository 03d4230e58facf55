//! The in-memory store of employees.
//!
//! The [`Roster`] knows nothing about the filesystem. It owns the records,
//! keeps them in insertion order, and guarantees that no two share an id.

use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{Local, NaiveDate};
use nonempty::NonEmpty;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Employee, EmployeeId};

/// Errors returned by [`Roster`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    /// Another record already holds this id.
    #[error("ID {0} already exists")]
    DuplicateId(EmployeeId),

    /// One or more ids have no record.
    #[error("employee not found: {}", format_ids(.0))]
    NotFound(NonEmpty<EmployeeId>),
}

impl RosterError {
    const fn not_found(id: EmployeeId) -> Self {
        Self::NotFound(NonEmpty::new(id))
    }
}

fn format_ids(ids: &NonEmpty<EmployeeId>) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Orderings available to [`Roster::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending id.
    #[default]
    Id,
    /// First name, then last name, ignoring case.
    Name,
    /// Ascending hire date.
    HireDate,
}

impl SortKey {
    /// All sort keys, in menu order.
    pub const ALL: [Self; 3] = [Self::Id, Self::Name, Self::HireDate];

    fn compare(self, a: &Employee, b: &Employee) -> Ordering {
        match self {
            Self::Id => a.id().cmp(&b.id()),
            Self::Name => folded_name(a)
                .cmp(&folded_name(b))
                .then_with(|| raw_name(a).cmp(&raw_name(b))),
            Self::HireDate => a.hire_date().cmp(&b.hire_date()),
        }
    }
}

/// Names ignoring case. Ties fall back to the names as written.
fn folded_name(employee: &Employee) -> (String, String) {
    (
        employee.first_name().to_lowercase(),
        employee.last_name().to_lowercase(),
    )
}

fn raw_name(employee: &Employee) -> (&str, &str) {
    (employee.first_name(), employee.last_name())
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::HireDate => "date",
        })
    }
}

/// Error returned when parsing an unknown [`SortKey`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key '{0}': expected one of id, name, date")]
pub struct UnknownSortKey(String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "date" | "hiredate" | "hire_date" => Ok(Self::HireDate),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Summary figures for a non-empty roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Number of employees.
    pub total: usize,
    /// Head count per department, in order of first appearance.
    pub by_department: Vec<(String, usize)>,
    /// Mean tenure in years (days / 365).
    pub average_tenure_years: f64,
}

/// An insertion-ordered collection of employees with unique ids.
///
/// Alongside the records, the roster remembers every department it has seen,
/// so the UI can offer them as suggestions. That list only grows.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<Employee>,
    departments: Vec<String>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from records, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DuplicateId`] for the first repeated id.
    pub fn from_employees<I>(employees: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = Employee>,
    {
        let mut roster = Self::new();
        for employee in employees {
            roster.add(employee)?;
        }
        Ok(roster)
    }

    /// Number of employees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Whether the roster holds no employees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Iterates over the employees in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Employee> + '_ {
        self.employees.iter()
    }

    /// Departments seen so far, deduplicated, in order of first appearance.
    #[must_use]
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    fn position(&self, id: EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e.id() == id)
    }

    fn contains(&self, id: EmployeeId) -> bool {
        self.position(id).is_some()
    }

    fn remember_department(&mut self, department: &str) {
        if !self.departments.iter().any(|d| d == department) {
            self.departments.push(department.to_string());
        }
    }

    /// Appends an employee.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DuplicateId`] if the id is taken. The roster is
    /// left unchanged.
    pub fn add(&mut self, employee: Employee) -> Result<(), RosterError> {
        if self.contains(employee.id()) {
            return Err(RosterError::DuplicateId(employee.id()));
        }
        debug!(id = %employee.id(), "adding employee");
        self.remember_department(employee.department());
        self.employees.push(employee);
        Ok(())
    }

    /// Replaces the employee holding `old_id` with `employee`.
    ///
    /// The replacement is appended at the end of store order. `employee` may
    /// carry a different id, provided no other record holds it.
    ///
    /// # Errors
    ///
    /// - [`RosterError::NotFound`] if nothing holds `old_id`
    /// - [`RosterError::DuplicateId`] if the new id belongs to another record
    ///
    /// On error the roster is left unchanged.
    pub fn update(
        &mut self,
        old_id: EmployeeId,
        employee: Employee,
    ) -> Result<Employee, RosterError> {
        let index = self
            .position(old_id)
            .ok_or_else(|| RosterError::not_found(old_id))?;

        if employee.id() != old_id && self.contains(employee.id()) {
            return Err(RosterError::DuplicateId(employee.id()));
        }

        debug!(old = %old_id, new = %employee.id(), "replacing employee");
        let previous = self.employees.remove(index);
        self.remember_department(employee.department());
        self.employees.push(employee);
        Ok(previous)
    }

    /// Removes and returns the employee holding `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if nothing holds `id`.
    pub fn remove(&mut self, id: EmployeeId) -> Result<Employee, RosterError> {
        let index = self.position(id).ok_or_else(|| RosterError::not_found(id))?;
        debug!(%id, "removing employee");
        Ok(self.employees.remove(index))
    }

    /// Looks up one employee.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] if nothing holds `id`.
    pub fn get(&self, id: EmployeeId) -> Result<&Employee, RosterError> {
        self.employees
            .iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| RosterError::not_found(id))
    }

    /// Looks up two employees, typically for comparison.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::NotFound`] naming every id that is missing.
    pub fn get_pair(
        &self,
        first: EmployeeId,
        second: EmployeeId,
    ) -> Result<(&Employee, &Employee), RosterError> {
        match (self.get(first), self.get(second)) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (Err(_), Ok(_)) => Err(RosterError::not_found(first)),
            (Ok(_), Err(_)) => Err(RosterError::not_found(second)),
            (Err(_), Err(_)) => {
                let mut missing = NonEmpty::new(first);
                if second != first {
                    missing.push(second);
                }
                Err(RosterError::NotFound(missing))
            }
        }
    }

    /// Returns every employee ordered by `key`.
    ///
    /// The stored order is untouched. The returned iterator can be cloned to
    /// walk the same ordering again.
    pub fn list(&self, key: SortKey) -> impl Iterator<Item = &Employee> + Clone + '_ {
        let mut sorted: Vec<&Employee> = self.employees.iter().collect();
        sorted.sort_by(|a, b| key.compare(a, b));
        sorted.into_iter()
    }

    /// Employees whose first name, last name or department contains `term`,
    /// ignoring case, in store order.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Employee> {
        let needle = term.trim().to_lowercase();
        self.employees.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Computes [`Statistics`] as of today's local date.
    ///
    /// Returns `None` for an empty roster.
    #[must_use]
    pub fn statistics(&self) -> Option<Statistics> {
        self.statistics_as_of(Local::now().date_naive())
    }

    /// Computes [`Statistics`] as of `today`.
    ///
    /// Returns `None` for an empty roster.
    #[must_use]
    pub fn statistics_as_of(&self, today: NaiveDate) -> Option<Statistics> {
        if self.employees.is_empty() {
            return None;
        }

        let mut by_department: Vec<(String, usize)> = Vec::new();
        for employee in &self.employees {
            let department = employee.department();
            let seen = by_department
                .iter()
                .position(|(name, _)| name == department);
            let index = seen.unwrap_or_else(|| {
                by_department.push((department.to_string(), 0));
                by_department.len() - 1
            });
            by_department[index].1 += 1;
        }

        let total = self.employees.len();
        #[allow(clippy::cast_precision_loss)]
        let average_tenure_years = self
            .employees
            .iter()
            .map(|e| e.tenure_days(today) as f64 / 365.0)
            .sum::<f64>()
            / total as f64;

        Some(Statistics {
            total,
            by_department,
            average_tenure_years,
        })
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn employee(id: i64, first: &str, last: &str, dept: &str, hired: (i32, u32, u32)) -> Employee {
        let hired = NaiveDate::from_ymd_opt(hired.0, hired.1, hired.2).unwrap();
        Employee::new_as_of(id, first, last, dept, hired, today()).unwrap()
    }

    fn id(id: i64) -> EmployeeId {
        EmployeeId::new(id).unwrap()
    }

    fn ids<'a>(employees: impl IntoIterator<Item = &'a Employee>) -> Vec<i64> {
        employees.into_iter().map(|e| e.id().get()).collect()
    }

    fn sample() -> Roster {
        Roster::from_employees([
            employee(3, "Carol", "Engel", "Sales", (2021, 1, 1)),
            employee(1, "Bob", "Smith", "Engineering", (2019, 5, 1)),
            employee(2, "Alice", "Zeta", "Support", (2023, 2, 1)),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_add_is_rejected_and_leaves_roster_unchanged() {
        let mut roster = Roster::new();
        roster.add(employee(1, "Ada", "Lovelace", "Eng", (2020, 1, 1))).unwrap();

        let error = roster
            .add(employee(1, "Grace", "Hopper", "Navy", (2021, 1, 1)))
            .unwrap_err();

        assert_eq!(error, RosterError::DuplicateId(id(1)));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(id(1)).unwrap().first_name(), "Ada");
        assert_eq!(roster.departments(), ["Eng"]);
    }

    #[test]
    fn departments_are_deduplicated_in_first_seen_order() {
        let mut roster = sample();
        roster.add(employee(4, "Dan", "Ode", "Sales", (2020, 1, 1))).unwrap();
        assert_eq!(roster.departments(), ["Sales", "Engineering", "Support"]);

        roster.remove(id(4)).unwrap();
        roster.remove(id(3)).unwrap();
        assert_eq!(roster.departments(), ["Sales", "Engineering", "Support"]);
    }

    #[test]
    fn update_missing_id_is_not_found_and_leaves_roster_unchanged() {
        let mut roster = sample();
        let error = roster
            .update(id(9), employee(9, "New", "Person", "Ops", (2020, 1, 1)))
            .unwrap_err();

        assert_eq!(error, RosterError::NotFound(NonEmpty::new(id(9))));
        assert_eq!(ids(&roster), [3, 1, 2]);
        assert_eq!(roster.departments().len(), 3);
    }

    #[test]
    fn update_to_taken_id_is_duplicate() {
        let mut roster = sample();
        let error = roster
            .update(id(1), employee(2, "Bob", "Smith", "Engineering", (2019, 5, 1)))
            .unwrap_err();

        assert_eq!(error, RosterError::DuplicateId(id(2)));
        assert_eq!(ids(&roster), [3, 1, 2]);
    }

    #[test]
    fn update_replaces_record_and_moves_it_last() {
        let mut roster = sample();
        let previous = roster
            .update(id(1), employee(1, "Robert", "Smith", "Ops", (2019, 5, 1)))
            .unwrap();

        assert_eq!(previous.first_name(), "Bob");
        assert_eq!(ids(&roster), [3, 2, 1]);
        assert_eq!(roster.get(id(1)).unwrap().first_name(), "Robert");
        assert!(roster.departments().iter().any(|d| d == "Ops"));
    }

    #[test]
    fn update_may_change_id() {
        let mut roster = sample();
        roster
            .update(id(1), employee(10, "Bob", "Smith", "Engineering", (2019, 5, 1)))
            .unwrap();

        assert!(roster.get(id(1)).is_err());
        assert_eq!(roster.get(id(10)).unwrap().last_name(), "Smith");
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let mut roster = sample();
        let removed = roster.remove(id(2)).unwrap();
        assert_eq!(removed.first_name(), "Alice");

        assert_eq!(
            roster.get(id(2)).unwrap_err(),
            RosterError::NotFound(NonEmpty::new(id(2)))
        );
        assert!(roster.remove(id(2)).is_err());
    }

    #[test]
    fn get_pair_names_missing_ids() {
        let roster = sample();

        let (a, b) = roster.get_pair(id(1), id(3)).unwrap();
        assert_eq!((a.id(), b.id()), (id(1), id(3)));

        assert_eq!(
            roster.get_pair(id(1), id(8)).unwrap_err(),
            RosterError::NotFound(NonEmpty::new(id(8)))
        );

        let error = roster.get_pair(id(7), id(8)).unwrap_err();
        assert_eq!(error, RosterError::NotFound(NonEmpty::from((id(7), vec![id(8)]))));
        assert_eq!(error.to_string(), "employee not found: 7, 8");
    }

    #[test]
    fn list_sorts_without_touching_store_order() {
        let roster = sample();

        assert_eq!(ids(roster.list(SortKey::Id)), [1, 2, 3]);
        assert_eq!(ids(roster.list(SortKey::Name)), [2, 1, 3]);
        assert_eq!(ids(roster.list(SortKey::HireDate)), [1, 3, 2]);
        assert_eq!(ids(&roster), [3, 1, 2]);
    }

    #[test]
    fn list_by_name_breaks_ties_on_last_name() {
        let roster = Roster::from_employees([
            employee(1, "Sam", "Young", "A", (2020, 1, 1)),
            employee(2, "Sam", "Adams", "A", (2020, 1, 1)),
        ])
        .unwrap();

        assert_eq!(ids(roster.list(SortKey::Name)), [2, 1]);
    }

    #[test]
    fn list_by_name_ignores_case() {
        let roster = Roster::from_employees([
            employee(1, "Zed", "Lane", "A", (2020, 1, 1)),
            employee(2, "alice", "Moss", "A", (2020, 1, 1)),
            employee(3, "Bob", "Nye", "A", (2020, 1, 1)),
            employee(4, "bob", "adams", "A", (2020, 1, 1)),
            employee(5, "Bob", "Adams", "A", (2020, 1, 1)),
        ])
        .unwrap();

        let names: Vec<_> = roster
            .list(SortKey::Name)
            .map(|e| format!("{} {}", e.first_name(), e.last_name()))
            .collect();
        assert_eq!(
            names,
            ["alice Moss", "Bob Adams", "bob adams", "Bob Nye", "Zed Lane"]
        );
    }

    #[test]
    fn list_is_restartable() {
        let roster = sample();
        let listing = roster.list(SortKey::Id);
        assert_eq!(ids(listing.clone()), ids(listing));
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("ID".parse::<SortKey>().unwrap(), SortKey::Id);
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!(" date ".parse::<SortKey>().unwrap(), SortKey::HireDate);
        assert!("salary".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::Id);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let roster = sample();

        assert_eq!(ids(roster.search("eng")), [3, 1]);
        assert_eq!(ids(roster.search("ALICE")), [2]);
        assert!(roster.search("xyz").is_empty());
    }

    #[test]
    fn statistics_groups_by_department() {
        let roster = Roster::from_employees([
            employee(1, "A", "A", "Eng", (2023, 6, 1)),
            employee(2, "B", "B", "Eng", (2022, 6, 1)),
            employee(3, "C", "C", "Sales", (2024, 6, 1)),
        ])
        .unwrap();

        let stats = roster.statistics_as_of(today()).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_department,
            [("Eng".to_string(), 2), ("Sales".to_string(), 1)]
        );

        // 366 + 731 + 0 days
        let expected = (366.0 + 731.0) / 365.0 / 3.0;
        assert!((stats.average_tenure_years - expected).abs() < 1e-9);
    }

    #[test]
    fn statistics_on_empty_roster_is_none() {
        assert!(Roster::new().statistics_as_of(today()).is_none());
    }

    #[test]
    fn from_employees_rejects_duplicates() {
        let error = Roster::from_employees([
            employee(1, "A", "A", "Eng", (2020, 1, 1)),
            employee(1, "B", "B", "Eng", (2020, 1, 1)),
        ])
        .unwrap_err();
        assert_eq!(error, RosterError::DuplicateId(id(1)));
    }
}
