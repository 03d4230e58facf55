//! Prompts that collect an employee's fields.

use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Input};
use roster::{Employee, EmployeeId, Roster};

/// Parses a raw id as typed by the user.
pub fn parse_id(input: &str) -> Result<i64, String> {
    input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", input.trim()))
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date, use YYYY-MM-DD", input.trim()))
}

/// Raw field values, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub hire_date: String,
}

impl Draft {
    fn from_employee(employee: &Employee) -> Self {
        Self {
            id: employee.id().to_string(),
            first_name: employee.first_name().to_string(),
            last_name: employee.last_name().to_string(),
            department: employee.department().to_string(),
            hire_date: employee.hire_date().format("%Y-%m-%d").to_string(),
        }
    }

    /// Parses and validates the draft against today's date.
    pub fn build(&self) -> anyhow::Result<Employee> {
        self.build_as_of(Local::now().date_naive())
    }

    fn build_as_of(&self, today: NaiveDate) -> anyhow::Result<Employee> {
        let id = parse_id(&self.id).map_err(anyhow::Error::msg)?;
        let hire_date = parse_date(&self.hire_date).map_err(anyhow::Error::msg)?;
        Ok(Employee::new_as_of(
            id,
            &self.first_name,
            &self.last_name,
            &self.department,
            hire_date,
            today,
        )?)
    }
}

/// Asks for every field of an employee.
///
/// When `existing` is given, its values are pre-filled and its id may be
/// kept. Any other id already on the roster is refused at the prompt.
pub fn prompt_employee(
    theme: &ColorfulTheme,
    roster: &Roster,
    existing: Option<&Employee>,
) -> anyhow::Result<Employee> {
    let initial = existing.map(Draft::from_employee).unwrap_or_default();
    let keep = existing.map(Employee::id);

    let id = Input::<String>::with_theme(theme)
        .with_prompt("Employee ID (positive integer)")
        .with_initial_text(initial.id)
        .validate_with(|input: &String| -> Result<(), String> {
            let raw = parse_id(input)?;
            match EmployeeId::new(raw) {
                Err(e) => Err(e.to_string()),
                Ok(id) if Some(id) != keep && roster.get(id).is_ok() => {
                    Err(format!("ID {id} already exists"))
                }
                Ok(_) => Ok(()),
            }
        })
        .interact_text()?;

    let text = |prompt: &str, initial: String| -> dialoguer::Result<String> {
        Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
    };

    let first_name = text("First Name", initial.first_name)?;
    let last_name = text("Last Name", initial.last_name)?;

    let department_prompt = if roster.departments().is_empty() {
        "Department".to_string()
    } else {
        format!("Department (suggestions: {})", roster.departments().join(", "))
    };
    let department = text(&department_prompt, initial.department)?;

    let hire_date = Input::<String>::with_theme(theme)
        .with_prompt("Hire Date (YYYY-MM-DD)")
        .with_initial_text(initial.hire_date)
        .validate_with(|input: &String| parse_date(input).map(|_| ()))
        .interact_text()?;

    Draft {
        id,
        first_name,
        last_name,
        department,
        hire_date,
    }
    .build()
}

/// Asks for an id and parses it.
pub fn prompt_id(theme: &ColorfulTheme, prompt: &str) -> anyhow::Result<EmployeeId> {
    let raw = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| parse_id(input).map(|_| ()))
        .interact_text()?;
    let id = parse_id(&raw).map_err(anyhow::Error::msg)?;
    Ok(EmployeeId::new(id)?)
}

#[cfg(test)]
mod tests {
    use roster::ValidationError;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_draft() -> Draft {
        Draft {
            id: " 4 ".to_string(),
            first_name: " Ada".to_string(),
            last_name: "Lovelace ".to_string(),
            department: "Engineering".to_string(),
            hire_date: "2020-01-15".to_string(),
        }
    }

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id(" 12 "), Ok(12));
        assert_eq!(parse_id("-3"), Ok(-3));
        assert!(parse_id("twelve").is_err());
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert_eq!(
            parse_date("2020-01-15"),
            Ok(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap())
        );
        assert!(parse_date("15/01/2020").is_err());
        assert!(parse_date("2020-02-30").is_err());
    }

    #[test]
    fn draft_builds_trimmed_employee() {
        let employee = valid_draft().build_as_of(today()).unwrap();
        assert_eq!(employee.id().get(), 4);
        assert_eq!(employee.first_name(), "Ada");
        assert_eq!(employee.last_name(), "Lovelace");
    }

    #[test]
    fn draft_surfaces_validation_errors() {
        let draft = Draft {
            id: "0".to_string(),
            ..valid_draft()
        };
        let error = draft.build_as_of(today()).unwrap_err();
        assert_eq!(
            error.downcast_ref::<ValidationError>(),
            Some(&ValidationError::InvalidId(0))
        );

        let draft = Draft {
            department: "   ".to_string(),
            ..valid_draft()
        };
        let error = draft.build_as_of(today()).unwrap_err();
        assert_eq!(
            error.downcast_ref::<ValidationError>(),
            Some(&ValidationError::InvalidDepartment)
        );
    }

    #[test]
    fn draft_round_trips_existing_employee() {
        let employee = valid_draft().build_as_of(today()).unwrap();
        let copy = Draft::from_employee(&employee).build_as_of(today()).unwrap();
        assert_eq!(copy.to_string(), employee.to_string());
    }
}
