use std::fmt::Write;

use roster::Employee;

const HEADERS: [&str; 5] = ["ID", "First Name", "Last Name", "Department", "Hire Date"];

fn cells(employee: &Employee) -> [String; 5] {
    [
        employee.id().to_string(),
        employee.first_name().to_string(),
        employee.last_name().to_string(),
        employee.department().to_string(),
        employee.hire_date().format("%Y-%m-%d").to_string(),
    ]
}

/// Renders employees as an aligned table.
///
/// When `narrow` is set, each employee is printed on one line in its
/// canonical form instead.
pub fn render<'a>(employees: impl IntoIterator<Item = &'a Employee>, narrow: bool) -> String {
    let mut out = String::new();

    if narrow {
        for employee in employees {
            let _ = writeln!(out, "{employee}");
        }
        return out;
    }

    let rows: Vec<[String; 5]> = employees.into_iter().map(cells).collect();

    // Determine column widths for alignment.
    let widths: Vec<usize> = HEADERS
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    let line = |out: &mut String, values: &[&str]| {
        let joined = values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", joined.trim_end());
    };

    line(&mut out, &HEADERS);
    let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "=".repeat(total));

    for row in &rows {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        line(&mut out, &values);
    }

    out
}
