use std::path::Path;

mod form;
mod progress;
mod table;
mod terminal;

use anyhow::Context;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use roster::{
    domain::{Theme, CONFIG_FILE},
    Config, CsvExport, JsonFile, Roster, SortKey,
};
use terminal::Colorize;
use tracing::instrument;

const BANNER: &str = r"  ____           _
 |  _ \ ___  ___| |_ ___ _ __
 | |_) / _ \/ __| __/ _ \ '__|
 |  _ < (_) \__ \ ||  __/ |
 |_| \_\___/|___/\__\___|_|";

/// A menu entry.
trait Action: Copy + 'static {
    const ALL: &'static [Self];
    fn label(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Manage,
    Reports,
    Theme,
    Exit,
}

impl Action for MainAction {
    const ALL: &'static [Self] = &[Self::Manage, Self::Reports, Self::Theme, Self::Exit];

    fn label(self) -> &'static str {
        match self {
            Self::Manage => "Manage Employees",
            Self::Reports => "Generate Reports",
            Self::Theme => "Change Theme",
            Self::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManageAction {
    Add,
    Edit,
    Delete,
    Compare,
    List,
    Save,
    Back,
}

impl Action for ManageAction {
    const ALL: &'static [Self] = &[
        Self::Add,
        Self::Edit,
        Self::Delete,
        Self::Compare,
        Self::List,
        Self::Save,
        Self::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Add => "Add Employee",
            Self::Edit => "Edit Employee",
            Self::Delete => "Delete Employee",
            Self::Compare => "Compare Employees",
            Self::List => "List All Employees",
            Self::Save => "Save Employees",
            Self::Back => "Back to Main Menu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportAction {
    Statistics,
    Search,
    Export,
    Back,
}

impl Action for ReportAction {
    const ALL: &'static [Self] = &[Self::Statistics, Self::Search, Self::Export, Self::Back];

    fn label(self) -> &'static str {
        match self {
            Self::Statistics => "Employee Statistics",
            Self::Search => "Search Employees",
            Self::Export => "Export to CSV",
            Self::Back => "Back to Main Menu",
        }
    }
}

/// One interactive run of the application.
///
/// Owns the roster for the lifetime of the process.
pub struct Session {
    roster: Roster,
    data: JsonFile,
    export: CsvExport,
    config: Config,
    theme: Theme,
    prompt: ColorfulTheme,
    unsaved: bool,
}

impl Session {
    /// Reads configuration, installs logging and loads the roster.
    ///
    /// A data file that cannot be loaded is reported and replaced by an empty
    /// roster.
    pub fn start() -> Self {
        let config = Config::load_or_default(Path::new(CONFIG_FILE));
        Self::setup_logging(config.log_level());

        let data = JsonFile::new(config.data_file().to_path_buf());
        let export = CsvExport::new(config.export_file().to_path_buf());
        let theme = config.theme;

        let roster = data.load().unwrap_or_else(|e| {
            tracing::warn!("falling back to an empty roster: {e}");
            println!("{}", format!("Error: Failed to load employees: {e}").error());
            Roster::new()
        });

        Self {
            roster,
            data,
            export,
            config,
            theme,
            prompt: ColorfulTheme::default(),
            unsaved: false,
        }
    }

    fn setup_logging(level: &str) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = level.parse().unwrap_or(tracing::Level::WARN);

        let filter = tracing_subscriber::EnvFilter::default().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }

    /// Runs the main menu until the user exits.
    ///
    /// # Errors
    ///
    /// Only terminal failures end the loop. Errors from the roster or from
    /// file access are shown and the menu is offered again.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.welcome();

        loop {
            self.heading("Main Menu");
            let action = self.choose::<MainAction>()?.unwrap_or(MainAction::Exit);

            let outcome = match action {
                MainAction::Manage => self.manage().map(|()| false),
                MainAction::Reports => self.reports().map(|()| false),
                MainAction::Theme => self.change_theme().map(|()| false),
                MainAction::Exit => self.confirm_exit(),
            };

            match outcome {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => Self::recover(e)?,
            }
        }
    }

    fn manage(&mut self) -> anyhow::Result<()> {
        loop {
            self.heading("Employee Management");
            let Some(action) = self.choose::<ManageAction>()? else {
                return Ok(());
            };

            let outcome = match action {
                ManageAction::Add => self.add(),
                ManageAction::Edit => self.edit(),
                ManageAction::Delete => self.delete(),
                ManageAction::Compare => self.compare(),
                ManageAction::List => self.list(),
                ManageAction::Save => self.save(),
                ManageAction::Back => return Ok(()),
            };

            if let Err(e) = outcome {
                Self::recover(e)?;
            }
        }
    }

    fn reports(&mut self) -> anyhow::Result<()> {
        loop {
            self.heading("Reports");
            let Some(action) = self.choose::<ReportAction>()? else {
                return Ok(());
            };

            let outcome = match action {
                ReportAction::Statistics => self.statistics(),
                ReportAction::Search => self.search(),
                ReportAction::Export => self.export(),
                ReportAction::Back => return Ok(()),
            };

            if let Err(e) = outcome {
                Self::recover(e)?;
            }
        }
    }

    /// Shows an error and carries on, unless the terminal itself failed.
    fn recover(error: anyhow::Error) -> anyhow::Result<()> {
        if error.downcast_ref::<dialoguer::Error>().is_some() {
            return Err(error);
        }
        tracing::debug!("action failed: {error:#}");
        println!("\n{}\n", format!("Error: {error:#}").error());
        Ok(())
    }

    fn welcome(&self) {
        println!("{}", BANNER.themed(self.theme));
        println!("{}", " Employee Roster ".themed(self.theme));
        println!("{}", "=".repeat(30).themed(self.theme));
        progress::show("Loading", 20, self.theme);
        println!(
            "\nReady to use! {} employee(s) loaded.\n",
            self.roster.len()
        );
    }

    fn heading(&self, title: &str) {
        println!("{}", format!("=== {title} ===").themed(self.theme));
    }

    fn choose<A: Action>(&self) -> anyhow::Result<Option<A>> {
        let labels: Vec<&str> = A::ALL.iter().map(|a| a.label()).collect();
        let index = Select::with_theme(&self.prompt)
            .with_prompt("Choose an option (Esc to go back)")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(index.map(|i| A::ALL[i]))
    }

    fn require(&self, minimum: usize, message: &str) -> anyhow::Result<()> {
        if self.roster.len() < minimum {
            anyhow::bail!("{message}");
        }
        Ok(())
    }

    fn print_table<'a>(employees: impl IntoIterator<Item = &'a roster::Employee>) {
        print!("{}", table::render(employees, terminal::is_narrow()));
    }

    #[instrument(skip(self))]
    fn add(&mut self) -> anyhow::Result<()> {
        self.heading("Add New Employee");
        let employee = form::prompt_employee(&self.prompt, &self.roster, None)?;
        let summary = employee.to_string();
        self.roster.add(employee)?;
        self.unsaved = true;
        println!("\n{}\n", format!("Employee added: {summary}").success());
        Ok(())
    }

    #[instrument(skip(self))]
    fn edit(&mut self) -> anyhow::Result<()> {
        self.require(1, "No employees to edit.")?;
        Self::print_table(self.roster.list(SortKey::Id));

        let id = form::prompt_id(&self.prompt, "ID of employee to edit")?;
        let current = self.roster.get(id)?.clone();
        println!("\nEditing: {}", current.to_string().highlight());

        let replacement = form::prompt_employee(&self.prompt, &self.roster, Some(&current))?;
        self.roster.update(id, replacement)?;
        self.unsaved = true;
        println!("\n{}\n", "Employee updated successfully!".success());
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&mut self) -> anyhow::Result<()> {
        self.require(1, "No employees to delete.")?;
        Self::print_table(self.roster.list(SortKey::Id));

        let id = form::prompt_id(&self.prompt, "ID of employee to delete")?;
        let employee = self.roster.get(id)?;
        let confirmed = Confirm::with_theme(&self.prompt)
            .with_prompt(format!("Delete {employee}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled".dim());
            return Ok(());
        }

        self.roster.remove(id)?;
        self.unsaved = true;
        println!("\n{}\n", "Employee deleted successfully!".success());
        Ok(())
    }

    fn compare(&self) -> anyhow::Result<()> {
        self.require(2, "At least two employees are required for comparison.")?;
        Self::print_table(self.roster.list(SortKey::Id));

        let first = form::prompt_id(&self.prompt, "ID of first employee")?;
        let second = form::prompt_id(&self.prompt, "ID of second employee")?;
        let (a, b) = self.roster.get_pair(first, second)?;

        println!("\nComparison Results:");
        println!("{}", format!("Employee 1: {a}").highlight());
        println!("{}", format!("Employee 2: {b}").highlight());
        println!("{}", format!("Are employees equal? {}", a == b).highlight());
        println!(
            "{}\n",
            format!("Are employees not equal? {}", a != b).highlight()
        );
        Ok(())
    }

    fn list(&self) -> anyhow::Result<()> {
        self.require(1, "No employees to display.")?;

        let labels = ["ID", "Name", "Hire Date"];
        let index = Select::with_theme(&self.prompt)
            .with_prompt("Sort by")
            .items(&labels)
            .default(0)
            .interact()?;
        let key = SortKey::ALL[index];

        self.heading("Employee List");
        Self::print_table(self.roster.list(key));
        println!();
        Ok(())
    }

    #[instrument(skip(self))]
    fn save(&mut self) -> anyhow::Result<()> {
        self.data
            .save(&self.roster)
            .context("Failed to save employees")?;
        self.unsaved = false;
        println!(
            "\n{}",
            format!("Employees saved to {}!", self.data.path().display()).success()
        );
        progress::show("Saving data", 10, self.theme);
        println!();
        Ok(())
    }

    fn statistics(&self) -> anyhow::Result<()> {
        let Some(stats) = self.roster.statistics() else {
            anyhow::bail!("No employees to analyze.");
        };

        self.heading("Employee Statistics");
        println!("Total Employees: {}", stats.total);
        println!("\nEmployees by Department:");
        for (department, count) in &stats.by_department {
            println!("{department}: {count}");
        }
        println!(
            "\nAverage Tenure: {:.2} years\n",
            stats.average_tenure_years
        );
        Ok(())
    }

    fn search(&self) -> anyhow::Result<()> {
        self.require(1, "No employees to search.")?;

        let term = Input::<String>::with_theme(&self.prompt)
            .with_prompt("Search term (name or department)")
            .allow_empty(true)
            .interact_text()?;
        if term.trim().is_empty() {
            anyhow::bail!("Search term cannot be empty.");
        }

        let results = self.roster.search(&term);
        if results.is_empty() {
            anyhow::bail!("No employees found matching the search term.");
        }

        println!("\nFound {} employee(s):", results.len());
        Self::print_table(results);
        println!();
        Ok(())
    }

    #[instrument(skip(self))]
    fn export(&self) -> anyhow::Result<()> {
        self.export
            .export(&self.roster)
            .context("Failed to export to CSV")?;
        println!(
            "\n{}",
            format!(
                "{} employee(s) exported to {}!",
                self.roster.len(),
                self.export.path().display()
            )
            .success()
        );
        progress::show("Exporting data", 10, self.theme);
        println!();
        Ok(())
    }

    fn change_theme(&mut self) -> anyhow::Result<()> {
        let labels: Vec<String> = Theme::ALL
            .iter()
            .map(|t| {
                if *t == Theme::default() {
                    format!("{t} (Default)")
                } else {
                    t.to_string()
                }
            })
            .collect();
        let current = Theme::ALL.iter().position(|t| *t == self.theme).unwrap_or(0);

        let Some(index) = Select::with_theme(&self.prompt)
            .with_prompt("Select Theme")
            .items(&labels)
            .default(current)
            .interact_opt()?
        else {
            return Ok(());
        };

        self.theme = Theme::ALL[index];
        println!("\n{}", "Theme updated!".themed(self.theme));

        let remember = Confirm::with_theme(&self.prompt)
            .with_prompt(format!("Remember this theme in {CONFIG_FILE}?"))
            .default(false)
            .interact()?;
        if remember {
            self.config.theme = self.theme;
            self.config
                .save(Path::new(CONFIG_FILE))
                .context("Failed to save configuration")?;
            println!("{}\n", "Saved.".dim());
        }
        Ok(())
    }

    /// Returns `true` when the session should end.
    fn confirm_exit(&mut self) -> anyhow::Result<bool> {
        let exit = Confirm::with_theme(&self.prompt)
            .with_prompt("Are you sure you want to exit?")
            .default(false)
            .interact()?;
        if !exit {
            return Ok(false);
        }

        if self.unsaved {
            let save = Confirm::with_theme(&self.prompt)
                .with_prompt("You have unsaved changes. Save before exiting?")
                .default(true)
                .interact()?;
            if save {
                self.save()?;
            }
        }

        progress::show("Shutting down", 10, Theme::Magenta);
        println!();
        Ok(true)
    }
}
