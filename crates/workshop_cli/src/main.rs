//! Interactive console front end for the workshop project tracker.
//!
//! # Responsibility
//! - Drive the menu loop: prompt, parse, dispatch to the project service.
//! - Keep raw-input parsing and the working-project selection out of the
//!   core crate.
//!
//! # Invariants
//! - A failed operation prints its error and returns to the menu; only a
//!   blank menu selection (or end of input) exits the process.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use workshop_core::{
    default_log_level, init_logging, ConnectionProvider, DbConfig, Decimal2, Project,
    ProjectDraft, ProjectRecord, ProjectService, SqliteProjectStore,
};

/// Single-user console tool for tracking do-it-yourself projects.
#[derive(Debug, Parser)]
#[command(name = "workshop", version, about = "Track projects, their materials, steps and categories")]
struct Cli {
    /// Database file to open (created on first use).
    #[arg(long, value_name = "PATH", default_value = "workshop.db")]
    database: PathBuf,

    /// Directory for rolling log files.
    #[arg(long, value_name = "PATH", default_value = "logs")]
    log_dir: PathBuf,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

const OPERATIONS: &[&str] = &[
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
    "99) Display the selections",
];

fn main() {
    let cli = Cli::parse();

    let log_dir = absolute_path(&cli.log_dir);
    let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
    if let Err(err) = init_logging(level, &log_dir.display().to_string()) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!(
        "event=app_start module=cli status=ok version={} database={}",
        env!("CARGO_PKG_VERSION"),
        cli.database.display()
    );

    let provider = ConnectionProvider::new(DbConfig::new(&cli.database));
    let service = ProjectService::new(SqliteProjectStore::new(provider));

    let mut app = App {
        input: io::stdin().lock(),
        service,
        current: None,
    };
    app.run();
    info!("event=app_exit module=cli status=ok");
}

struct App<R: BufRead> {
    input: R,
    service: ProjectService<SqliteProjectStore>,
    current: Option<Project>,
}

impl<R: BufRead> App<R> {
    fn run(&mut self) {
        loop {
            self.print_operations();
            let selection = match self.read_i64("Enter a menu selection") {
                Ok(selection) => selection,
                Err(message) => {
                    report_error(&message);
                    continue;
                }
            };

            let outcome = match selection {
                None => {
                    println!("Exiting the application.");
                    return;
                }
                Some(1) => self.create_project(),
                Some(2) => self.list_projects(),
                Some(3) => self.select_project(),
                Some(4) => self.update_project_details(),
                Some(5) => self.delete_project(),
                // Selections reprint on every pass of the loop.
                Some(99) => Ok(()),
                Some(other) => {
                    println!("\n{other} is not a valid selection. Try again.");
                    Ok(())
                }
            };

            if let Err(message) = outcome {
                warn!("event=menu_op module=cli status=error error={message}");
                report_error(&message);
            }
        }
    }

    fn print_operations(&self) {
        println!("\nThese are the available selections. Press the Enter key to quit:");
        for operation in OPERATIONS {
            println!("  {operation}");
        }
        match &self.current {
            Some(project) => print!("\nYou are working with project:\n{project}"),
            None => println!("\nYou are not working with a project."),
        }
    }

    fn create_project(&mut self) -> Result<(), String> {
        let project_name = self
            .read_string("Enter the project name")
            .unwrap_or_default();
        let estimated_hours = self.read_decimal("Enter the estimated hours")?;
        let actual_hours = self.read_decimal("Enter the actual hours")?;
        let difficulty = self.read_difficulty("Enter the project difficulty (1-5)")?;
        let notes = self.read_string("Enter the project notes");

        let draft = ProjectDraft {
            project_name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
        };
        draft.validate().map_err(|err| err.to_string())?;

        let created = self
            .service
            .add_project(&draft)
            .map_err(|err| err.to_string())?;
        println!("You have successfully created project: {created}");
        Ok(())
    }

    fn list_projects(&mut self) -> Result<(), String> {
        self.print_project_list()?;
        self.current = None;
        Ok(())
    }

    fn print_project_list(&mut self) -> Result<(), String> {
        let names = self
            .service
            .list_project_names()
            .map_err(|err| err.to_string())?;
        println!("\nProjects:");
        for name in &names {
            println!("  {}: {}", name.project_id, name.project_name);
        }
        Ok(())
    }

    fn select_project(&mut self) -> Result<(), String> {
        self.print_project_list()?;
        let project_id = match self.read_i64("Enter a project ID to select a project")? {
            Some(project_id) => project_id,
            None => return Ok(()),
        };

        // Unset first so an invalid ID leaves no stale selection behind.
        self.current = None;
        let project = self
            .service
            .fetch_project(project_id)
            .map_err(|err| err.to_string())?;
        print!("\nYou are now working with project:\n{project}");
        self.current = Some(project);
        Ok(())
    }

    fn update_project_details(&mut self) -> Result<(), String> {
        let current = match &self.current {
            Some(project) => project.record(),
            None => {
                println!("\nPlease select a project.");
                return Ok(());
            }
        };

        let project_name =
            self.read_string(&format!("Enter the project name [{}]", current.project_name));
        let estimated_hours = self.read_decimal(&format!(
            "Enter the estimated hours [{}]",
            shown(&current.estimated_hours)
        ))?;
        let actual_hours = self.read_decimal(&format!(
            "Enter the actual hours [{}]",
            shown(&current.actual_hours)
        ))?;
        let difficulty = self.read_difficulty(&format!(
            "Enter the project difficulty (1-5) [{}]",
            shown(&current.difficulty)
        ))?;
        let notes =
            self.read_string(&format!("Enter the project notes [{}]", shown(&current.notes)));

        let record = ProjectRecord {
            project_id: current.project_id,
            project_name: project_name.unwrap_or(current.project_name),
            estimated_hours: estimated_hours.or(current.estimated_hours),
            actual_hours: actual_hours.or(current.actual_hours),
            difficulty: difficulty.or(current.difficulty),
            notes: notes.or(current.notes),
        };
        record.validate().map_err(|err| err.to_string())?;

        self.service
            .modify_project_details(&record)
            .map_err(|err| err.to_string())?;
        let refreshed = self
            .service
            .fetch_project(record.project_id)
            .map_err(|err| err.to_string())?;
        self.current = Some(refreshed);
        Ok(())
    }

    fn delete_project(&mut self) -> Result<(), String> {
        self.print_project_list()?;
        let project_id = match self.read_i64("Enter the ID of the project to delete")? {
            Some(project_id) => project_id,
            None => return Ok(()),
        };

        self.service
            .delete_project(project_id)
            .map_err(|err| err.to_string())?;
        println!("Project {project_id} was deleted successfully.");

        if self
            .current
            .as_ref()
            .is_some_and(|project| project.project_id == project_id)
        {
            self.current = None;
        }
        Ok(())
    }

    /// Prompts once; blank input and end of input both come back as `None`.
    fn read_string(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}: ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    fn read_i64(&mut self, prompt: &str) -> Result<Option<i64>, String> {
        parse_optional_i64(self.read_string(prompt))
    }

    fn read_decimal(&mut self, prompt: &str) -> Result<Option<Decimal2>, String> {
        parse_optional_decimal(self.read_string(prompt))
    }

    fn read_difficulty(&mut self, prompt: &str) -> Result<Option<u8>, String> {
        parse_optional_u8(self.read_string(prompt))
    }
}

fn report_error(message: &str) {
    println!("\nError: {message}. Try again.");
}

fn shown<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}

fn parse_optional_i64(input: Option<String>) -> Result<Option<i64>, String> {
    match input {
        None => Ok(None),
        Some(text) => text
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("`{text}` is not a valid number")),
    }
}

fn parse_optional_u8(input: Option<String>) -> Result<Option<u8>, String> {
    match input {
        None => Ok(None),
        Some(text) => text
            .parse::<u8>()
            .map(Some)
            .map_err(|_| format!("`{text}` is not a valid number")),
    }
}

fn parse_optional_decimal(input: Option<String>) -> Result<Option<Decimal2>, String> {
    match input {
        None => Ok(None),
        Some(text) => Decimal2::parse(&text).map(Some).map_err(|err| err.to_string()),
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_parses_to_none() {
        assert_eq!(parse_optional_i64(None).unwrap(), None);
        assert_eq!(parse_optional_u8(None).unwrap(), None);
        assert_eq!(parse_optional_decimal(None).unwrap(), None);
    }

    #[test]
    fn numeric_inputs_parse() {
        assert_eq!(parse_optional_i64(Some("42".to_string())).unwrap(), Some(42));
        assert_eq!(parse_optional_u8(Some("5".to_string())).unwrap(), Some(5));
        assert_eq!(
            parse_optional_decimal(Some("12.5".to_string())).unwrap(),
            Some(Decimal2::parse("12.50").unwrap())
        );
    }

    #[test]
    fn junk_input_reports_the_raw_text() {
        let err = parse_optional_i64(Some("abc".to_string())).unwrap_err();
        assert!(err.contains("abc"));

        let err = parse_optional_decimal(Some("12.345".to_string())).unwrap_err();
        assert!(err.contains("12.345"));
    }

    #[test]
    fn shown_renders_dash_for_unset() {
        assert_eq!(shown(&Some(3u8)), "3");
        assert_eq!(shown::<u8>(&None), "-");
    }

    #[test]
    fn relative_paths_are_anchored_to_the_working_directory() {
        assert!(absolute_path(Path::new("logs")).is_absolute());
    }
}
