mod app;
mod domain;
mod error;
mod logging;
mod persistence;
mod repository;

use anyhow::{bail, Context, Result};
use app::AppState;
use clap::{Args, Parser, Subcommand};
use domain::{count_tasks, due, task_details, task_line, SortOption, TaskFields, TaskPriority, TaskStatus};
use error::BoardError;
use persistence::{ensure_dir, get_board_dir, init_local_board};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Projects and tasks with due dates, kept as JSON files", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .taskboard, then ~/.taskboard
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Log debug output from taskboard to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskboard directory in the current directory
    Init,
    /// Create, rename, delete and select projects
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },
    /// Work with the tasks of a project
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Print the time left until a due date
    Remaining { date: String },
    /// Move a date ("today" or YYYY-MM-DD) by a number of days
    Shift {
        date: String,
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// List projects with task counts; the selected one is starred
    List,
    /// Create a project and select it
    Create { name: String },
    Rename { name: String, new_name: String },
    /// Delete a project and every task in it
    Delete {
        name: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    Select { name: String },
}

#[derive(Args)]
struct ProjectArg {
    /// Project to use instead of the selected one
    #[arg(short, long)]
    project: Option<String>,
}

/// Task fields settable from the command line
#[derive(Args)]
struct FieldArgs {
    #[arg(short, long)]
    description: Option<String>,
    #[arg(short, long, value_parser = parse_status)]
    status: Option<TaskStatus>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<TaskPriority>,
    #[arg(short, long)]
    category: Option<String>,
    #[arg(short, long)]
    assignee: Option<String>,
    /// Due date, e.g. 2024-05-31
    #[arg(long)]
    due: Option<String>,
}

impl FieldArgs {
    fn apply_to(self, fields: &mut TaskFields) {
        if let Some(description) = self.description {
            fields.description = description;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(priority) = self.priority {
            fields.priority = priority;
        }
        if let Some(category) = self.category {
            fields.category = category;
        }
        if let Some(assignee) = self.assignee {
            fields.assignee = assignee;
        }
        if let Some(due) = self.due {
            fields.due_date = due;
        }
    }
}

#[derive(Subcommand)]
enum TaskCommand {
    /// List tasks, sorted by the remembered sort order
    List {
        #[command(flatten)]
        target: ProjectArg,
        /// none, assignee, priority, status or remaining
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortOption>,
        #[arg(long, conflicts_with = "asc")]
        desc: bool,
        #[arg(long)]
        asc: bool,
        /// Include archived tasks
        #[arg(long)]
        archived: bool,
    },
    /// Show every field of one task
    Show {
        /// Title or id prefix
        task: String,
        #[command(flatten)]
        target: ProjectArg,
    },
    Add {
        title: String,
        #[command(flatten)]
        target: ProjectArg,
        #[command(flatten)]
        fields: FieldArgs,
        /// Creation stamp, defaults to now
        #[arg(long)]
        created: Option<String>,
    },
    Edit {
        /// Title or id prefix
        task: String,
        #[command(flatten)]
        target: ProjectArg,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Delete {
        task: String,
        #[command(flatten)]
        target: ProjectArg,
    },
    /// Hide a task from listings, or bring it back with --undo
    Archive {
        task: String,
        #[command(flatten)]
        target: ProjectArg,
        #[arg(long)]
        undo: bool,
    },
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    TaskStatus::from_tag(value).ok_or_else(|| {
        let allowed: Vec<&str> = TaskStatus::all().iter().map(|s| s.to_tag()).collect();
        format!("unknown status '{}', expected one of: {}", value, allowed.join(", "))
    })
}

fn parse_priority(value: &str) -> Result<TaskPriority, String> {
    TaskPriority::from_tag(value).ok_or_else(|| {
        let allowed: Vec<&str> = TaskPriority::all().iter().map(|p| p.to_tag()).collect();
        format!("unknown priority '{}', expected one of: {}", value, allowed.join(", "))
    })
}

fn parse_sort(value: &str) -> Result<SortOption, String> {
    SortOption::from_tag(value).ok_or_else(|| {
        format!(
            "unknown sort '{}', expected one of: none, assignee, priority, status, remaining",
            value
        )
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Init => {
            let board_dir = match cli.dir {
                Some(dir) => {
                    ensure_dir(&dir)?;
                    dir
                }
                None => init_local_board(&std::env::current_dir()?)?,
            };
            println!("Initialized taskboard directory: {}", board_dir.display());
            println!();
            println!("Run 'taskboard project create <name>' to add a first project.");
        }
        Commands::Remaining { date } => {
            println!("{}", due::remaining_today(&date));
        }
        Commands::Shift { date, days } => {
            let date = if date.eq_ignore_ascii_case("today") {
                due::today_string()
            } else {
                date
            };
            let shifted = due::shift_date(&date, days, due::today())
                .with_context(|| format!("Shifting '{}' by {} days leaves the supported date range", date, days))?;
            println!("{}", shifted);
        }
        Commands::Project { action } => {
            let mut app = open_app(cli.dir)?;
            run_project(&mut app, action)?;
            app.save()?;
        }
        Commands::Task { action } => {
            let mut app = open_app(cli.dir)?;
            run_task(&mut app, action)?;
            app.save()?;
        }
    }

    Ok(())
}

fn open_app(dir: Option<PathBuf>) -> Result<AppState> {
    let board_dir = match dir {
        Some(dir) => dir,
        None => get_board_dir()?,
    };
    log::debug!("using board directory {}", board_dir.display());
    AppState::open(&board_dir)
}

fn run_project(app: &mut AppState, action: ProjectCommand) -> Result<()> {
    match action {
        ProjectCommand::List => {
            if app.repo.projects().is_empty() {
                println!("No projects yet. Create one with 'taskboard project create <name>'.");
                return Ok(());
            }
            let today = due::today();
            let selected = app.repo.selected_index();
            for (index, project) in app.repo.projects().iter().enumerate() {
                let counts = count_tasks(project, today);
                let marker = if Some(index) == selected { '*' } else { ' ' };
                println!(
                    "{} {}  [{} todo, {} in progress, {} done, {} overdue, {} archived]",
                    marker,
                    project.name,
                    counts.todo,
                    counts.in_progress,
                    counts.done,
                    counts.overdue,
                    counts.archived
                );
            }
        }
        ProjectCommand::Create { name } => {
            let project = app.repo.create(&name)?;
            println!("Created project '{}'", project.name);
        }
        ProjectCommand::Rename { name, new_name } => {
            app.repo.rename(&name, &new_name)?;
            println!("Renamed project '{}' to '{}'", name, new_name);
        }
        ProjectCommand::Delete { name, yes } => {
            if !yes {
                let project = app
                    .repo
                    .get(&name)
                    .ok_or_else(|| BoardError::ProjectNotFound(name.clone()))?;
                bail!(
                    "Deleting '{}' removes its {} tasks. Re-run with --yes to confirm.",
                    project.name,
                    project.tasks.len()
                );
            }
            let project = app.repo.delete(&name)?;
            println!("Deleted project '{}' and {} tasks", project.name, project.tasks.len());
        }
        ProjectCommand::Select { name } => {
            app.select_project(&name)?;
            println!("Selected project '{}'", app.project_name(None)?);
        }
    }
    Ok(())
}

fn run_task(app: &mut AppState, action: TaskCommand) -> Result<()> {
    match action {
        TaskCommand::List {
            target,
            sort,
            desc,
            asc,
            archived,
        } => {
            let direction = if desc {
                Some(false)
            } else if asc {
                Some(true)
            } else {
                None
            };
            app.set_sort(sort, direction);

            let name = {
                let mut tasks = app.tasks(target.project.as_deref())?;
                let refreshed = tasks.refresh_remaining()?;
                log::debug!("refreshed remaining time of {}/{} tasks", refreshed, tasks.list().len());
                tasks.project().name.clone()
            };

            let project = app
                .repo
                .get(&name)
                .ok_or_else(|| BoardError::ProjectNotFound(name.clone()))?;
            let tasks = app.visible_tasks(project, archived);
            let direction = if app.metadata.sort_ascending { "ascending" } else { "descending" };
            println!(
                "{} - sorted by {} ({})",
                project.name,
                app.metadata.sort_option.name(),
                direction
            );
            if tasks.is_empty() {
                println!("  no tasks");
            }
            for task in tasks {
                println!("  {}", task_line(task));
            }
        }
        TaskCommand::Show { task, target } => {
            let tasks = app.tasks(target.project.as_deref())?;
            let id = tasks.resolve(&task)?;
            let found = tasks.get(id).ok_or_else(|| BoardError::TaskNotFound(task.clone()))?;
            print!("{}", task_details(found));
        }
        TaskCommand::Add {
            title,
            target,
            fields,
            created,
        } => {
            let mut task_fields = TaskFields::titled(title);
            task_fields.created_date = created;
            fields.apply_to(&mut task_fields);

            let mut tasks = app.tasks(target.project.as_deref())?;
            let task = tasks.create(task_fields)?;
            println!("Added '{}' ({})", task.title, task.id);
        }
        TaskCommand::Edit {
            task,
            target,
            title,
            fields,
        } => {
            let mut tasks = app.tasks(target.project.as_deref())?;
            let id = tasks.resolve(&task)?;
            let mut task_fields = tasks
                .get(id)
                .map(|t| t.fields())
                .ok_or_else(|| BoardError::TaskNotFound(task.clone()))?;
            if let Some(title) = title {
                task_fields.title = title;
            }
            fields.apply_to(&mut task_fields);

            tasks.update(id, task_fields)?;
            println!("Updated '{}'", task);
        }
        TaskCommand::Delete { task, target } => {
            let mut tasks = app.tasks(target.project.as_deref())?;
            let id = tasks.resolve(&task)?;
            let removed = tasks.delete(id)?;
            println!("Deleted '{}' from '{}'", removed.title, tasks.project().name);
        }
        TaskCommand::Archive { task, target, undo } => {
            let mut tasks = app.tasks(target.project.as_deref())?;
            let id = tasks.resolve(&task)?;
            tasks.set_archived(id, !undo)?;
            if undo {
                println!("Restored '{}'", task);
            } else {
                println!("Archived '{}'", task);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_task_add() {
        let cli = Cli::try_parse_from([
            "taskboard", "task", "add", "Fix jump", "--priority", "high", "--status", "in progress",
            "--due", "2024-05-31", "-p", "Game",
        ])
        .unwrap();

        match cli.command {
            Commands::Task {
                action: TaskCommand::Add { title, target, fields, .. },
            } => {
                assert_eq!(title, "Fix jump");
                assert_eq!(target.project.as_deref(), Some("Game"));
                assert_eq!(fields.priority, Some(TaskPriority::High));
                assert_eq!(fields.status, Some(TaskStatus::InProgress));
                assert_eq!(fields.due.as_deref(), Some("2024-05-31"));
            }
            _ => panic!("expected task add"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["taskboard", "task", "add", "X", "--status", "blocked"]).is_err());
        assert!(Cli::try_parse_from(["taskboard", "task", "list", "--desc", "--asc"]).is_err());
    }

    #[test]
    fn test_cli_shift_accepts_negative_days() {
        let cli = Cli::try_parse_from(["taskboard", "shift", "2024-05-10", "-3"]).unwrap();
        match cli.command {
            Commands::Shift { date, days } => {
                assert_eq!(date, "2024-05-10");
                assert_eq!(days, -3);
            }
            _ => panic!("expected shift"),
        }
    }

    #[test]
    fn test_field_args_only_override_given_values() {
        let mut fields = TaskFields::titled("Keep");
        fields.assignee = "sam".to_string();
        fields.category = "ui".to_string();

        FieldArgs {
            description: None,
            status: Some(TaskStatus::Done),
            priority: None,
            category: Some(String::new()),
            assignee: None,
            due: None,
        }
        .apply_to(&mut fields);

        assert_eq!(fields.title, "Keep");
        assert_eq!(fields.assignee, "sam");
        assert_eq!(fields.category, "");
        assert_eq!(fields.status, TaskStatus::Done);
    }
}
