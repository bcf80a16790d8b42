use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use stride_core::models::{Priority, Task};

use crate::cli::{PriorityArg, TaskCommands};
use crate::commands::common::{
    format_date, format_relative_time, open_service, parse_date, print_json, resolve_record,
    short_id, sync_if_configured, sync_marker,
};
use crate::error::CliError;
use crate::profile::CliProfile;

pub async fn run(
    command: TaskCommands,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    match command {
        TaskCommands::Add {
            title,
            notes,
            due,
            priority,
        } => add(&title, notes, due.as_deref(), priority, db_path, profile).await,
        TaskCommands::List { all, json } => list(all, json, db_path, profile).await,
        TaskCommands::Done { id } => done(&id, db_path, profile).await,
        TaskCommands::Rm { id } => remove(&id, db_path, profile).await,
    }
}

async fn add(
    title_parts: &[String],
    notes: Option<String>,
    due: Option<&str>,
    priority: PriorityArg,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    let title = title_parts.join(" ");
    let title = title.trim();
    if title.is_empty() {
        return Err(CliError::EmptyTitle);
    }

    let service = open_service(db_path, profile).await?;
    let owner = profile.owner_id.clone().ok_or(CliError::NotSignedIn)?;

    let mut task = Task::new(owner, title);
    task.notes = notes;
    task.due_date = due.map(parse_date).transpose()?;
    task.priority = priority.into();

    service.create(task.clone()).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", task.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct TaskListItem {
    id: String,
    title: String,
    priority: Priority,
    due_date: Option<String>,
    completed: bool,
    synced: bool,
    updated_at: i64,
}

async fn list(all: bool, json: bool, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let tasks: Vec<Task> = if all {
        service.list().await?
    } else {
        service.query(|task: &Task| !task.completed).await?
    };

    if json {
        let items = tasks
            .iter()
            .map(|task| TaskListItem {
                id: task.id.to_string(),
                title: task.title.clone(),
                priority: task.priority,
                due_date: task.due_date.map(format_date),
                completed: task.completed,
                synced: task.synced,
                updated_at: task.updated_at,
            })
            .collect::<Vec<_>>();
        return print_json(&items);
    }

    let now_ms = Utc::now().timestamp_millis();
    for task in &tasks {
        let state = if task.completed { "x" } else { " " };
        let due = task
            .due_date
            .map(|ms| format!("  due {}", format_date(ms)))
            .unwrap_or_default();
        println!(
            "{}{} [{state}] {:<40}{due}  {}",
            short_id(task.id),
            sync_marker(task.synced),
            task.title,
            format_relative_time(task.updated_at, now_ms)
        );
    }
    Ok(())
}

async fn done(id: &str, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let mut task: Task = resolve_record(&service, id).await?;

    task.completed = true;
    service.update(&mut task).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", task.id);
    Ok(())
}

async fn remove(id: &str, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let task: Task = resolve_record(&service, id).await?;

    service.delete::<Task>(task.id).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", task.id);
    Ok(())
}
