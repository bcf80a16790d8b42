use std::path::Path;

use serde::Serialize;
use stride_core::models::{Frequency, Habit};

use crate::cli::{FrequencyArg, HabitCommands};
use crate::commands::common::{
    format_date, open_service, print_json, resolve_record, short_id, sync_if_configured,
    sync_marker,
};
use crate::error::CliError;
use crate::profile::CliProfile;

pub async fn run(
    command: HabitCommands,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    match command {
        HabitCommands::Add { name, frequency } => add(&name, frequency, db_path, profile).await,
        HabitCommands::List { json } => list(json, db_path, profile).await,
        HabitCommands::Tick { id } => tick(&id, db_path, profile).await,
        HabitCommands::Rm { id } => remove(&id, db_path, profile).await,
    }
}

async fn add(
    name_parts: &[String],
    frequency: FrequencyArg,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    let name = name_parts.join(" ");
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyTitle);
    }

    let service = open_service(db_path, profile).await?;
    let owner = profile.owner_id.clone().ok_or(CliError::NotSignedIn)?;

    let mut habit = Habit::new(owner, name);
    habit.frequency = frequency.into();

    service.create(habit.clone()).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", habit.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct HabitListItem {
    id: String,
    name: String,
    frequency: Frequency,
    streak: u32,
    last_completed_on: Option<String>,
    synced: bool,
}

async fn list(json: bool, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let habits: Vec<Habit> = service.list().await?;

    if json {
        let items = habits
            .iter()
            .map(|habit| HabitListItem {
                id: habit.id.to_string(),
                name: habit.name.clone(),
                frequency: habit.frequency,
                streak: habit.streak,
                last_completed_on: habit.last_completed_on.map(format_date),
                synced: habit.synced,
            })
            .collect::<Vec<_>>();
        return print_json(&items);
    }

    for habit in &habits {
        let last = habit
            .last_completed_on
            .map(|ms| format!("last {}", format_date(ms)))
            .unwrap_or_else(|| "never completed".to_string());
        println!(
            "{}{} {:<30}  streak {:>3}  {last}",
            short_id(habit.id),
            sync_marker(habit.synced),
            habit.name,
            habit.streak,
        );
    }
    Ok(())
}

async fn tick(id: &str, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let mut habit: Habit = resolve_record(&service, id).await?;

    habit.tick();
    service.update(&mut habit).await?;
    sync_if_configured(&service, profile).await?;

    println!("{} streak {}", habit.id, habit.streak);
    Ok(())
}

async fn remove(id: &str, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let habit: Habit = resolve_record(&service, id).await?;

    service.delete::<Habit>(habit.id).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", habit.id);
    Ok(())
}
