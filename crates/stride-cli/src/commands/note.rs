use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use stride_core::models::Note;

use crate::cli::NoteCommands;
use crate::commands::common::{
    format_relative_time, open_service, print_json, resolve_record, short_id, sync_if_configured,
    sync_marker,
};
use crate::error::CliError;
use crate::profile::CliProfile;

pub async fn run(
    command: NoteCommands,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    match command {
        NoteCommands::Add { title, content } => add(&title, &content, db_path, profile).await,
        NoteCommands::List { tag, json } => list(tag.as_deref(), json, db_path, profile).await,
        NoteCommands::Rm { id } => remove(&id, db_path, profile).await,
    }
}

async fn add(
    title: &str,
    content_parts: &[String],
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CliError::EmptyTitle);
    }
    let content = content_parts.join(" ");
    let content = if content.trim().is_empty() {
        title
    } else {
        content.trim()
    };

    let service = open_service(db_path, profile).await?;
    let owner = profile.owner_id.clone().ok_or(CliError::NotSignedIn)?;

    let note = Note::new(owner, title, content);
    service.create(note.clone()).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", note.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct NoteListItem {
    id: String,
    title: String,
    content: String,
    tags: Vec<String>,
    synced: bool,
    updated_at: i64,
}

async fn list(
    tag: Option<&str>,
    json: bool,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let notes: Vec<Note> = match tag {
        Some(tag) => {
            let wanted = tag.trim_start_matches('#').to_lowercase();
            service
                .query(move |note: &Note| note.tags().contains(&wanted))
                .await?
        }
        None => service.list().await?,
    };

    if json {
        let items = notes
            .iter()
            .map(|note| NoteListItem {
                id: note.id.to_string(),
                title: note.title.clone(),
                content: note.content.clone(),
                tags: note.tags(),
                synced: note.synced,
                updated_at: note.updated_at,
            })
            .collect::<Vec<_>>();
        return print_json(&items);
    }

    let now_ms = Utc::now().timestamp_millis();
    for note in &notes {
        let tags = note
            .tags()
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}{} {:<30}  {:<10}  {tags}",
            short_id(note.id),
            sync_marker(note.synced),
            note.title,
            format_relative_time(note.updated_at, now_ms)
        );
    }
    Ok(())
}

async fn remove(id: &str, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let note: Note = resolve_record(&service, id).await?;

    service.delete::<Note>(note.id).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", note.id);
    Ok(())
}
