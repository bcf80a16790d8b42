//! End-to-end tests for the CLI plumbing against a temporary database.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use stride_core::models::Task;
use stride_core::SyncState;

use crate::commands::common::{open_service, resolve_record, short_id};
use crate::error::CliError;
use crate::profile::CliProfile;

fn local_profile() -> CliProfile {
    CliProfile {
        version: 1,
        api_base_url: None,
        auth_token: None,
        owner_id: Some("owner-1".to_string()),
    }
}

fn test_db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("stride").join("stride.db")
}

#[tokio::test(flavor = "multi_thread")]
async fn open_service_creates_parent_dirs_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = test_db_path(&dir);
    let profile = local_profile();

    let task = {
        let service = open_service(&db_path, &profile).await.unwrap();
        let task = Task::new("owner-1", "persisted");
        service.create(task.clone()).await.unwrap();
        task
    };

    let service = open_service(&db_path, &profile).await.unwrap();
    let tasks: Vec<Task> = service.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(service.pending().await.unwrap(), 1);
    assert_eq!(service.sync_state().await.unwrap(), SyncState::Offline);
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_record_by_exact_id_and_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let profile = local_profile();
    let service = open_service(&test_db_path(&dir), &profile).await.unwrap();

    let task = Task::new("owner-1", "only one");
    service.create(task.clone()).await.unwrap();

    let by_exact: Task = resolve_record(&service, &task.id.as_str()).await.unwrap();
    assert_eq!(by_exact.id, task.id);

    let by_prefix: Task = resolve_record(&service, &short_id(task.id)).await.unwrap();
    assert_eq!(by_prefix.id, task.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_record_rejects_ambiguous_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    let profile = local_profile();
    let service = open_service(&test_db_path(&dir), &profile).await.unwrap();

    let first = Task::new("owner-1", "first");
    let second = Task::new("owner-1", "second");
    service.create(first.clone()).await.unwrap();
    service.create(second.clone()).await.unwrap();

    // UUID v7 ids minted back to back share a timestamp prefix
    let shared: String = first
        .id
        .as_str()
        .chars()
        .zip(second.id.as_str().chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect();
    assert!(!shared.is_empty());

    let error = resolve_record::<Task>(&service, &shared).await.unwrap_err();
    assert!(matches!(error, CliError::AmbiguousRecordId(_)));

    let error = resolve_record::<Task>(&service, "ffffffff")
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::RecordNotFound(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn open_service_rejects_incomplete_remote_config() {
    let dir = tempfile::tempdir().unwrap();
    let profile = CliProfile {
        api_base_url: Some("https://api.example.com".to_string()),
        ..local_profile()
    };

    let error = open_service(&test_db_path(&dir), &profile).await.unwrap_err();
    assert!(matches!(error, CliError::Profile(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_out_profile_cannot_write() {
    let dir = tempfile::tempdir().unwrap();
    let profile = CliProfile::default();
    let service = open_service(&test_db_path(&dir), &profile).await.unwrap();

    let result = service.create(Task::new("owner-1", "nope")).await;
    assert!(matches!(
        result,
        Err(stride_core::Error::InvalidInput(_))
    ));
}
