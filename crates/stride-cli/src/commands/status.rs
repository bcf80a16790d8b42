use std::path::Path;

use serde::Serialize;
use stride_core::SyncState;

use crate::commands::common::{open_service, print_json};
use crate::error::CliError;
use crate::profile::CliProfile;

#[derive(Debug, Serialize)]
struct StatusReport {
    state: String,
    pending: usize,
    remote_configured: bool,
    owner_id: Option<String>,
}

/// Print the status surface: connectivity state and outbox depth.
///
/// A one-shot CLI process has no live connectivity signal, so the state
/// reflects the profile: a configured remote reads as online.
pub async fn run(json: bool, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    if profile.has_remote() {
        service.engine().set_online(true);
    }

    let state = service.sync_state().await?;
    let pending = service.pending().await?;

    if json {
        return print_json(&StatusReport {
            state: state.to_string(),
            pending,
            remote_configured: profile.has_remote(),
            owner_id: profile.owner_id.clone(),
        });
    }

    println!("{state}");
    if pending > 0 && state != SyncState::Offline {
        println!("{pending} change(s) queued");
    } else if pending > 0 {
        println!("{pending} change(s) queued; will sync when a remote is configured");
    }
    Ok(())
}
