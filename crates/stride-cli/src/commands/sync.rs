use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;
use crate::profile::CliProfile;

/// Drain the outbox now.
pub async fn run(db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    if !profile.has_remote() {
        return Err(CliError::Profile(
            "no remote backend configured; run `stride config init --api-url <URL> --token <TOKEN>`"
                .to_string(),
        ));
    }

    let service = open_service(db_path, profile).await?;
    let before = service.pending().await?;

    service.engine().set_online(true);
    service.sync().await?;

    let after = service.pending().await?;
    println!("Synced {} of {before} pending change(s)", before - after);
    if after > 0 {
        println!("{after} change(s) still queued; run `stride sync` again to retry");
    }
    Ok(())
}
