//! Shared plumbing for the command handlers.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use stride_core::db::Database;
use stride_core::models::{Entity, EntitySnapshot, RecordId, Table};
use stride_core::services::AppService;
use stride_core::auth::StaticIdentity;
use stride_core::sync::{HttpRemoteBackend, RemoteBackend, RemoteError, RemoteResult};

use crate::error::CliError;
use crate::profile::CliProfile;

/// Remote backend as configured by the CLI profile.
///
/// With no remote configured every replay fails as unavailable, which keeps
/// entries queued (and eventually evicted) instead of silently dropped; the
/// CLI never flips the engine online in that case, so in practice the queue
/// just waits.
pub enum CliBackend {
    Http(HttpRemoteBackend),
    Offline,
}

impl RemoteBackend for CliBackend {
    async fn upsert(&self, table: Table, snapshot: &EntitySnapshot) -> RemoteResult<()> {
        match self {
            Self::Http(backend) => backend.upsert(table, snapshot).await,
            Self::Offline => Err(RemoteError::Unavailable),
        }
    }

    async fn delete_by_id(&self, table: Table, id: RecordId) -> RemoteResult<()> {
        match self {
            Self::Http(backend) => backend.delete_by_id(table, id).await,
            Self::Offline => Err(RemoteError::Unavailable),
        }
    }
}

pub type CliService = AppService<CliBackend, StaticIdentity>;

/// Open the local database and assemble the service from the profile.
///
/// The engine starts offline; mutating commands go online explicitly via
/// [`sync_if_configured`] so a one-shot process never races a background
/// drain at exit.
pub async fn open_service(db_path: &Path, profile: &CliProfile) -> Result<CliService, CliError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::open(db_path).await?;

    let identity = profile.owner_id.as_ref().map_or_else(StaticIdentity::signed_out, |owner| {
        StaticIdentity::new(owner, profile.auth_token.clone().unwrap_or_default())
    });

    let remote = profile.remote_config();
    let backend = HttpRemoteBackend::from_config(&remote)
        .map_err(|error| CliError::Profile(error.to_string()))?
        .map_or(CliBackend::Offline, |http| {
            tracing::debug!("Remote backend configured");
            CliBackend::Http(http)
        });

    Ok(AppService::new(
        std::sync::Arc::new(tokio::sync::Mutex::new(db)),
        backend,
        identity,
        false,
    ))
}

/// Drain the outbox now when a remote backend is configured
pub async fn sync_if_configured(
    service: &CliService,
    profile: &CliProfile,
) -> Result<(), CliError> {
    if !profile.has_remote() {
        return Ok(());
    }
    service.engine().set_online(true);
    service.sync().await?;
    Ok(())
}

/// First 13 characters of the id, enough to disambiguate in practice
pub fn short_id(id: RecordId) -> String {
    id.as_str().chars().take(13).collect()
}

/// Resolve an exact id or unique id prefix to the owner's record
pub async fn resolve_record<E>(service: &CliService, query: &str) -> Result<E, CliError>
where
    E: Entity,
{
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CliError::RecordNotFound(query.to_string()));
    }

    if let Ok(id) = trimmed.parse::<RecordId>() {
        if let Some(record) = service.get::<E>(id).await? {
            return Ok(record);
        }
    }

    let mut matches: Vec<E> = service.list().await?;
    matches.retain(|record| record.id().as_str().starts_with(trimmed));

    match matches.len() {
        0 => Err(CliError::RecordNotFound(trimmed.to_string())),
        1 => Ok(matches.remove(0)),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|record| short_id(record.id()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousRecordId(format!(
                "ID prefix '{trimmed}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn print_json<T: Serialize>(items: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(items)?);
    Ok(())
}

/// Parse a decimal money amount into integer cents
pub fn parse_amount(raw: &str) -> Result<i64, CliError> {
    let trimmed = raw.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    let whole: i64 = whole
        .parse()
        .map_err(|_| CliError::InvalidAmount(raw.to_string()))?;
    if whole < 0 || fraction.len() > 2 || fraction.chars().any(|c| !c.is_ascii_digit()) {
        return Err(CliError::InvalidAmount(raw.to_string()));
    }

    let cents = match fraction.len() {
        0 => 0,
        1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
        _ => fraction
            .parse::<i64>()
            .map_err(|_| CliError::InvalidAmount(raw.to_string()))?,
    };
    Ok(whole * 100 + cents)
}

pub fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Parse a `YYYY-MM-DD` day into Unix ms at UTC midnight
pub fn parse_date(raw: &str) -> Result<i64, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
        .ok_or_else(|| CliError::InvalidDate(raw.to_string()))
}

pub fn format_date(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|datetime| datetime.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}

/// Marker shown next to records the remote backend has not acknowledged yet
pub const fn sync_marker(synced: bool) -> char {
    if synced {
        ' '
    } else {
        '*'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_amount_handles_whole_and_fractional() {
        assert_eq!(parse_amount("12").unwrap(), 1200);
        assert_eq!(parse_amount("12.5").unwrap(), 1250);
        assert_eq!(parse_amount("12.50").unwrap(), 1250);
        assert_eq!(parse_amount("0.07").unwrap(), 7);
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        for raw in ["", "abc", "12.505", "-3", "1.2.3", "1.x"] {
            assert!(parse_amount(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn format_amount_pads_cents() {
        assert_eq!(format_amount(1250), "12.50");
        assert_eq!(format_amount(7), "0.07");
    }

    #[test]
    fn date_roundtrips_at_utc_midnight() {
        let ms = parse_date("2026-08-23").unwrap();
        assert_eq!(format_date(ms), "2026-08-23");
        assert!(parse_date("23-08-2026").is_err());
    }

    #[test]
    fn relative_time_units() {
        let now = 10_000_000_000;
        assert_eq!(format_relative_time(now - 30_000, now), "just now");
        assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
        assert_eq!(format_relative_time(now - 3 * 60 * 60_000, now), "3h ago");
    }
}
