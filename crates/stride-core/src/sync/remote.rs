//! Remote backend client boundary.
//!
//! The backend is a per-table data store reachable over HTTP: upsert by id
//! and delete by id, both idempotent on the remote side. Authorization is
//! enforced there; a rejection comes back as an ordinary API error.

use std::future::Future;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::RemoteConfig;
use crate::models::{EntitySnapshot, RecordId, Table};
use crate::util::{compact_text, is_http_url, normalize_text_option};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {0}")]
    Api(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Remote backend unavailable")]
    Unavailable,
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// The remote data store consumed by the sync engine.
///
/// Both operations must be idempotent: retries may re-send an
/// already-applied payload when the success acknowledgment itself was lost.
/// Futures are `Send` so drains can run on spawned tasks.
pub trait RemoteBackend: Send + Sync {
    /// Insert-or-replace the record in the named remote table
    fn upsert(
        &self,
        table: Table,
        snapshot: &EntitySnapshot,
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Delete by id; deleting an absent id is not an error
    fn delete_by_id(
        &self,
        table: Table,
        id: RecordId,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
}

/// reqwest-backed implementation of [`RemoteBackend`]
#[derive(Clone)]
pub struct HttpRemoteBackend {
    base_url: String,
    auth_token: String,
    client: reqwest::Client,
}

impl HttpRemoteBackend {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> RemoteResult<Self> {
        let base_url = normalize_endpoint(base_url.into())?;
        let auth_token = normalize_text_option(Some(auth_token.into())).ok_or_else(|| {
            RemoteError::InvalidConfiguration("auth token must not be empty".to_string())
        })?;

        Ok(Self {
            base_url,
            auth_token,
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Build a client from a [`RemoteConfig`].
    ///
    /// `Ok(None)` when no remote is configured at all; an error when the
    /// configuration is present but incomplete or invalid.
    pub fn from_config(config: &RemoteConfig) -> RemoteResult<Option<Self>> {
        let base_url = normalize_text_option(config.base_url.clone());
        let auth_token = normalize_text_option(config.auth_token.clone());
        match (base_url, auth_token) {
            (Some(url), Some(token)) => Ok(Some(Self::new(url, token)?)),
            (None, None) => Ok(None),
            (Some(_), None) => Err(RemoteError::InvalidConfiguration(
                "auth token is required alongside the base URL".to_string(),
            )),
            (None, Some(_)) => Err(RemoteError::InvalidConfiguration(
                "base URL is required alongside the auth token".to_string(),
            )),
        }
    }

    fn record_url(&self, table: Table, id: RecordId) -> String {
        format!("{}/{}/{}", self.base_url, table, id)
    }
}

impl RemoteBackend for HttpRemoteBackend {
    async fn upsert(&self, table: Table, snapshot: &EntitySnapshot) -> RemoteResult<()> {
        let body = snapshot
            .record_json()
            .map_err(|error| RemoteError::InvalidPayload(error.to_string()))?;

        let response = self
            .client
            .put(self.record_url(table, snapshot.record_id()))
            .bearer_auth(&self.auth_token)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(parse_api_error(status, &body)));
        }
        Ok(())
    }

    async fn delete_by_id(&self, table: Table, id: RecordId) -> RemoteResult<()> {
        let response = self
            .client
            .delete(self.record_url(table, id))
            .bearer_auth(&self.auth_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        // Idempotent delete: the record may already be gone remotely
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(parse_api_error(status, &body)));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<RemoteErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> RemoteResult<String> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        RemoteError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(RemoteError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn normalize_endpoint_rejects_invalid_values() {
        assert!(normalize_endpoint(String::new()).is_err());
        assert!(normalize_endpoint("api.example.com".to_string()).is_err());
        assert_eq!(
            normalize_endpoint("https://api.example.com/v1/".to_string()).unwrap(),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn new_rejects_empty_token() {
        assert!(HttpRemoteBackend::new("https://api.example.com", "  ").is_err());
    }

    #[test]
    fn from_config_distinguishes_unset_from_incomplete() {
        assert!(HttpRemoteBackend::from_config(&RemoteConfig::default())
            .unwrap()
            .is_none());

        let full = RemoteConfig::new("https://api.example.com/", "token");
        let backend = HttpRemoteBackend::from_config(&full).unwrap().unwrap();
        assert_eq!(backend.base_url, "https://api.example.com");

        let missing_token = RemoteConfig {
            base_url: Some("https://api.example.com".to_string()),
            auth_token: None,
        };
        assert!(HttpRemoteBackend::from_config(&missing_token).is_err());

        let missing_url = RemoteConfig {
            base_url: Some("   ".to_string()),
            auth_token: Some("token".to_string()),
        };
        assert!(HttpRemoteBackend::from_config(&missing_url).is_err());
    }

    #[test]
    fn record_url_joins_table_and_id() {
        let backend = HttpRemoteBackend::new("https://api.example.com/v1/", "token").unwrap();
        let task = Task::new("owner-1", "t");
        assert_eq!(
            backend.record_url(Table::Tasks, task.id),
            format!("https://api.example.com/v1/tasks/{}", task.id)
        );
    }

    #[test]
    fn parse_api_error_prefers_message_field() {
        let parsed = parse_api_error(
            StatusCode::FORBIDDEN,
            r#"{"message": "owner mismatch"}"#,
        );
        assert_eq!(parsed, "owner mismatch (403)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_then_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down (502)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }
}
