//! Persistent CLI profile configuration.
//!
//! A single JSON profile in the user config dir holds the remote backend
//! coordinates and the owner id. The token is provisioned out of band (there
//! is no interactive login flow); environment variables override the file.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stride_core::config::RemoteConfig;
use stride_core::util::normalize_text_option;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default = "default_profile_version")]
    pub version: u32,
    /// Remote backend base URL (e.g. `https://api.stride.app/v1`)
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Bearer token for the remote backend
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Opaque owner id of the signed-in user
    #[serde(default)]
    pub owner_id: Option<String>,
}

const fn default_profile_version() -> u32 {
    1
}

impl Default for CliProfile {
    fn default() -> Self {
        Self {
            version: default_profile_version(),
            api_base_url: None,
            auth_token: None,
            owner_id: None,
        }
    }
}

pub fn default_profile_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stride")
        .join(CONFIG_FILE_NAME)
}

impl CliProfile {
    /// Load the profile file and apply environment overrides
    pub fn load() -> Result<Self, CliError> {
        let mut profile = Self::load_from_path(&default_profile_path())?;
        profile.apply_env_overrides();
        Ok(profile)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Profile(format!("failed to read {}: {error}", path.display()))
        })?;
        let mut profile = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Profile(format!("failed to parse {}: {error}", path.display()))
        })?;
        profile.normalize();
        Ok(profile)
    }

    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = default_profile_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Profile(format!(
                    "failed to create {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Profile(format!("failed to write {}: {error}", path.display()))
        })
    }

    /// Remote backend coordinates as core configuration
    #[must_use]
    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.api_base_url.clone(),
            auth_token: self.auth_token.clone(),
        }
    }

    /// True when a usable backend URL and token are present
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote_config().is_configured()
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = normalize_text_option(env::var("STRIDE_API_URL").ok()) {
            self.api_base_url = Some(url);
        }
        if let Some(token) = normalize_text_option(env::var("STRIDE_AUTH_TOKEN").ok()) {
            self.auth_token = Some(token);
        }
        if let Some(owner) = normalize_text_option(env::var("STRIDE_OWNER_ID").ok()) {
            self.owner_id = Some(owner);
        }
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.take());
        self.auth_token = normalize_text_option(self.auth_token.take());
        self.owner_id = normalize_text_option(self.owner_id.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let profile = CliProfile::load_from_path(&dir.path().join("none.json")).unwrap();
        assert_eq!(profile, CliProfile::default());
        assert!(!profile.has_remote());
    }

    #[test]
    fn profile_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stride").join("cli-config.json");

        let profile = CliProfile {
            version: 1,
            api_base_url: Some("https://api.example.com/v1".to_string()),
            auth_token: Some("token".to_string()),
            owner_id: Some("owner-1".to_string()),
        };
        profile.save_to_path(&path).unwrap();

        let loaded = CliProfile::load_from_path(&path).unwrap();
        assert_eq!(loaded, profile);
        assert!(loaded.has_remote());
    }

    #[test]
    fn default_matches_serde_defaults() {
        assert_eq!(CliProfile::default().version, 1);
        let parsed: CliProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, CliProfile::default());
    }

    #[test]
    fn remote_config_mirrors_profile_fields() {
        let profile = CliProfile {
            api_base_url: Some("https://api.example.com/".to_string()),
            auth_token: Some("token".to_string()),
            ..CliProfile::default()
        };
        let config = profile.remote_config();
        assert!(config.is_configured());
        assert!(profile.has_remote());
        assert!(!CliProfile::default().has_remote());
    }

    #[test]
    fn normalize_drops_blank_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli-config.json");

        let profile = CliProfile {
            version: 1,
            api_base_url: Some("  ".to_string()),
            auth_token: None,
            owner_id: Some(" owner-1 ".to_string()),
        };
        profile.save_to_path(&path).unwrap();

        let loaded = CliProfile::load_from_path(&path).unwrap();
        assert_eq!(loaded.api_base_url, None);
        assert_eq!(loaded.owner_id, Some("owner-1".to_string()));
    }
}
