//! Remote backend configuration.

use crate::util::{is_http_url, normalize_text_option};

/// Configuration for the remote data backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Backend base URL (e.g. `https://api.stride.app/v1`)
    pub base_url: Option<String>,
    /// Bearer token for authenticated calls
    pub auth_token: Option<String>,
}

impl RemoteConfig {
    /// Create a new remote configuration
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            auth_token: Some(auth_token.into()),
        }
    }

    /// Check if the remote backend is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.normalized_base_url().is_some()
            && normalize_text_option(self.auth_token.clone()).is_some()
    }

    /// Trimmed base URL without a trailing slash, when valid
    #[must_use]
    pub fn normalized_base_url(&self) -> Option<String> {
        let url = normalize_text_option(self.base_url.clone())?;
        if is_http_url(&url) {
            Some(url.trim_end_matches('/').to_string())
        } else {
            None
        }
    }
}
