//! Identity provider boundary.
//!
//! Stride never authenticates users itself; it consumes an opaque owner id
//! and bearer token issued elsewhere. When no identity is present, local
//! writes keep working and the sync engine simply refuses to drain.

use std::fmt;

/// Source of the current user's identity
pub trait IdentityProvider: Send + Sync {
    /// Opaque subject id of the signed-in user, or `None` when signed out
    fn current_owner_id(&self) -> Option<String>;

    /// Bearer credential for remote calls, or `None` when signed out
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed identity resolved once at startup (CLI profiles, tests)
#[derive(Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    owner_id: Option<String>,
    token: Option<String>,
}

impl StaticIdentity {
    #[must_use]
    pub fn new(owner_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            token: Some(token.into()),
        }
    }

    /// An identity with nobody signed in
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            owner_id: None,
            token: None,
        }
    }
}

impl fmt::Debug for StaticIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StaticIdentity")
            .field("owner_id", &self.owner_id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_owner_id(&self) -> Option<String> {
        self.owner_id.clone()
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
