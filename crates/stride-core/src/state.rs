//! Shared cross-platform state types.

use std::fmt;

use crate::sync::SyncStatus;

/// Unified sync state shown by status indicators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Offline,
    Syncing,
    /// Online and idle, but unsynced changes remain queued
    Pending,
    Synced,
}

impl SyncState {
    /// Derive the presentation state from engine status and outbox depth.
    #[must_use]
    pub const fn from_status(status: SyncStatus, pending: usize) -> Self {
        if !status.is_online {
            Self::Offline
        } else if status.is_syncing {
            Self::Syncing
        } else if pending > 0 {
            Self::Pending
        } else {
            Self::Synced
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Offline => "Offline · Saved locally",
            Self::Syncing => "Syncing...",
            Self::Pending => "Online · Changes pending",
            Self::Synced => "Online · Synced",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn status(is_online: bool, is_syncing: bool) -> SyncStatus {
        SyncStatus {
            is_online,
            is_syncing,
        }
    }

    #[test]
    fn offline_wins_over_everything() {
        assert_eq!(
            SyncState::from_status(status(false, false), 3),
            SyncState::Offline
        );
    }

    #[test]
    fn syncing_then_pending_then_synced() {
        assert_eq!(
            SyncState::from_status(status(true, true), 3),
            SyncState::Syncing
        );
        assert_eq!(
            SyncState::from_status(status(true, false), 3),
            SyncState::Pending
        );
        assert_eq!(
            SyncState::from_status(status(true, false), 0),
            SyncState::Synced
        );
    }

    #[test]
    fn labels_match_status_surface() {
        assert_eq!(SyncState::Offline.to_string(), "Offline · Saved locally");
        assert_eq!(SyncState::Syncing.to_string(), "Syncing...");
    }
}
