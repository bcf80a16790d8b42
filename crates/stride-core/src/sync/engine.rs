//! The sync engine: drains the outbox against the remote backend.
//!
//! One engine is constructed at startup and injected everywhere a component
//! needs to enqueue mutations or read sync status. Local writes never wait on
//! the network; the engine replays queued operations whenever connectivity
//! allows, strictly in enqueue order, with a bounded retry budget per entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::IdentityProvider;
use crate::db::{Database, EntityStore, Operation, OutboxEntry, OutboxPayload, OutboxRepository};
use crate::error::Result;
use crate::state::SyncState;

use super::remote::{RemoteBackend, RemoteResult};

/// Retry budget per outbox entry. After this many failed replays the entry is
/// evicted and the local record stays permanently unsynced.
pub const MAX_SYNC_ATTEMPTS: u32 = 5;

/// Snapshot of the engine's externally visible state. Pure read, poll-safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_syncing: bool,
}

struct Inner<B, I> {
    db: Arc<Mutex<Database>>,
    backend: B,
    identity: I,
    online: AtomicBool,
    syncing: AtomicBool,
}

/// Shared sync coordinator; cheap to clone, one logical instance per app.
pub struct SyncEngine<B, I> {
    inner: Arc<Inner<B, I>>,
}

impl<B, I> Clone for SyncEngine<B, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Clears the syncing flag when a drain pass ends, on any exit path.
struct SyncingGuard<'a>(&'a AtomicBool);

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<B, I> SyncEngine<B, I>
where
    B: RemoteBackend + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(db: Arc<Mutex<Database>>, backend: B, identity: I, initially_online: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                db,
                backend,
                identity,
                online: AtomicBool::new(initially_online),
                syncing: AtomicBool::new(false),
            }),
        }
    }

    /// The identity this engine syncs under
    pub fn identity(&self) -> &I {
        &self.inner.identity
    }

    /// Handle to the underlying local database
    #[must_use]
    pub fn db(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.inner.db)
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            is_online: self.inner.online.load(Ordering::SeqCst),
            is_syncing: self.inner.syncing.load(Ordering::SeqCst),
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::SeqCst)
    }

    pub fn set_online(&self, online: bool) {
        self.inner.online.store(online, Ordering::SeqCst);
    }

    /// Connectivity came back: record it and kick off a drain without waiting
    pub fn notify_online(&self) {
        self.set_online(true);
        self.trigger_drain();
    }

    /// Connectivity lost: in-flight requests are left to fail naturally
    pub fn notify_offline(&self) {
        self.set_online(false);
    }

    /// Fire-and-forget drain on a background task
    pub fn trigger_drain(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(error) = engine.drain().await {
                tracing::error!("Background drain failed: {error}");
            }
        });
    }

    /// Number of queued outbox entries
    pub async fn pending(&self) -> Result<usize> {
        let db = self.inner.db.lock().await;
        OutboxRepository::new(db.connection()).len().await
    }

    /// Presentation state for status indicators
    pub async fn sync_state(&self) -> Result<SyncState> {
        let pending = self.pending().await?;
        Ok(SyncState::from_status(self.status(), pending))
    }

    /// Append an operation to the outbox.
    ///
    /// The only write path into the outbox; called immediately after the
    /// corresponding local store write. When online, a drain is triggered in
    /// the background; the caller never waits on the network.
    pub async fn enqueue(&self, operation: Operation, payload: OutboxPayload) -> Result<i64> {
        let seq = {
            let db = self.inner.db.lock().await;
            OutboxRepository::new(db.connection())
                .push(operation, &payload)
                .await?
        };
        tracing::debug!(
            "Enqueued {} {}/{} as outbox seq {seq}",
            operation,
            payload.table(),
            payload.record_id()
        );

        if self.is_online() {
            self.trigger_drain();
        }
        Ok(seq)
    }

    /// Replay the current outbox snapshot against the remote backend.
    ///
    /// No-op when offline, signed out, or when a drain is already running
    /// (idempotent under concurrent invocation). Entries are processed one
    /// at a time in sequence order; a failing entry never aborts the pass.
    pub async fn drain(&self) -> Result<()> {
        if !self.is_online() {
            return Ok(());
        }
        if self.inner.identity.current_owner_id().is_none() {
            tracing::debug!("Skipping drain: no signed-in identity");
            return Ok(());
        }

        // Must win the flag before the first await point, or two overlapping
        // calls could both observe "not currently draining".
        if self
            .inner
            .syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }
        let _guard = SyncingGuard(&self.inner.syncing);

        self.drain_outbox().await
    }

    async fn drain_outbox(&self) -> Result<()> {
        // Snapshot once; entries enqueued mid-drain wait for the next pass
        let entries = {
            let db = self.inner.db.lock().await;
            OutboxRepository::new(db.connection()).list().await?
        };
        if entries.is_empty() {
            return Ok(());
        }
        tracing::debug!("Draining {} outbox entries", entries.len());

        for entry in entries {
            let outcome = self.replay(&entry).await;
            self.settle(&entry, outcome).await?;
        }
        Ok(())
    }

    async fn replay(&self, entry: &OutboxEntry) -> RemoteResult<()> {
        match &entry.payload {
            OutboxPayload::Upsert { snapshot } => {
                self.inner.backend.upsert(entry.table, snapshot).await
            }
            OutboxPayload::Delete { table, id } => {
                self.inner.backend.delete_by_id(*table, *id).await
            }
        }
    }

    /// Apply one entry's replay outcome: remove on success, book a failure
    /// otherwise, evicting once the attempt budget is spent.
    async fn settle(&self, entry: &OutboxEntry, outcome: RemoteResult<()>) -> Result<()> {
        let db = self.inner.db.lock().await;
        let outbox = OutboxRepository::new(db.connection());

        match outcome {
            Ok(()) => {
                outbox.remove(entry.seq).await?;
                if matches!(entry.payload, OutboxPayload::Upsert { .. }) {
                    EntityStore::new(db.connection())
                        .mark_synced(entry.table, entry.record_id)
                        .await?;
                }
                tracing::debug!(
                    "Replayed {} {}/{}",
                    entry.operation,
                    entry.table,
                    entry.record_id
                );
            }
            Err(error) => {
                let attempts = outbox.record_failure(entry.seq).await?;
                if attempts >= MAX_SYNC_ATTEMPTS {
                    outbox.remove(entry.seq).await?;
                    tracing::warn!(
                        "Evicting outbox entry {} ({} {}/{}) after {attempts} failed attempts: {error}",
                        entry.seq,
                        entry.operation,
                        entry.table,
                        entry.record_id
                    );
                } else {
                    tracing::warn!(
                        "Replay of {} {}/{} failed (attempt {attempts}/{MAX_SYNC_ATTEMPTS}): {error}",
                        entry.operation,
                        entry.table,
                        entry.record_id
                    );
                }
            }
        }
        Ok(())
    }
}
