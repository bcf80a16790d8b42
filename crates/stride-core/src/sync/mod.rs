//! Outbox-draining sync between the local store and the remote backend.

mod connectivity;
mod engine;
mod remote;

pub use connectivity::{ConnectivityMonitor, DEFAULT_RECHECK_INTERVAL};
pub use engine::{SyncEngine, SyncStatus, MAX_SYNC_ATTEMPTS};
pub use remote::{HttpRemoteBackend, RemoteBackend, RemoteError, RemoteResult};

#[cfg(test)]
pub(crate) use engine::tests::FakeBackend;
