//! stride-core - Core library for Stride
//!
//! This crate contains the shared models, the durable local store, and the
//! outbox-based sync engine used by all Stride interfaces. Every feature
//! writes to the local store first; the sync engine replays queued mutations
//! to the remote backend whenever connectivity allows.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Entity, EntitySnapshot, RecordId, Table};
pub use services::AppService;
pub use state::SyncState;
pub use sync::{SyncEngine, SyncStatus};
