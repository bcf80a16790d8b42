//! Database layer for Stride

mod connection;
mod migrations;
mod outbox;
mod store;

pub use connection::Database;
pub use outbox::{Operation, OutboxEntry, OutboxPayload, OutboxRepository};
pub use store::EntityStore;
