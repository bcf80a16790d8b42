//! The operation outbox: pending remote-replay obligations.

use libsql::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{EntitySnapshot, RecordId, Table};
use crate::util::unix_millis_now;

/// Kind of mutation a queued entry replays remotely.
///
/// `Create` and `Update` both replay as an upsert; the distinction is kept
/// for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

/// What an entry carries to the remote backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboxPayload {
    /// Full record snapshot for create/update replay
    Upsert { snapshot: EntitySnapshot },
    /// Just the id for delete replay
    Delete { table: Table, id: RecordId },
}

impl OutboxPayload {
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Upsert { snapshot } => snapshot.table(),
            Self::Delete { table, .. } => *table,
        }
    }

    #[must_use]
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::Upsert { snapshot } => snapshot.record_id(),
            Self::Delete { id, .. } => *id,
        }
    }
}

/// One pending remote operation
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    /// Replay order; assigned by SQLite AUTOINCREMENT
    pub seq: i64,
    pub table: Table,
    pub operation: Operation,
    pub record_id: RecordId,
    pub payload: OutboxPayload,
    pub enqueued_at: i64,
    pub attempts: u32,
}

/// Storage access for the outbox table
pub struct OutboxRepository<'a> {
    conn: &'a Connection,
}

impl<'a> OutboxRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a new entry with `attempts = 0`, returning its sequence id
    pub async fn push(&self, operation: Operation, payload: &OutboxPayload) -> Result<i64> {
        let table = payload.table();
        let record_id = payload.record_id();
        let json = serde_json::to_string(payload)?;

        self.conn
            .execute(
                "INSERT INTO outbox (tbl, op, record_id, payload, enqueued_at, attempts)
                 VALUES (?, ?, ?, ?, ?, 0)",
                libsql::params![
                    table.as_str(),
                    operation.as_str(),
                    record_id.as_str(),
                    json,
                    unix_millis_now()
                ],
            )
            .await?;

        Ok(self.conn.last_insert_rowid())
    }

    /// All pending entries in strict ascending sequence order
    pub async fn list(&self) -> Result<Vec<OutboxEntry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT seq, tbl, op, record_id, payload, enqueued_at, attempts
                 FROM outbox ORDER BY seq ASC",
                (),
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(Self::parse_entry(&row)?);
        }
        Ok(entries)
    }

    /// Remove an entry (successful replay, or eviction)
    pub async fn remove(&self, seq: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM outbox WHERE seq = ?", libsql::params![seq])
            .await?;
        Ok(())
    }

    /// Drop every pending entry; used when the local account data is wiped
    pub async fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM outbox", ()).await?;
        Ok(())
    }

    /// Increment an entry's attempt counter, returning the new count
    pub async fn record_failure(&self, seq: i64) -> Result<u32> {
        self.conn
            .execute(
                "UPDATE outbox SET attempts = attempts + 1 WHERE seq = ?",
                libsql::params![seq],
            )
            .await?;

        let mut rows = self
            .conn
            .query(
                "SELECT attempts FROM outbox WHERE seq = ?",
                libsql::params![seq],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Err(Error::NotFound(format!("outbox entry {seq}")));
        };
        let attempts: i64 = row.get(0)?;
        Ok(u32::try_from(attempts).unwrap_or(u32::MAX))
    }

    /// Number of pending entries
    pub async fn len(&self) -> Result<usize> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM outbox", ()).await?;
        let Some(row) = rows.next().await? else {
            return Ok(0);
        };
        let count: i64 = row.get(0)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    fn parse_entry(row: &libsql::Row) -> Result<OutboxEntry> {
        let seq: i64 = row.get(0)?;
        let table: String = row.get(1)?;
        let op: String = row.get(2)?;
        let record_id: String = row.get(3)?;
        let payload: String = row.get(4)?;
        let enqueued_at: i64 = row.get(5)?;
        let attempts: i64 = row.get(6)?;

        Ok(OutboxEntry {
            seq,
            table: table
                .parse()
                .map_err(|e: String| Error::Database(e))?,
            operation: op.parse().map_err(|e: String| Error::Database(e))?,
            record_id: record_id
                .parse()
                .map_err(|e| Error::Database(format!("bad record id: {e}")))?,
            payload: serde_json::from_str(&payload)?,
            enqueued_at,
            attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
        })
    }
}
