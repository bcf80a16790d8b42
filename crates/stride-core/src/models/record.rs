//! Shared record identity and the `Entity` contract every table row obeys.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a local record, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new unique record ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The entity tables held by the local store.
///
/// Also the discriminant of the outbox payload union: every queued operation
/// names exactly one of these tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Tasks,
    Habits,
    Expenses,
    Notes,
    Subjects,
    Topics,
    StudySessions,
    Documents,
}

impl Table {
    /// All entity tables, in schema order.
    pub const ALL: [Self; 8] = [
        Self::Tasks,
        Self::Habits,
        Self::Expenses,
        Self::Notes,
        Self::Subjects,
        Self::Topics,
        Self::StudySessions,
        Self::Documents,
    ];

    /// SQL table name (also the remote collection name).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Habits => "habits",
            Self::Expenses => "expenses",
            Self::Notes => "notes",
            Self::Subjects => "subjects",
            Self::Topics => "topics",
            Self::StudySessions => "study_sessions",
            Self::Documents => "documents",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| format!("unknown table: {s}"))
    }
}

/// Shape shared by every entity record in the local store.
///
/// All entities carry a locally generated [`RecordId`], an immutable
/// `owner_id`, Unix-millisecond timestamps, and a `synced` flag that is true
/// only once the record has been acknowledged by the remote backend.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Table this entity type lives in.
    const TABLE: Table;

    fn id(&self) -> RecordId;
    fn owner_id(&self) -> &str;
    fn created_at(&self) -> i64;
    fn updated_at(&self) -> i64;
    fn synced(&self) -> bool;
    fn set_synced(&mut self, synced: bool);

    /// Mark the record locally mutated: bump `updated_at`, clear `synced`.
    fn touch(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn record_id_roundtrips_through_string() {
        let id = RecordId::new();
        let parsed: RecordId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn table_names_roundtrip() {
        for table in Table::ALL {
            let parsed: Table = table.as_str().parse().unwrap();
            assert_eq!(table, parsed);
        }
        assert!("nope".parse::<Table>().is_err());
    }
}
