//! Typed outbox payload snapshots.
//!
//! The outbox carries heterogeneous record shapes through one queue. Rather
//! than an untyped JSON blob, each queued upsert holds the full record as a
//! variant keyed by its table, so replay code stays type-checked end to end.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{
    Document, Entity, Expense, Habit, Note, RecordId, StudySession, Subject, Table, Task, Topic,
};

/// A full copy of one entity record at enqueue time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "record", rename_all = "snake_case")]
pub enum EntitySnapshot {
    Tasks(Task),
    Habits(Habit),
    Expenses(Expense),
    Notes(Note),
    Subjects(Subject),
    Topics(Topic),
    StudySessions(StudySession),
    Documents(Document),
}

impl EntitySnapshot {
    /// Table the snapshotted record belongs to.
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Tasks(_) => Table::Tasks,
            Self::Habits(_) => Table::Habits,
            Self::Expenses(_) => Table::Expenses,
            Self::Notes(_) => Table::Notes,
            Self::Subjects(_) => Table::Subjects,
            Self::Topics(_) => Table::Topics,
            Self::StudySessions(_) => Table::StudySessions,
            Self::Documents(_) => Table::Documents,
        }
    }

    /// Id of the snapshotted record.
    #[must_use]
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::Tasks(r) => r.id(),
            Self::Habits(r) => r.id(),
            Self::Expenses(r) => r.id(),
            Self::Notes(r) => r.id(),
            Self::Subjects(r) => r.id(),
            Self::Topics(r) => r.id(),
            Self::StudySessions(r) => r.id(),
            Self::Documents(r) => r.id(),
        }
    }

    /// Owner of the snapshotted record.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        match self {
            Self::Tasks(r) => r.owner_id(),
            Self::Habits(r) => r.owner_id(),
            Self::Expenses(r) => r.owner_id(),
            Self::Notes(r) => r.owner_id(),
            Self::Subjects(r) => r.owner_id(),
            Self::Topics(r) => r.owner_id(),
            Self::StudySessions(r) => r.owner_id(),
            Self::Documents(r) => r.owner_id(),
        }
    }

    /// The bare record as JSON, suitable for a remote upsert body.
    pub fn record_json(&self) -> Result<serde_json::Value> {
        let value = match self {
            Self::Tasks(r) => serde_json::to_value(r)?,
            Self::Habits(r) => serde_json::to_value(r)?,
            Self::Expenses(r) => serde_json::to_value(r)?,
            Self::Notes(r) => serde_json::to_value(r)?,
            Self::Subjects(r) => serde_json::to_value(r)?,
            Self::Topics(r) => serde_json::to_value(r)?,
            Self::StudySessions(r) => serde_json::to_value(r)?,
            Self::Documents(r) => serde_json::to_value(r)?,
        };
        Ok(value)
    }
}

impl From<Task> for EntitySnapshot {
    fn from(record: Task) -> Self {
        Self::Tasks(record)
    }
}

impl From<Habit> for EntitySnapshot {
    fn from(record: Habit) -> Self {
        Self::Habits(record)
    }
}

impl From<Expense> for EntitySnapshot {
    fn from(record: Expense) -> Self {
        Self::Expenses(record)
    }
}

impl From<Note> for EntitySnapshot {
    fn from(record: Note) -> Self {
        Self::Notes(record)
    }
}

impl From<Subject> for EntitySnapshot {
    fn from(record: Subject) -> Self {
        Self::Subjects(record)
    }
}

impl From<Topic> for EntitySnapshot {
    fn from(record: Topic) -> Self {
        Self::Topics(record)
    }
}

impl From<StudySession> for EntitySnapshot {
    fn from(record: StudySession) -> Self {
        Self::StudySessions(record)
    }
}

impl From<Document> for EntitySnapshot {
    fn from(record: Document) -> Self {
        Self::Documents(record)
    }
}
