//! Study tracking models: subjects, topics, and logged sessions

use serde::{Deserialize, Serialize};

use crate::util::unix_millis_now;

use super::{Entity, RecordId, Table};

/// A subject of study (e.g. "Linear Algebra")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: RecordId,
    pub owner_id: String,
    pub name: String,
    /// Optional display color (hex string)
    pub color: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Subject {
    #[must_use]
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            name: name.into(),
            color: None,
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }
}

impl Entity for Subject {
    const TABLE: Table = Table::Subjects;

    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn synced(&self) -> bool {
        self.synced
    }

    fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    fn touch(&mut self) {
        self.updated_at = unix_millis_now();
        self.synced = false;
    }
}

/// A topic within a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: RecordId,
    pub owner_id: String,
    pub subject_id: RecordId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Topic {
    #[must_use]
    pub fn new(
        owner_id: impl Into<String>,
        subject_id: RecordId,
        name: impl Into<String>,
    ) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            subject_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }
}

impl Entity for Topic {
    const TABLE: Table = Table::Topics;

    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn synced(&self) -> bool {
        self.synced
    }

    fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    fn touch(&mut self) {
        self.updated_at = unix_millis_now();
        self.synced = false;
    }
}

/// A logged study session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: RecordId,
    pub owner_id: String,
    pub subject_id: RecordId,
    pub topic_id: Option<RecordId>,
    /// Session start (Unix ms)
    pub started_at: i64,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl StudySession {
    #[must_use]
    pub fn new(owner_id: impl Into<String>, subject_id: RecordId, duration_minutes: u32) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            subject_id,
            topic_id: None,
            started_at: now,
            duration_minutes,
            notes: None,
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }
}

impl Entity for StudySession {
    const TABLE: Table = Table::StudySessions;

    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn synced(&self) -> bool {
        self.synced
    }

    fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    fn touch(&mut self) {
        self.updated_at = unix_millis_now();
        self.synced = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_links_to_subject() {
        let subject = Subject::new("owner-1", "Algebra");
        let topic = Topic::new("owner-1", subject.id, "Eigenvalues");
        assert_eq!(topic.subject_id, subject.id);
    }
}
