//! Task model

use serde::{Deserialize, Serialize};

use crate::util::unix_millis_now;

use super::{Entity, RecordId, Table};

/// Task priority, lowest to highest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub owner_id: String,
    pub title: String,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Due date (Unix ms), if any
    pub due_date: Option<i64>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Task {
    /// Create a new task owned by the given user
    #[must_use]
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            title: title.into(),
            notes: None,
            due_date: None,
            priority: Priority::default(),
            completed: false,
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }
}

impl Entity for Task {
    const TABLE: Table = Table::Tasks;

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
    fn new_task_starts_unsynced() {
        let task = Task::new("owner-1", "Write report");
        assert_eq!(task.title, "Write report");
        assert!(!task.completed);
        assert!(!task.synced);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn touch_clears_synced() {
        let mut task = Task::new("owner-1", "Write report");
        task.synced = true;
        task.touch();
        assert!(!task.synced);
        assert!(task.updated_at >= task.created_at);
    }
}
