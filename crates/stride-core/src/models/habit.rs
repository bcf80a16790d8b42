//! Habit model

use serde::{Deserialize, Serialize};

use crate::util::unix_millis_now;

use super::{Entity, RecordId, Table};

/// How often a habit is expected to be completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

/// A recurring habit with a completion streak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: RecordId,
    pub owner_id: String,
    pub name: String,
    pub frequency: Frequency,
    /// Consecutive completions at the configured frequency
    pub streak: u32,
    /// When the habit was last ticked off (Unix ms)
    pub last_completed_on: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Habit {
    /// Create a new habit owned by the given user
    #[must_use]
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            name: name.into(),
            frequency: Frequency::default(),
            streak: 0,
            last_completed_on: None,
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }

    /// Record a completion: extend the streak and stamp the completion time.
    pub fn tick(&mut self) {
        self.streak += 1;
        self.last_completed_on = Some(unix_millis_now());
        self.touch();
    }
}

impl Entity for Habit {
    const TABLE: Table = Table::Habits;

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
    fn tick_extends_streak_and_clears_synced() {
        let mut habit = Habit::new("owner-1", "Morning run");
        habit.synced = true;

        habit.tick();

        assert_eq!(habit.streak, 1);
        assert!(habit.last_completed_on.is_some());
        assert!(!habit.synced);
    }
}
