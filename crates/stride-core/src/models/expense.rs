//! Expense model

use serde::{Deserialize, Serialize};

use crate::util::unix_millis_now;

use super::{Entity, RecordId, Table};

/// A single expense entry
///
/// Amounts are stored as integer cents; no floating point money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: RecordId,
    pub owner_id: String,
    pub amount_cents: i64,
    pub category: String,
    pub description: Option<String>,
    /// Day the expense was incurred (Unix ms)
    pub incurred_on: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Expense {
    /// Create a new expense owned by the given user
    #[must_use]
    pub fn new(owner_id: impl Into<String>, amount_cents: i64, category: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            amount_cents,
            category: category.into(),
            description: None,
            incurred_on: now,
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }
}

impl Entity for Expense {
    const TABLE: Table = Table::Expenses;

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
