//! Document metadata model
//!
//! Only the metadata lives in the local store; file bytes are handled by the
//! upload pipeline, which is outside this crate.

use serde::{Deserialize, Serialize};

use crate::util::unix_millis_now;

use super::{Entity, RecordId, Table};

/// Metadata for an uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub owner_id: String,
    pub title: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Subject this document belongs to, if any
    pub subject_id: Option<RecordId>,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Document {
    #[must_use]
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: i64,
    ) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            title: title.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            subject_id: None,
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }
}

impl Entity for Document {
    const TABLE: Table = Table::Documents;

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
