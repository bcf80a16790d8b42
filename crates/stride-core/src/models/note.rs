//! Note model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::util::unix_millis_now;

use super::{Entity, RecordId, Table};

/// A free-form note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced: bool,
}

impl Note {
    /// Create a new note owned by the given user
    #[must_use]
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = unix_millis_now();
        Self {
            id: RecordId::new(),
            owner_id: owner_id.into(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            synced: false,
        }
    }

    /// Extract #tags from content
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        extract_tags(&self.content)
    }
}

impl Entity for Note {
    const TABLE: Table = Table::Notes;

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

/// Extract #tags from text
///
/// Valid tags match the pattern: `#[a-zA-Z][a-zA-Z0-9_-]*`
/// Tags are returned in lowercase and deduplicated.
#[must_use]
pub fn extract_tags(text: &str) -> Vec<String> {
    let re = Regex::new(r"#([a-zA-Z][a-zA-Z0-9_-]*)").expect("Invalid regex");
    re.captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_starts_unsynced() {
        let note = Note::new("owner-1", "Groceries", "milk, eggs");
        assert_eq!(note.title, "Groceries");
        assert!(!note.synced);
    }

    #[test]
    fn extract_tags_lowercases_and_dedupes() {
        let tags = extract_tags("#Rust #rust #RUST and #other-tag");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&"rust".to_string()));
        assert!(tags.contains(&"other-tag".to_string()));
    }

    #[test]
    fn extract_tags_rejects_leading_digits() {
        assert!(extract_tags("#123 #456test").is_empty());
    }
}
