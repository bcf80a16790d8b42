//! Data models for Stride

mod document;
mod expense;
mod habit;
mod note;
mod record;
mod snapshot;
mod study;
mod task;

pub use document::Document;
pub use expense::Expense;
pub use habit::{Frequency, Habit};
pub use note::{extract_tags, Note};
pub use record::{Entity, RecordId, Table};
pub use snapshot::EntitySnapshot;
pub use study::{StudySession, Subject, Topic};
pub use task::{Priority, Task};
