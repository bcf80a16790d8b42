use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] stride_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Invalid amount '{0}'; expected e.g. 12.50")]
    InvalidAmount(String),
    #[error("Invalid date '{0}'; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("No record found for id/prefix: {0}")]
    RecordNotFound(String),
    #[error("{0}")]
    AmbiguousRecordId(String),
    #[error("Profile error: {0}")]
    Profile(String),
    #[error(
        "No signed-in profile. Run `stride config init --owner <ID>` (and optionally \
         --api-url/--token) first."
    )]
    NotSignedIn,
}
