pub mod common;
pub mod config_cmd;
pub mod expense;
pub mod habit;
pub mod note;
pub mod status;
pub mod sync;
pub mod task;
