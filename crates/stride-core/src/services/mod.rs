//! Application-facing services over the store and sync engine.

mod app;

pub use app::AppService;
