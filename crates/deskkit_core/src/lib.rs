//! Core domain logic for DeskKit, a local-first personal productivity desk.
//!
//! Notes, todos, a simulated assistant chat, a pomodoro timer and projects
//! share one persisted document. Every mutation goes through a repository
//! that validates input, writes the whole document back, and reports the
//! write outcome next to the value.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod transfer;
pub mod workspace;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DeskConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::Document;
pub use model::validation::ValidationError;
pub use repo::MutationResult;
pub use store::{
    DocumentStore, MemoryBackend, Saved, SqliteBackend, StorageBackend, StoreError,
    DEFAULT_STORAGE_KEY,
};
pub use transfer::TransferError;
pub use workspace::{ModuleKind, ModuleView, Workspace};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
