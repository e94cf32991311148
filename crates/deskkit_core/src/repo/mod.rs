//! Repositories over slices of the root document.
//!
//! # Responsibility
//! - Expose get-all/add/update/delete per entity collection.
//! - Validate input before any mutation reaches the store.
//!
//! # Invariants
//! - Every mutation is one whole-document read-modify-write.
//! - Validation failures abort the mutation; nothing is saved.
//! - Stale ids are silent no-ops (`None` / `false`), never errors.
//! - Storage failures surface through `Saved::persist_error`.

use crate::model::validation::ValidationError;
use crate::store::Saved;

pub mod chat_repo;
pub mod notes_repo;
pub mod pomodoro_repo;
pub mod project_repo;
pub mod todo_repo;

/// Outcome of a validated mutation.
pub type MutationResult<T> = Result<Saved<T>, ValidationError>;
