//! Domain model for the five DeskKit collections.
//!
//! # Responsibility
//! - Define the serialized shape of the single root `Document`.
//! - Keep per-entity helpers (sorting, due dates, progress) next to the data.
//!
//! # Invariants
//! - Every entity is owned by exactly one containing collection.
//! - JSON field names match the persisted document layout (camelCase).
//! - Ids are opaque strings; new ones come from `id::generate_id`.

pub mod chat;
pub mod document;
pub mod id;
pub mod note;
pub mod pomodoro;
pub mod project;
pub mod todo;
pub mod validation;
