//! Entity id generation.

use uuid::Uuid;

/// Opaque entity identifier.
///
/// Imported documents may carry ids in any string format, so the model keeps
/// ids as plain strings instead of a parsed UUID.
pub type EntityId = String;

/// Generates a new timestamp-prefixed id.
///
/// UUIDv7 packs a millisecond timestamp followed by random bits. Uniqueness is
/// best-effort: ids are not checked for collisions against stored data.
pub fn generate_id() -> EntityId {
    Uuid::now_v7().simple().to_string()
}
