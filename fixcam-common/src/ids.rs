//! Stable entity identifiers.
//!
//! Projects and their sub-entities (steps, materials, tools) are addressed
//! by server-generated UUIDv4 strings. Identifiers are assigned exactly once
//! at construction and never regenerated; partial updates key on them.
//! Unknown ids are detected by the store matching zero rows, so no separate
//! parse step is needed on the way in.

use uuid::Uuid;

/// Generate a fresh entity identifier.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}
