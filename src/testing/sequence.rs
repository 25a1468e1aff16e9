//! Operation ordering
//!
//! Operations run in lexicographic id order. Schema ids are named so that
//! creation sorts before the reads and updates that depend on it
//! (`register_robot_request` < `robot_status_request`); nothing here parses
//! dependencies, so a badly named schema runs in the wrong place.

use crate::api::SchemaEntry;

/// Order discovered operations for execution
///
/// Byte-wise ascending by id. The sort is stable, so the result is
/// deterministic even if the server ever repeats an id.
pub fn sequence(mut entries: Vec<SchemaEntry>) -> Vec<SchemaEntry> {
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries
}
