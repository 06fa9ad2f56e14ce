//! List relation record.
//!
//! # Responsibility
//! - Describe one association from an owning item to an entity in another
//!   domain.
//! - Carry the classification (`relation_type`) and ordering (`position`)
//!   used by the resolution engine.
//!
//! # Invariants
//! - `id` is unique within its domain and matches its map key.
//! - `ref_id` names an entity id in the same domain; the target may be
//!   missing (not loaded), which is never an error.
//! - Records are never mutated by the engine; linking produces views.

use serde::{Deserialize, Serialize};

/// Relation type assigned when a loader does not provide one.
pub const DEFAULT_RELATION_TYPE: &str = "default";

/// Association record connecting an owning item to one referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRelation {
    /// Stable relation id within its domain.
    pub id: String,
    /// Id of the referenced entity in the same domain.
    pub ref_id: String,
    /// Serialized as `type` to match loader naming.
    #[serde(rename = "type", default = "default_relation_type")]
    pub relation_type: String,
    /// Ascending ordering key. Ties keep insertion order.
    #[serde(default)]
    pub position: i64,
}

impl ListRelation {
    /// Creates a `default`-typed relation at position 0.
    pub fn new(id: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ref_id: ref_id.into(),
            relation_type: default_relation_type(),
            position: 0,
        }
    }

    pub fn with_type(mut self, relation_type: impl Into<String>) -> Self {
        self.relation_type = relation_type.into();
        self
    }

    pub fn at_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }
}

fn default_relation_type() -> String {
    DEFAULT_RELATION_TYPE.to_string()
}
