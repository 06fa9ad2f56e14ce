//! Multi-domain list/reference resolution for catalog items.
//!
//! An item owns relations to entities in other domains (texts, media,
//! attributes). `RelationIndex` links those relations to loaded entities
//! and serves filtered, position-ordered views over them.

pub mod index;
pub mod logging;
pub mod model;
pub mod snapshot;

pub use index::error::{IndexError, IndexResult};
pub use index::query::{IndexOptions, RelationQuery, ResolveMode};
pub use index::relation_index::{
    DomainRelations, EntityMap, LinkedRelation, RelationIndex, RelationMap,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{Entity, ItemStatus, RefItem, UnknownStatusCode};
pub use model::item::{CatalogItem, ListRefItem, DEFAULT_TEXT_TYPE, TEXT_DOMAIN};
pub use model::relation::{ListRelation, DEFAULT_RELATION_TYPE};
pub use snapshot::{IndexSnapshot, SnapshotError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
