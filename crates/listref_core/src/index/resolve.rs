//! Per-domain cross-linking and position ordering.
//!
//! # Responsibility
//! - Link every relation of one domain to its entity by `ref_id`.
//! - Order the domain's relations by ascending `position`.
//!
//! # Invariants
//! - Resolution is a pure derivation: source maps are only read.
//! - The sort is stable, so equal positions keep insertion order.
//! - Output refers to map slots, not keys; slots never change because the
//!   maps are immutable after construction.

use crate::model::entity::Entity;
use crate::model::relation::ListRelation;
use indexmap::IndexMap;

/// One ordered relation slot with its optional entity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedEntry {
    pub(crate) relation: usize,
    pub(crate) entity: Option<usize>,
}

/// Linked and position-ordered view of one relation domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolvedDomain {
    pub(crate) entries: Vec<ResolvedEntry>,
}

impl ResolvedDomain {
    pub(crate) fn linked_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.entity.is_some())
            .count()
    }
}

pub(crate) fn resolve_domain<E: Entity>(
    relations: &IndexMap<String, ListRelation>,
    entities: Option<&IndexMap<String, E>>,
) -> ResolvedDomain {
    let mut entries = relations
        .values()
        .enumerate()
        .map(|(slot, relation)| ResolvedEntry {
            relation: slot,
            entity: entities.and_then(|loaded| loaded.get_index_of(relation.ref_id.as_str())),
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| {
        relations
            .get_index(entry.relation)
            .map_or(i64::MAX, |(_, relation)| relation.position)
    });

    ResolvedDomain { entries }
}

#[cfg(test)]
mod tests {
    use super::{resolve_domain, ResolvedEntry};
    use crate::model::entity::RefItem;
    use crate::model::relation::ListRelation;
    use indexmap::IndexMap;

    fn relations(specs: &[(&str, &str, i64)]) -> IndexMap<String, ListRelation> {
        specs
            .iter()
            .map(|(id, ref_id, position)| {
                (
                    id.to_string(),
                    ListRelation::new(*id, *ref_id).at_position(*position),
                )
            })
            .collect()
    }

    fn items(ids: &[&str]) -> IndexMap<String, RefItem> {
        ids.iter()
            .map(|id| (id.to_string(), RefItem::new(*id)))
            .collect()
    }

    #[test]
    fn orders_by_position_and_keeps_ties_stable() {
        let relations = relations(&[("a", "x", 3), ("b", "y", 1), ("c", "z", 1), ("d", "w", 2)]);
        let resolved = resolve_domain::<RefItem>(&relations, None);

        let order = resolved
            .entries
            .iter()
            .map(|entry| entry.relation)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn links_only_loaded_entities() {
        let relations = relations(&[("a", "t1", 0), ("b", "missing", 1)]);
        let entities = items(&["t0", "t1"]);
        let resolved = resolve_domain(&relations, Some(&entities));

        assert_eq!(
            resolved.entries,
            vec![
                ResolvedEntry {
                    relation: 0,
                    entity: Some(1)
                },
                ResolvedEntry {
                    relation: 1,
                    entity: None
                },
            ]
        );
        assert_eq!(resolved.linked_count(), 1);
    }

    #[test]
    fn missing_entity_domain_links_nothing() {
        let relations = relations(&[("a", "t1", 0)]);
        let resolved = resolve_domain::<RefItem>(&relations, None);
        assert_eq!(resolved.linked_count(), 0);
        assert_eq!(resolved.entries.len(), 1);
    }
}
