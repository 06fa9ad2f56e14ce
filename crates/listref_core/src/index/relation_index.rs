//! Multi-domain relation index.
//!
//! # Responsibility
//! - Own the `domain -> id -> ListRelation` and `domain -> id -> Entity`
//!   maps of one item.
//! - Serve filtered, position-ordered, cross-linked views over them.
//!
//! # Invariants
//! - Both maps are fixed at construction; there is no mutation API.
//! - Each relation domain is linked and sorted at most once per index
//!   lifetime, guarded by a one-shot cell.
//! - Read operations are total: unknown domains and filters yield empty
//!   results.
//! - Relations whose entity is not loaded are dropped from entity views
//!   and carry no linked entity in relation views.

use crate::index::error::{IndexError, IndexResult};
use crate::index::query::{allows, IndexOptions, RelationQuery, ResolveMode};
use crate::index::resolve::{resolve_domain, ResolvedDomain};
use crate::model::entity::Entity;
use crate::model::relation::ListRelation;
use indexmap::IndexMap;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Relations of one domain keyed by relation id.
pub type DomainRelations = IndexMap<String, ListRelation>;
/// `domain -> id -> ListRelation`.
pub type RelationMap = IndexMap<String, DomainRelations>;
/// `domain -> id -> Entity`.
pub type EntityMap<E> = IndexMap<String, IndexMap<String, E>>;

/// A relation paired with the entity it resolved to, if loaded.
#[derive(Debug)]
pub struct LinkedRelation<'a, E> {
    pub domain: &'a str,
    pub relation: &'a ListRelation,
    pub entity: Option<&'a E>,
}

impl<E> Clone for LinkedRelation<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for LinkedRelation<'_, E> {}

impl<'a, E: Entity> LinkedRelation<'a, E> {
    pub fn ref_id(&self) -> &'a str {
        self.relation.ref_id.as_str()
    }

    pub fn relation_type(&self) -> &'a str {
        self.relation.relation_type.as_str()
    }

    pub fn position(&self) -> i64 {
        self.relation.position
    }

    pub fn linked_entity(&self) -> Option<&'a E> {
        self.entity
    }

    fn matches(&self, query: &RelationQuery) -> bool {
        if !query.selects_relation_type(self.relation_type()) {
            return false;
        }

        if let Some(entity_types) = query.entity_types.as_deref() {
            let declared = self.entity.and_then(|entity| entity.entity_type());
            if !declared.is_some_and(|kind| allows(Some(entity_types), kind)) {
                return false;
            }
        }

        // Unlinked relations survive the availability check.
        !(query.active_only && self.entity.is_some_and(|entity| !entity.is_available()))
    }
}

/// In-memory list/reference index for one owning item.
#[derive(Debug)]
pub struct RelationIndex<E> {
    relations: RelationMap,
    entities: EntityMap<E>,
    /// Parallel to `relations` domain slots.
    resolved: Vec<OnceCell<ResolvedDomain>>,
    resolve_passes: AtomicUsize,
}

impl<E> Default for RelationIndex<E> {
    fn default() -> Self {
        Self {
            relations: IndexMap::new(),
            entities: IndexMap::new(),
            resolved: Vec::new(),
            resolve_passes: AtomicUsize::new(0),
        }
    }
}

impl<E: Entity> RelationIndex<E> {
    /// Builds a lazily resolving index from fully loaded maps.
    ///
    /// # Errors
    /// - Returns `IndexError` naming the offending domain/id when a map
    ///   entry is malformed (blank names, key/id mismatch, blank `ref_id`).
    pub fn new(relations: RelationMap, entities: EntityMap<E>) -> IndexResult<Self> {
        Self::with_options(relations, entities, IndexOptions::default())
    }

    /// Builds an index with explicit construction options.
    ///
    /// With `ResolveMode::Eager` every domain is linked and sorted before
    /// this returns; views are identical to the lazy mode.
    pub fn with_options(
        relations: RelationMap,
        entities: EntityMap<E>,
        options: IndexOptions,
    ) -> IndexResult<Self> {
        if let Err(err) = validate(&relations, &entities) {
            warn!("event=index_build module=index status=rejected error={err}");
            return Err(err);
        }

        let index = Self {
            resolved: relations.keys().map(|_| OnceCell::new()).collect(),
            relations,
            entities,
            resolve_passes: AtomicUsize::new(0),
        };

        if options.resolve == ResolveMode::Eager {
            for slot in 0..index.relations.len() {
                index.resolved_at(slot);
            }
        }

        info!(
            "event=index_build module=index status=ok relation_domains={} entity_domains={} relations={} resolve={:?}",
            index.relations.len(),
            index.entities.len(),
            index.relations.values().map(IndexMap::len).sum::<usize>(),
            options.resolve
        );
        Ok(index)
    }

    /// Builds an index from flat `(domain, record)` pairs.
    ///
    /// Records are keyed by their own id; a later record with the same id
    /// replaces the earlier one but keeps its insertion slot.
    pub fn from_records<R, T>(relations: R, entities: T) -> IndexResult<Self>
    where
        R: IntoIterator<Item = (String, ListRelation)>,
        T: IntoIterator<Item = (String, E)>,
    {
        let mut relation_map = RelationMap::new();
        for (domain, relation) in relations {
            relation_map
                .entry(domain)
                .or_default()
                .insert(relation.id.clone(), relation);
        }

        let mut entity_map = EntityMap::new();
        for (domain, entity) in entities {
            entity_map
                .entry(domain)
                .or_default()
                .insert(entity.id().to_string(), entity);
        }

        Self::new(relation_map, entity_map)
    }

    /// Relation domains in their natural (insertion) order.
    pub fn domains(&self) -> impl Iterator<Item = &str> + '_ {
        self.relations.keys().map(String::as_str)
    }

    /// Returns `true` when no relation is stored in any domain.
    pub fn is_empty(&self) -> bool {
        self.relations.values().all(IndexMap::is_empty)
    }

    pub fn relation_count(&self, domain: &str) -> usize {
        self.relations.get(domain).map_or(0, IndexMap::len)
    }

    /// Looks up one loaded entity without going through relations.
    pub fn entity(&self, domain: &str, id: &str) -> Option<&E> {
        self.entities.get(domain)?.get(id)
    }

    /// Whether `domain` has already been linked and sorted.
    pub fn is_resolved(&self, domain: &str) -> bool {
        self.relations
            .get_index_of(domain)
            .and_then(|slot| self.resolved.get(slot))
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of per-domain resolution passes run so far.
    pub fn resolve_passes(&self) -> usize {
        self.resolve_passes.load(Ordering::Relaxed)
    }

    /// Returns relations matching `query`, ordered by position per domain.
    ///
    /// Multi-domain results are concatenated in domain insertion order;
    /// there is no global order across domains.
    pub fn list_relations(&self, query: &RelationQuery) -> Vec<LinkedRelation<'_, E>> {
        let mut selected = Vec::new();
        for (slot, domain) in self.relations.keys().enumerate() {
            if !query.selects_domain(domain) {
                continue;
            }
            selected.extend(self.linked_in(slot).filter(|link| link.matches(query)));
        }
        selected
    }

    /// Returns entities referenced from `domain`, keyed by `ref_id` in
    /// position order.
    ///
    /// `query.domains` is ignored; the other filters apply as in
    /// `list_relations`. Unknown or unloaded domains yield an empty map.
    pub fn referenced_entities(&self, domain: &str, query: &RelationQuery) -> IndexMap<&str, &E> {
        if !self.entities.contains_key(domain) {
            return IndexMap::new();
        }
        let Some(slot) = self.relations.get_index_of(domain) else {
            return IndexMap::new();
        };

        project(
            self.linked_in(slot).filter(|link| link.matches(query)),
            query.active_only,
        )
    }

    /// Returns the entity set of every known domain. Type filters do not
    /// apply to this listing.
    ///
    /// Relation domains come first, in position order, and are empty when
    /// their entities were not loaded. Domains with entities but no
    /// relations follow with all their entities in insertion order.
    pub fn referenced_entities_by_domain(
        &self,
        active_only: bool,
    ) -> IndexMap<&str, IndexMap<&str, &E>> {
        let mut listing = self
            .relations
            .keys()
            .enumerate()
            .map(|(slot, domain)| (domain.as_str(), project(self.linked_in(slot), active_only)))
            .collect::<IndexMap<_, _>>();

        for (domain, entities) in &self.entities {
            if self.relations.contains_key(domain.as_str()) {
                continue;
            }
            let available = entities
                .iter()
                .filter(|(_, entity)| !active_only || entity.is_available())
                .map(|(id, entity)| (id.as_str(), entity))
                .collect();
            listing.insert(domain.as_str(), available);
        }

        listing
    }

    fn linked_in(&self, slot: usize) -> impl Iterator<Item = LinkedRelation<'_, E>> + '_ {
        let domain_slot = self.relations.get_index(slot);
        let entities = domain_slot.and_then(|(domain, _)| self.entities.get(domain));

        domain_slot
            .map(|_| self.resolved_at(slot))
            .into_iter()
            .flat_map(|resolved| resolved.entries.iter())
            .filter_map(move |entry| {
                let (domain, relations) = domain_slot?;
                let (_, relation) = relations.get_index(entry.relation)?;
                let entity = entry
                    .entity
                    .and_then(|entity_slot| entities?.get_index(entity_slot))
                    .map(|(_, entity)| entity);
                Some(LinkedRelation {
                    domain: domain.as_str(),
                    relation,
                    entity,
                })
            })
    }

    fn resolved_at(&self, slot: usize) -> &ResolvedDomain {
        self.resolved[slot].get_or_init(|| {
            let Some((domain, relations)) = self.relations.get_index(slot) else {
                return ResolvedDomain::default();
            };
            self.resolve_passes.fetch_add(1, Ordering::Relaxed);

            let resolved = resolve_domain(relations, self.entities.get(domain));
            debug!(
                "event=domain_resolve module=index status=ok domain={} relations={} linked={}",
                domain,
                resolved.entries.len(),
                resolved.linked_count()
            );
            resolved
        })
    }
}

fn project<'a, E: Entity + 'a>(
    links: impl Iterator<Item = LinkedRelation<'a, E>>,
    active_only: bool,
) -> IndexMap<&'a str, &'a E> {
    let mut projected = IndexMap::new();
    for link in links {
        let Some(entity) = link.entity else {
            continue;
        };
        if active_only && !entity.is_available() {
            continue;
        }
        // Duplicate ref ids keep the lowest-position slot.
        projected.entry(link.ref_id()).or_insert(entity);
    }
    projected
}

fn validate<E: Entity>(relations: &RelationMap, entities: &EntityMap<E>) -> IndexResult<()> {
    for (domain, records) in relations {
        if domain.trim().is_empty() {
            return Err(IndexError::BlankDomain);
        }
        for (key, relation) in records {
            if relation.id.trim().is_empty() {
                return Err(IndexError::BlankRelationId {
                    domain: domain.clone(),
                });
            }
            if key != &relation.id {
                return Err(IndexError::RelationKeyMismatch {
                    domain: domain.clone(),
                    key: key.clone(),
                    id: relation.id.clone(),
                });
            }
            if relation.ref_id.trim().is_empty() {
                return Err(IndexError::BlankRefId {
                    domain: domain.clone(),
                    id: relation.id.clone(),
                });
            }
        }
    }

    for (domain, records) in entities {
        if domain.trim().is_empty() {
            return Err(IndexError::BlankDomain);
        }
        for (key, entity) in records {
            if key != entity.id() {
                return Err(IndexError::EntityKeyMismatch {
                    domain: domain.clone(),
                    key: key.clone(),
                    id: entity.id().to_string(),
                });
            }
        }
    }

    Ok(())
}
