//! Loader-facing snapshot format.
//!
//! # Responsibility
//! - Accept already fetched relations and entities as one serde document.
//! - Turn the document into a validated `RelationIndex`.
//!
//! # Invariants
//! - List order in the document is insertion order in the index.
//! - Duplicate relation ids within a domain are rejected.
//! - Duplicate entity ids within a domain resolve to the last record.
//!
//! Wire shape:
//! `{"relations": {"text": [{"id", "ref_id", "type", "position"}]},
//!   "entities": {"text": [{"id", "type", "content", "status"}]}}`

use crate::index::error::IndexError;
use crate::index::query::IndexOptions;
use crate::index::relation_index::{EntityMap, RelationIndex, RelationMap};
use crate::model::entity::{Entity, RefItem};
use crate::model::relation::ListRelation;
use indexmap::IndexMap;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised while loading a snapshot into an index.
#[derive(Debug)]
pub enum SnapshotError {
    /// Document is not valid JSON or does not match the snapshot shape.
    Parse(serde_json::Error),
    /// Two relations share one id within a domain.
    DuplicateRelation { domain: String, id: String },
    /// Records were well-formed JSON but rejected by the index.
    Index(IndexError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid snapshot document: {err}"),
            Self::DuplicateRelation { domain, id } => {
                write!(f, "duplicate relation `{id}` in domain `{domain}`")
            }
            Self::Index(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Index(err) => Some(err),
            Self::DuplicateRelation { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<IndexError> for SnapshotError {
    fn from(value: IndexError) -> Self {
        Self::Index(value)
    }
}

/// Relations and entities of one owning item, grouped by domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot<E = RefItem> {
    #[serde(default)]
    pub relations: IndexMap<String, Vec<ListRelation>>,
    // A plain `default` would demand `E: Default`.
    #[serde(default = "IndexMap::new")]
    pub entities: IndexMap<String, Vec<E>>,
}

impl<E> Default for IndexSnapshot<E> {
    fn default() -> Self {
        Self {
            relations: IndexMap::new(),
            entities: IndexMap::new(),
        }
    }
}

impl<E: Entity + DeserializeOwned> IndexSnapshot<E> {
    /// Parses a snapshot from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(raw).map_err(|err| {
            warn!("event=snapshot_parse module=snapshot status=error error={err}");
            SnapshotError::Parse(err)
        })
    }
}

impl<E: Entity> IndexSnapshot<E> {
    /// Builds an index from this snapshot.
    ///
    /// # Errors
    /// - `DuplicateRelation` when a domain lists one relation id twice.
    /// - `Index` when the records fail index validation.
    pub fn into_index(self, options: IndexOptions) -> Result<RelationIndex<E>, SnapshotError> {
        let mut relations = RelationMap::new();
        for (domain, records) in self.relations {
            let mut keyed: IndexMap<String, ListRelation> = IndexMap::with_capacity(records.len());
            for relation in records {
                if keyed.contains_key(relation.id.as_str()) {
                    return Err(SnapshotError::DuplicateRelation {
                        domain,
                        id: relation.id,
                    });
                }
                keyed.insert(relation.id.clone(), relation);
            }
            relations.insert(domain, keyed);
        }

        let mut entities = EntityMap::new();
        for (domain, records) in self.entities {
            let keyed = records
                .into_iter()
                .map(|entity| (entity.id().to_string(), entity))
                .collect::<IndexMap<_, _>>();
            entities.insert(domain, keyed);
        }

        Ok(RelationIndex::with_options(relations, entities, options)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{IndexSnapshot, SnapshotError};
    use crate::index::query::IndexOptions;
    use crate::model::entity::RefItem;

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = IndexSnapshot::<RefItem>::from_json_str("{}").expect("empty doc parses");
        assert_eq!(snapshot, IndexSnapshot::default());

        let index = snapshot
            .into_index(IndexOptions::default())
            .expect("empty snapshot builds");
        assert!(index.is_empty());
    }

    #[test]
    fn rejects_duplicate_relation_ids() {
        let snapshot = IndexSnapshot::<RefItem>::from_json_str(
            r#"{"relations": {"media": [
                {"id": "l1", "ref_id": "m1"},
                {"id": "l1", "ref_id": "m2"}
            ]}}"#,
        )
        .expect("snapshot parses");

        let err = snapshot
            .into_index(IndexOptions::default())
            .expect_err("duplicate ids must fail");
        assert!(matches!(
            err,
            SnapshotError::DuplicateRelation { ref domain, ref id } if domain == "media" && id == "l1"
        ));
    }

    #[test]
    fn surfaces_parse_errors() {
        let err = IndexSnapshot::<RefItem>::from_json_str("{\"relations\": [").unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
        assert!(err.to_string().starts_with("invalid snapshot document"));
    }
}
