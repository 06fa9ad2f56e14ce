//! Item facade over a relation index.
//!
//! # Responsibility
//! - Give owning items (products, categories, ...) a label and a display
//!   text derived from their referenced texts.
//!
//! # Invariants
//! - `display_text` never fails; it falls back to `label`.
//! - The default label is empty; concrete items override it.

use crate::index::query::RelationQuery;
use crate::index::relation_index::RelationIndex;
use crate::model::entity::{Entity, RefItem};

/// Domain holding localized texts.
pub const TEXT_DOMAIN: &str = "text";
/// Text type used when no explicit type is requested.
pub const DEFAULT_TEXT_TYPE: &str = "name";

/// An item owning list references to other domains.
pub trait ListRefItem {
    type Entity: Entity;

    fn relations(&self) -> &RelationIndex<Self::Entity>;

    /// Internal label of the item.
    fn label(&self) -> &str {
        ""
    }

    /// Returns the content of the lowest-positioned available text of
    /// `text_type`, or the label when no such text exists.
    fn display_text(&self, text_type: &str) -> String {
        let query = RelationQuery::new().entity_types([text_type]);
        self.relations()
            .referenced_entities(TEXT_DOMAIN, &query)
            .values()
            .next()
            .and_then(|text| text.content())
            .unwrap_or_else(|| self.label())
            .to_string()
    }

    /// `display_text` for the `name` text type.
    fn name(&self) -> String {
        self.display_text(DEFAULT_TEXT_TYPE)
    }
}

impl<E: Entity> ListRefItem for RelationIndex<E> {
    type Entity = E;

    fn relations(&self) -> &RelationIndex<E> {
        self
    }
}

/// Catalog item (product, category, ...) with a label and its references.
#[derive(Debug)]
pub struct CatalogItem<E = RefItem> {
    code: String,
    label: String,
    relations: RelationIndex<E>,
}

impl<E: Entity> CatalogItem<E> {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        relations: RelationIndex<E>,
    ) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            relations,
        }
    }

    /// Unique article or category code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Swaps in a rebuilt index after the underlying data changed.
    pub fn replace_relations(&mut self, relations: RelationIndex<E>) -> RelationIndex<E> {
        std::mem::replace(&mut self.relations, relations)
    }
}

impl<E: Entity> ListRefItem for CatalogItem<E> {
    type Entity = E;

    fn relations(&self) -> &RelationIndex<E> {
        &self.relations
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogItem, ListRefItem};
    use crate::index::relation_index::RelationIndex;
    use crate::model::entity::RefItem;
    use crate::model::relation::ListRelation;

    #[test]
    fn bare_index_has_empty_label() {
        let index = RelationIndex::<RefItem>::default();
        assert_eq!(index.label(), "");
        assert_eq!(index.name(), "");
    }

    #[test]
    fn text_without_content_falls_back_to_label() {
        let index = RelationIndex::from_records(
            [("text".to_string(), ListRelation::new("l1", "t1"))],
            [("text".to_string(), RefItem::new("t1").with_kind("name"))],
        )
        .expect("fixture should build");
        let item = CatalogItem::new("ABCD", "Coffee label", index);

        assert_eq!(item.code(), "ABCD");
        assert_eq!(item.name(), "Coffee label");
    }

    #[test]
    fn replacing_relations_changes_display_text() {
        let mut item = CatalogItem::new("ABCD", "fallback", RelationIndex::default());
        assert_eq!(item.name(), "fallback");

        let rebuilt = RelationIndex::from_records(
            [("text".to_string(), ListRelation::new("l1", "t1"))],
            [("text".to_string(), RefItem::text("t1", "name", "Ristretto"))],
        )
        .expect("fixture should build");
        let previous = item.replace_relations(rebuilt);

        assert!(previous.is_empty());
        assert_eq!(item.name(), "Ristretto");
    }
}
