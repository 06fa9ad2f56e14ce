//! Query and option types for relation lookups.

use serde::{Deserialize, Serialize};

/// Filter options for `RelationIndex::list_relations`.
///
/// `None` means "no filter". `Some` with an empty set matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationQuery {
    /// Domains to include; `None` selects every domain.
    pub domains: Option<Vec<String>>,
    /// Accepted `ListRelation::relation_type` values.
    pub relation_types: Option<Vec<String>>,
    /// Accepted `Entity::entity_type` values of the linked entity.
    pub entity_types: Option<Vec<String>>,
    /// Drop relations whose linked entity is unavailable.
    pub active_only: bool,
}

impl Default for RelationQuery {
    fn default() -> Self {
        Self {
            domains: None,
            relation_types: None,
            entity_types: None,
            active_only: true,
        }
    }
}

impl RelationQuery {
    /// All domains, no type filters, active entities only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domains = Some(vec![domain.into()]);
        self
    }

    pub fn domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = Some(domains.into_iter().map(Into::into).collect());
        self
    }

    pub fn relation_types<I, S>(mut self, relation_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_types = Some(relation_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn entity_types<I, S>(mut self, entity_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_types = Some(entity_types.into_iter().map(Into::into).collect());
        self
    }

    /// Keeps relations to unavailable entities.
    pub fn include_inactive(mut self) -> Self {
        self.active_only = false;
        self
    }

    pub(crate) fn selects_domain(&self, domain: &str) -> bool {
        allows(self.domains.as_deref(), domain)
    }

    pub(crate) fn selects_relation_type(&self, relation_type: &str) -> bool {
        allows(self.relation_types.as_deref(), relation_type)
    }
}

pub(crate) fn allows(filter: Option<&[String]>, value: &str) -> bool {
    filter.map_or(true, |accepted| accepted.iter().any(|item| item == value))
}

/// When per-domain linking and sorting happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// On first access to each domain.
    #[default]
    Lazy,
    /// For every domain while the index is built.
    Eager,
}

/// Construction options for `RelationIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexOptions {
    #[serde(default)]
    pub resolve: ResolveMode,
}

impl IndexOptions {
    pub fn eager() -> Self {
        Self {
            resolve: ResolveMode::Eager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{allows, IndexOptions, RelationQuery, ResolveMode};

    #[test]
    fn default_query_selects_everything_active() {
        let query = RelationQuery::new();
        assert!(query.active_only);
        assert!(query.selects_domain("text"));
        assert!(query.selects_relation_type("promotion"));
    }

    #[test]
    fn empty_filter_matches_nothing() {
        let empty: Vec<String> = Vec::new();
        assert!(!allows(Some(empty.as_slice()), "default"));
        assert!(allows(None, "default"));
    }

    #[test]
    fn builder_sets_filters() {
        let query = RelationQuery::new()
            .domains(["text", "media"])
            .relation_types(["default"])
            .include_inactive();

        assert!(query.selects_domain("media"));
        assert!(!query.selects_domain("price"));
        assert!(!query.selects_relation_type("promotion"));
        assert!(!query.active_only);
        assert_eq!(query.entity_types, None);
    }

    #[test]
    fn options_decode_resolve_mode() {
        let options: IndexOptions =
            serde_json::from_value(serde_json::json!({ "resolve": "eager" }))
                .expect("options should decode");
        assert_eq!(options, IndexOptions::eager());

        let options: IndexOptions =
            serde_json::from_value(serde_json::json!({})).expect("empty options should decode");
        assert_eq!(options.resolve, ResolveMode::Lazy);
    }
}
