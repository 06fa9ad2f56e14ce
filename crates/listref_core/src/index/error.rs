//! Construction-time errors for `RelationIndex`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type IndexResult<T> = Result<T, IndexError>;

/// Malformed association data rejected while building an index.
///
/// Read operations never produce errors; this type only appears at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A relation or entity domain name is blank after trim.
    BlankDomain,
    /// A relation record has a blank `id`.
    BlankRelationId { domain: String },
    /// A relation is stored under a key different from its `id`.
    RelationKeyMismatch {
        domain: String,
        key: String,
        id: String,
    },
    /// A relation has a blank `ref_id`.
    BlankRefId { domain: String, id: String },
    /// An entity is stored under a key different from its `id()`.
    EntityKeyMismatch {
        domain: String,
        key: String,
        id: String,
    },
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankDomain => write!(f, "domain name must not be blank"),
            Self::BlankRelationId { domain } => {
                write!(f, "relation id must not be blank in domain `{domain}`")
            }
            Self::RelationKeyMismatch { domain, key, id } => write!(
                f,
                "relation `{id}` stored under key `{key}` in domain `{domain}`"
            ),
            Self::BlankRefId { domain, id } => write!(
                f,
                "relation `{id}` in domain `{domain}` has a blank ref_id"
            ),
            Self::EntityKeyMismatch { domain, key, id } => write!(
                f,
                "entity `{id}` stored under key `{key}` in domain `{domain}`"
            ),
        }
    }
}

impl Error for IndexError {}

#[cfg(test)]
mod tests {
    use super::IndexError;

    #[test]
    fn messages_name_domain_and_id() {
        let err = IndexError::BlankRefId {
            domain: "media".to_string(),
            id: "l9".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("media"));
        assert!(message.contains("l9"));
    }
}
