//! Referenced entity contract and the stock `RefItem` record.
//!
//! # Responsibility
//! - Define what the resolution engine needs from any domain object.
//! - Provide a concrete serde-friendly entity for loaders without their
//!   own domain types.
//!
//! # Invariants
//! - `Entity::id` is stable within the entity's domain.
//! - Optional capabilities (`entity_type`, `content`) default to absent;
//!   absent capabilities make an entity non-matching, never an error.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Read-only view the engine needs from a referenced object.
pub trait Entity {
    /// Stable id within the entity's domain.
    fn id(&self) -> &str;

    /// Whether the entity is currently eligible to be shown or used.
    fn is_available(&self) -> bool;

    /// Declared entity type, e.g. `name` or `short` for texts.
    ///
    /// Entities without a type never match an entity-type filter.
    fn entity_type(&self) -> Option<&str> {
        None
    }

    /// Textual content, used when an item derives its display text.
    fn content(&self) -> Option<&str> {
        None
    }
}

/// Publication status of a `RefItem`, stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum ItemStatus {
    /// Code `1`. The only available state.
    #[default]
    Enabled,
    /// Code `0`.
    Disabled,
    /// Code `-1`. Waiting for editorial review.
    Review,
    /// Code `-2`.
    Archived,
}

impl ItemStatus {
    pub fn code(self) -> i8 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
            Self::Review => -1,
            Self::Archived => -2,
        }
    }
}

impl From<ItemStatus> for i8 {
    fn from(value: ItemStatus) -> Self {
        value.code()
    }
}

impl TryFrom<i8> for ItemStatus {
    type Error = UnknownStatusCode;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Enabled),
            0 => Ok(Self::Disabled),
            -1 => Ok(Self::Review),
            -2 => Ok(Self::Archived),
            other => Err(UnknownStatusCode(other)),
        }
    }
}

/// Status code outside the known `1..=-2` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatusCode(pub i8);

impl Display for UnknownStatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown item status code: {}", self.0)
    }
}

impl Error for UnknownStatusCode {}

/// Generic referenced item (text, media, attribute, ...).
///
/// Which fields matter depends on the domain: texts carry `content`,
/// media and attributes usually only a `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefItem {
    pub id: String,
    /// Serialized as `type` to match loader naming.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
}

impl RefItem {
    /// Creates an enabled, untyped item without content.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            label: String::new(),
            content: None,
            status: ItemStatus::Enabled,
        }
    }

    /// Shorthand for a typed text entity.
    pub fn text(
        id: impl Into<String>,
        kind: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(id).with_kind(kind).with_content(content)
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

impl Entity for RefItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_available(&self) -> bool {
        self.status == ItemStatus::Enabled
    }

    fn entity_type(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}
