//! Relation resolution engine.
//!
//! # Responsibility
//! - Cross-link relations with the entities they reference.
//! - Serve filtered and position-ordered views per domain.
//!
//! # Invariants
//! - Index contents never change after construction.
//! - Lookups never fail; only construction reports `IndexError`.

pub mod error;
pub mod query;
pub mod relation_index;
mod resolve;
