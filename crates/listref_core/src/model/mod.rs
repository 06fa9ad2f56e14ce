//! Records and item contracts shared by the resolution engine.
//!
//! # Responsibility
//! - Define relation records, the entity contract and the item facade.
//!
//! # Invariants
//! - Every record is identified by a stable id within its domain.
//! - Availability is decided by the entity itself, never by the engine.

pub mod entity;
pub mod item;
pub mod relation;
