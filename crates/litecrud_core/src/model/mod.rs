//! Entity model and collection bindings.
//!
//! # Responsibility
//! - Define the capability every persisted type implements.
//! - Provide the sample `Product` entity used by the console and REST surfaces.
//!
//! # Invariants
//! - Every entity is identified by a stable integer `EntityId`.
//! - Collection bindings are static and never change at runtime.

pub mod entity;
pub mod product;
