//! Repository layer over the document store.
//!
//! # Responsibility
//! - Expose use-case oriented CRUD and paging APIs for any entity type.
//! - Keep store handle lifetimes and SQL details out of callers.
//!
//! # Invariants
//! - Repository APIs report missing ids as absent results, not errors.
//! - Configuration and store failures propagate without retries.

pub mod entity_repo;
pub mod page;
