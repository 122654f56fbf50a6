//! Generic CRUD layer over an embedded document store.
//! Every entity type maps to one named collection; the repository adds
//! filtered, ordered and paged queries on top of plain CRUD.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_console_logging, init_logging, logging_status};
pub use model::entity::{
    resolve_collection, CollectionName, ConfigError, Entity, EntityId, UNASSIGNED_ID,
};
pub use model::product::Product;
pub use repo::entity_repo::{EntityRepository, RepoError, RepoResult};
pub use repo::page::{PageRequest, PagedResult, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
pub use store::filter::CompareOp;
pub use store::{Collection, DocumentStore, Filter, Query, SortOrder, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
