//! Generic entity repository: CRUD facade and paged query engine.
//!
//! # Responsibility
//! - Provide create/read/update/delete/query APIs for any `Entity`.
//! - Compose filter, count, ordering and slicing into one `PagedResult`.
//!
//! # Invariants
//! - Every call acquires its own store handle and releases it before
//!   returning, on success and on failure.
//! - Missing ids are reported as `None`/`false`, never as errors.
//! - `total_count` is computed after filtering and before ordering/slicing.

use crate::model::entity::{ConfigError, Entity, EntityId};
use crate::repo::page::{PageRequest, PagedResult};
use crate::store::{Collection, DocumentStore, Filter, StoreError, StoreResult};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entity type cannot be bound to a collection.
    Config(ConfigError),
    /// Failure raised by the document store, propagated unchanged.
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Config(err) => Self::Config(err),
            other => Self::Store(other),
        }
    }
}

impl From<ConfigError> for RepoError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Repository over the collection bound to `T`, backed by a store file.
pub struct EntityRepository<T> {
    db_path: PathBuf,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityRepository<T> {
    fn clone(&self) -> Self {
        Self {
            db_path: self.db_path.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for EntityRepository<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRepository")
            .field("db_path", &self.db_path)
            .field("entity", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Entity> EntityRepository<T> {
    /// Creates a repository for the store file at `db_path`.
    ///
    /// Nothing is opened until the first operation.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            _entity: PhantomData,
        }
    }

    /// Inserts `entity` and returns the id it was stored under.
    ///
    /// A store-assigned id is also written back into `entity`.
    pub fn create(&self, entity: &mut T) -> RepoResult<EntityId> {
        self.with_collection("create", |collection| collection.insert(entity))
    }

    pub fn read(&self, id: EntityId) -> RepoResult<Option<T>> {
        self.with_collection("read", |collection| collection.find_by_id(id))
    }

    /// Returns every entity, fully materialized, in ascending id order.
    pub fn read_all(&self) -> RepoResult<Vec<T>> {
        self.with_collection("read_all", |collection| collection.find_all())
    }

    /// Replaces the record with the same id; `false` when none existed.
    pub fn update(&self, entity: &T) -> RepoResult<bool> {
        self.with_collection("update", |collection| collection.update(entity))
    }

    /// Removes the record with `id`; `false` when none existed.
    pub fn delete(&self, id: EntityId) -> RepoResult<bool> {
        self.with_collection("delete", |collection| collection.delete(id))
    }

    /// Returns every entity matching `filter`, in ascending id order.
    pub fn query(&self, filter: &Filter) -> RepoResult<Vec<T>> {
        self.with_collection("query", |collection| {
            collection.query().filter(filter.clone()).to_list()
        })
    }

    /// Counts entities matching `filter`, or all entities when `None`.
    pub fn count(&self, filter: Option<&Filter>) -> RepoResult<u64> {
        self.with_collection("count", |collection| {
            let mut query = collection.query();
            if let Some(filter) = filter {
                query = query.filter(filter.clone());
            }
            query.count()
        })
    }

    /// Returns one page of matching entities plus total-count metadata.
    ///
    /// # Contract
    /// - Page number/size are normalized (see `PageRequest`).
    /// - `total_count` ignores the page window.
    /// - A page past the end yields no items but keeps the totals.
    pub fn get_paged(&self, request: &PageRequest) -> RepoResult<PagedResult<T>> {
        let page_number = request.normalized_page_number();
        let page_size = request.normalized_page_size();

        self.with_collection("get_paged", |collection| {
            let mut query = collection.query();
            if let Some(filter) = &request.filter {
                query = query.filter(filter.clone());
            }

            let total_count = query.count()?;

            if let Some(field) = &request.order_by {
                query = query.order_by(field.as_str(), request.sort_order);
            }

            let items = query.skip(request.skip()).limit(page_size).to_list()?;

            Ok(PagedResult {
                items,
                total_count,
                page_number,
                page_size,
            })
        })
    }

    /// Runs `operation` against a freshly opened handle.
    ///
    /// The handle is dropped when this returns, whatever the outcome.
    fn with_collection<R>(
        &self,
        op: &'static str,
        operation: impl FnOnce(&Collection<'_, T>) -> StoreResult<R>,
    ) -> RepoResult<R> {
        let started_at = Instant::now();
        let collection_name = T::COLLECTION;

        let result = DocumentStore::open(&self.db_path).and_then(|store| {
            let collection = store.collection::<T>()?;
            operation(&collection)
        });

        match result {
            Ok(value) => {
                debug!(
                    "event=repo_op module=repo status=ok op={op} collection={collection_name} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event=repo_op module=repo status=error op={op} collection={collection_name} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }
}
