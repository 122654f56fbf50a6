use crate::config::ServerConfig;
use crate::handler::{self, ApiEntity};
use axum::routing::get;
use axum::Router;
use litecrud_core::{EntityRepository, Product};
use std::path::PathBuf;

/// Per-resource handler state.
pub struct ResourceState<T> {
    pub repo: EntityRepository<T>,
    /// Public path the resource is mounted at, used for `Location` headers.
    pub base_path: &'static str,
}

impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            base_path: self.base_path,
        }
    }
}

/// Builds the CRUD routes for `T`, to be nested at `base_path`.
pub fn resource_router<T: ApiEntity>(base_path: &'static str, db_path: impl Into<PathBuf>) -> Router {
    let state = ResourceState {
        repo: EntityRepository::<T>::new(db_path),
        base_path,
    };

    Router::new()
        .route("/", get(handler::list::<T>).post(handler::create::<T>))
        .route("/paged", get(handler::paged::<T>))
        .route(
            "/:id",
            get(handler::get_one::<T>)
                .put(handler::update::<T>)
                .delete(handler::delete::<T>),
        )
        .with_state(state)
}

/// Build the axum router with every mounted resource.
pub fn build_router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .nest(
            "/api/products",
            resource_router::<Product>("/api/products", config.db_path.clone()),
        )
}
