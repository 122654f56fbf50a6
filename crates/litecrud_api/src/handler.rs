//! Generic resource handlers.
//!
//! Store calls are blocking, so every handler moves its repository call
//! onto the blocking pool and awaits the result.

use crate::error::{ApiError, ApiResult};
use crate::router::ResourceState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use litecrud_core::{Entity, EntityId, PageRequest, PagedResult, RepoResult, SortOrder};
use log::info;
use serde::Deserialize;
use serde_json::json;

/// Entity types that can be mounted as a REST resource.
pub trait ApiEntity: Entity + Clone + Send + Sync + 'static {}

impl<T> ApiEntity for T where T: Entity + Clone + Send + Sync + 'static {}

/// Query string accepted by the paged listing route.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub order_by: Option<String>,
    /// `asc` or `desc`; ascending when absent.
    pub sort: Option<String>,
}

impl PageParams {
    pub fn into_request(self) -> ApiResult<PageRequest> {
        let defaults = PageRequest::default();
        let sort_order = match self.sort.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") | Some("ascending") => SortOrder::Ascending,
            Some("desc") | Some("descending") => SortOrder::Descending,
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "unsupported sort `{other}`; expected asc|desc"
                )))
            }
        };

        Ok(PageRequest {
            page_number: self.page.unwrap_or(defaults.page_number),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            filter: None,
            order_by: self.order_by.filter(|field| !field.trim().is_empty()),
            sort_order,
        })
    }
}

async fn run_blocking<R, F>(task: F) -> ApiResult<R>
where
    F: FnOnce() -> RepoResult<R> + Send + 'static,
    R: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?;
    Ok(outcome?)
}

fn not_found<T: Entity>(id: EntityId) -> ApiError {
    ApiError::NotFound(format!("{} {id} not found", T::COLLECTION))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "core_version": litecrud_core::core_version(),
    }))
}

pub async fn list<T: ApiEntity>(State(state): State<ResourceState<T>>) -> ApiResult<Json<Vec<T>>> {
    let repo = state.repo.clone();
    let items = run_blocking(move || repo.read_all()).await?;
    Ok(Json(items))
}

pub async fn paged<T: ApiEntity>(
    State(state): State<ResourceState<T>>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResult<T>>> {
    let request = params.into_request()?;
    let repo = state.repo.clone();
    let page = run_blocking(move || repo.get_paged(&request)).await?;
    Ok(Json(page))
}

pub async fn get_one<T: ApiEntity>(
    State(state): State<ResourceState<T>>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<T>> {
    let repo = state.repo.clone();
    run_blocking(move || repo.read(id))
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<T>(id))
}

pub async fn create<T: ApiEntity>(
    State(state): State<ResourceState<T>>,
    Json(mut item): Json<T>,
) -> ApiResult<impl IntoResponse> {
    let repo = state.repo.clone();
    let (id, item) = run_blocking(move || {
        let id = repo.create(&mut item)?;
        Ok((id, item))
    })
    .await?;

    info!(
        "event=entity_created module=api status=ok collection={} id={id}",
        T::COLLECTION
    );
    let location = format!("{}/{id}", state.base_path);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

pub async fn update<T: ApiEntity>(
    State(state): State<ResourceState<T>>,
    Path(id): Path<EntityId>,
    Json(item): Json<T>,
) -> ApiResult<StatusCode> {
    if item.id() != id {
        return Err(ApiError::BadRequest(format!(
            "body id {} does not match path id {id}",
            item.id()
        )));
    }

    let repo = state.repo.clone();
    if run_blocking(move || repo.update(&item)).await? {
        info!(
            "event=entity_updated module=api status=ok collection={} id={id}",
            T::COLLECTION
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<T>(id))
    }
}

pub async fn delete<T: ApiEntity>(
    State(state): State<ResourceState<T>>,
    Path(id): Path<EntityId>,
) -> ApiResult<StatusCode> {
    let repo = state.repo.clone();
    let removed = run_blocking(move || repo.delete(id)).await?;
    info!(
        "event=entity_deleted module=api status=ok collection={} id={id} removed={removed}",
        T::COLLECTION
    );
    Ok(StatusCode::NO_CONTENT)
}
