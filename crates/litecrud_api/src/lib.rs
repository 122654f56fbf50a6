//! REST surface for the LiteCrud store.
//!
//! Every resource is served by the same generic handlers, parameterized by
//! the entity type mounted at that path.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use router::{build_router, resource_router, ResourceState};
pub use server::ApiServer;
