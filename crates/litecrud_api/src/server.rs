use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::router::build_router;
use log::info;
use tokio::net::TcpListener;

/// LiteCrud REST server.
pub struct ApiServer {
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(&self.config)
    }

    /// Serve requests until the process is stopped.
    pub async fn serve(self) -> ApiResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            "event=server_start module=api status=ok bind_addr={} db_path={}",
            self.config.bind_addr,
            self.config.db_path.display()
        );
        axum::serve(listener, app)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))
    }
}
