use std::sync::Arc;

use askboard_qa::QaFacade;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks).
    pub pool: askboard_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Q&A facade every handler goes through.
    pub qa: Arc<QaFacade>,
}
