use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vinyl_db::DbPool,
    /// Server configuration (token issuance reads `config.jwt`).
    pub config: Arc<ServerConfig>,
    /// Verifies bearer tokens for the [`AuthUser`](crate::middleware::auth::AuthUser) extractor.
    pub authenticator: Arc<dyn Authenticator>,
}
