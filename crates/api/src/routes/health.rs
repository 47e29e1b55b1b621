//! Liveness and catalog readiness at `/health`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Readiness of the catalog backend.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the catalog can serve requests, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Embedded migrations not yet applied; absent when the database is unreachable.
    pub pending_migrations: Option<usize>,
    pub catalog_ready: bool,
}

/// GET /health
///
/// Responds 503 until the database is reachable and every migration has run.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_healthy = vinyl_db::health_check(&state.pool).await.is_ok();

    let pending_migrations = if db_healthy {
        match vinyl_db::pending_migrations(&state.pool).await {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(error = %err, "Could not read migration history");
                None
            }
        }
    } else {
        None
    };

    let catalog_ready = pending_migrations == Some(0);
    let (code, status) = if catalog_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            pending_migrations,
            catalog_ready,
        }),
    )
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
