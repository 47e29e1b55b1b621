//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /{email}  -> get_by_email
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{email}", get(user::get_by_email))
}
