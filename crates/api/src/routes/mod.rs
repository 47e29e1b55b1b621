pub mod auth;
pub mod health;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
///
/// /users/{email}                     get user (requires auth)
///
/// /products                          list, create (requires auth)
/// /products/{id}                     get, update, delete
/// /products/{id}/stock               adjust stock
/// /products/artist/{artist}          find by artist
/// /products/genre/{genre}            find by genre
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // User lookup.
        .nest("/users", users::router())
        // Product catalog.
        .nest("/products", products::router())
}
