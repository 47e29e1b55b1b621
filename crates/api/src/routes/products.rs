//! Route definitions for the `/products` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete
/// PATCH  /{id}/stock        -> adjust_stock
/// GET    /artist/{artist}   -> find_by_artist
/// GET    /genre/{genre}     -> find_by_genre
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list).post(product::create))
        .route(
            "/{id}",
            get(product::get_by_id)
                .patch(product::update)
                .delete(product::delete),
        )
        .route("/{id}/stock", patch(product::adjust_stock))
        .route("/artist/{artist}", get(product::find_by_artist))
        .route("/genre/{genre}", get(product::find_by_genre))
}
