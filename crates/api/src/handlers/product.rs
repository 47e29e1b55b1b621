//! Handlers for the `/products` resource.
//!
//! Every check on the request runs before the first write, so a rejected
//! request never has partial effect.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vinyl_core::catalog::page::Page;
use vinyl_core::catalog::product::validate_not_blank;
use vinyl_core::catalog::query::{ProductListParams, ProductQuery};
use vinyl_core::catalog::stock::{ensure_positive_id, StockDelta};
use vinyl_core::error::CoreError;
use vinyl_core::types::DbId;
use vinyl_db::models::product::{AdjustStock, CreateProduct, Product, UpdateProduct};
use vinyl_db::repositories::product_repo::UQ_TITLE_ARTIST;
use vinyl_db::repositories::{ProductRepo, StockAdjustment};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

/// Translate a `(title, artist)` unique violation into a conflict.
///
/// The pair is named only when the request supplied both halves of it.
fn map_duplicate(err: sqlx::Error, title: Option<&str>, artist: Option<&str>) -> AppError {
    if vinyl_db::is_unique_violation(&err, UQ_TITLE_ARTIST) {
        let message = match (title, artist) {
            (Some(title), Some(artist)) => format!("Product already exists: {title} by {artist}"),
            _ => "Another product already has this title and artist".to_string(),
        };
        AppError::Core(CoreError::Conflict(message))
    } else {
        AppError::Database(err)
    }
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    input.validate()?;

    let product = ProductRepo::create(&state.pool, &input)
        .await
        .map_err(|e| map_duplicate(e, Some(input.title.as_str()), Some(input.artist.as_str())))?;

    tracing::info!(user_id = user.user_id, product_id = product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products
///
/// Raw query parameters are validated into a [`ProductQuery`] before the
/// database is touched.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<Page<Product>>> {
    let query = ProductQuery::from_params(&params)?;
    let page = ProductRepo::list_page(&state.pool, &query).await?;
    Ok(Json(page))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Product>> {
    ensure_positive_id(id)?;
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// PATCH /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<Json<Product>> {
    ensure_positive_id(id)?;
    input.validate()?;

    let product = ProductRepo::update(&state.pool, id, &input)
        .await
        .map_err(|e| map_duplicate(e, input.title.as_deref(), input.artist.as_deref()))?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = user.user_id, product_id = id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/v1/products/{id}
///
/// Returns the removed product.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Product>> {
    ensure_positive_id(id)?;
    let product = ProductRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = user.user_id, product_id = id, "Product deleted");
    Ok(Json(product))
}

/// PATCH /api/v1/products/{id}/stock
///
/// Applies a signed `quantity` to the product's stock. The result must stay
/// within `0..=1000`; a refused adjustment leaves the stock unchanged.
/// An unknown product is reported before a missing or zero quantity.
pub async fn adjust_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<AdjustStock>,
) -> AppResult<Json<Product>> {
    ensure_positive_id(id)?;
    let delta = match StockDelta::new(input.quantity) {
        Ok(delta) => delta,
        Err(err) => {
            ProductRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            return Err(err.into());
        }
    };

    match ProductRepo::adjust_stock(&state.pool, id, delta).await? {
        StockAdjustment::Applied(product) => {
            tracing::info!(
                user_id = user.user_id,
                product_id = id,
                quantity = delta.quantity(),
                stock = product.stock,
                "Stock adjusted"
            );
            Ok(Json(product))
        }
        StockAdjustment::NotFound => Err(not_found(id)),
        StockAdjustment::OutOfBounds { current } => {
            // The refusal and this read are separate statements; a concurrent
            // adjustment may have moved the stock back into range meanwhile.
            delta.apply(current)?;
            Err(AppError::Core(CoreError::Conflict(
                "Stock changed during the adjustment, retry the request".into(),
            )))
        }
    }
}

/// GET /api/v1/products/artist/{artist}
pub async fn find_by_artist(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(artist): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    validate_not_blank(&artist)
        .map_err(|_| CoreError::Validation("artist must not be empty".into()))?;
    let products = ProductRepo::find_by_artist(&state.pool, artist.trim()).await?;
    Ok(Json(products))
}

/// GET /api/v1/products/genre/{genre}
pub async fn find_by_genre(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(genre): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    validate_not_blank(&genre)
        .map_err(|_| CoreError::Validation("genre must not be empty".into()))?;
    let products = ProductRepo::find_by_genre(&state.pool, genre.trim()).await?;
    Ok(Json(products))
}
