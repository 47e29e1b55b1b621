//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::Json;
use vinyl_core::error::CoreError;
use vinyl_db::models::user::UserResponse;
use vinyl_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/users/{email}
pub async fn get_by_email(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundBy {
                entity: "User",
                field: "email",
                value: email.clone(),
            })
        })?;
    Ok(Json(UserResponse::from(user)))
}
