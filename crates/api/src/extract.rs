//! Request extractors whose rejections use the API's JSON error shape.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections (bad syntax, wrong field types, missing
/// content type) turned into [`AppError`] instead of axum's plain-text body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
