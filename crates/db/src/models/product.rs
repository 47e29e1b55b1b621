//! Product entity model and DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vinyl_core::catalog::product::{
    validate_non_negative_stock, validate_not_blank, validate_positive_price,
};
use vinyl_core::types::{DbId, Timestamp};

/// A product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub artist: String,
    pub genre: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_positive_price"))]
    pub price: Decimal,
    /// Defaults to 0 if omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative_stock"))]
    pub stock: i32,
}

/// DTO for updating an existing product. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_positive_price"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative_stock"))]
    pub stock: Option<i32>,
}

/// Request body for `PATCH /products/{id}/stock`.
///
/// `quantity` is a signed delta; presence and non-zero-ness are checked by
/// `vinyl_core::catalog::stock::StockDelta`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStock {
    pub quantity: Option<i32>,
}
