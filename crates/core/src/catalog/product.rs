//! Field-level checks for product request DTOs.
//!
//! These have the shape `validator` expects for `#[validate(custom(...))]`,
//! so the DTOs in `vinyl-db` can derive `Validate` and call them directly.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Text must contain at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be empty"));
    }
    Ok(())
}

/// Decimal places stored for a price (`NUMERIC(10, 2)`).
pub const PRICE_SCALE: u32 = 2;

/// Smallest price the column cannot hold (10^8).
pub const PRICE_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Prices must be strictly positive and representable as `NUMERIC(10, 2)`
/// without rounding.
pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(error("price", "Price must be greater than 0"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(error("price", "Price cannot have more than 2 decimal places"));
    }
    if *price >= PRICE_LIMIT {
        return Err(error("price", "Price must be less than 100000000"));
    }
    Ok(())
}

/// Stock set directly (on create or update) may not be negative.
pub fn validate_non_negative_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        return Err(error("stock", "Stock cannot be negative"));
    }
    Ok(())
}
