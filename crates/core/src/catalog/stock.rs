//! Bounded stock adjustments.
//!
//! A delta is validated on its own first (it must be present and non-zero),
//! then checked against the current stock. The database applies the same
//! bounds inside a single conditional `UPDATE`, so these functions also
//! produce the error reported when that update is refused.

use crate::error::CoreError;
use crate::types::DbId;

/// Lowest stock a product may hold.
pub const MIN_STOCK: i32 = 0;

/// Highest stock a product may reach through an adjustment.
pub const MAX_STOCK: i32 = 1000;

/// Reject ids that cannot reference a row (BIGSERIAL starts at 1).
pub fn ensure_positive_id(id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::Validation(
            "ID must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// A signed, non-zero change to a product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDelta(i32);

impl StockDelta {
    /// Build a delta from the request quantity.
    ///
    /// An absent quantity and a zero quantity are both rejected: a no-op
    /// adjustment is treated as a caller mistake.
    pub fn new(quantity: Option<i32>) -> Result<Self, CoreError> {
        match quantity {
            None => Err(CoreError::Validation(
                "Quantity is required to update the stock".to_string(),
            )),
            Some(0) => Err(CoreError::Validation(
                "Quantity cannot be zero".to_string(),
            )),
            Some(q) => Ok(Self(q)),
        }
    }

    pub fn quantity(self) -> i32 {
        self.0
    }

    /// Compute the stock that results from applying this delta to `current`.
    pub fn apply(self, current: i32) -> Result<i32, CoreError> {
        let new_stock = i64::from(current) + i64::from(self.0);

        if new_stock > i64::from(MAX_STOCK) {
            return Err(CoreError::Validation(format!(
                "Stock cannot exceed {MAX_STOCK} units (current {current}, change {})",
                self.0
            )));
        }
        if new_stock < i64::from(MIN_STOCK) {
            return Err(CoreError::Validation(format!(
                "Stock cannot be negative (current {current}, change {})",
                self.0
            )));
        }

        // Bounded by MIN_STOCK..=MAX_STOCK above, so the narrowing is lossless.
        Ok(new_stock as i32)
    }
}
