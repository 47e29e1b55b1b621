//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod product_repo;
pub mod user_repo;

pub use product_repo::{ProductRepo, StockAdjustment};
pub use user_repo::UserRepo;
