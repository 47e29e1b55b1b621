//! Domain rules for the vinyl catalog.
//!
//! This crate has no I/O: it owns the error taxonomy, the query
//! normalization for product listings, pagination metadata, and the stock
//! bounds. Both `vinyl-db` and `vinyl-api` build on it.

pub mod catalog;
pub mod error;
pub mod types;
