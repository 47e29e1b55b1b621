//! Catalog rules: listing queries, pagination, stock bounds and product
//! field checks.
//!
//! - [`query`] -- normalizes raw list parameters into a [`query::ProductQuery`].
//! - [`page`] -- pagination metadata derived from a total count.
//! - [`stock`] -- bounded stock deltas.
//! - [`product`] -- per-field validators used by the request DTOs.

pub mod page;
pub mod product;
pub mod query;
pub mod stock;
