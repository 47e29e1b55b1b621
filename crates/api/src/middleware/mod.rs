//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer token.

pub mod auth;
