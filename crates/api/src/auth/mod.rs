//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Request authentication goes through the [`Authenticator`] trait so the
//! catalog handlers never depend on a particular token format.

pub mod jwt;
pub mod password;

use vinyl_core::error::CoreError;
use vinyl_core::types::DbId;

use self::jwt::{validate_token, JwtConfig};

/// The identity behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub email: String,
}

/// Verifies a bearer token and resolves it to a [`Principal`].
///
/// Implementations must fail with [`CoreError::Unauthorized`] for any token
/// they do not accept.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Principal, CoreError>;
}

/// Accepts HS256 access tokens issued by [`jwt::generate_access_token`].
#[derive(Debug, Clone)]
pub struct JwtAuthenticator {
    config: JwtConfig,
}

impl JwtAuthenticator {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Principal, CoreError> {
        let claims = validate_token(token, &self.config)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

        Ok(Principal {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
