// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ApiError;

/// Authentication error type.
///
/// Token problems are coarse: a malformed token, a bad
/// signature and an expired token are all `InvalidToken`. The detailed
/// reason is only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer <token>` header
    #[error("No bearer credential supplied")]
    NoCredential,
    /// Token failed verification (structure, signature or expiry)
    #[error("Bearer token failed verification")]
    InvalidToken,
    /// Token verified but the account no longer exists
    #[error("Token subject no longer exists")]
    PrincipalNotFound,
    /// Login with an unknown email or a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Principal role is not accepted by the route's gate
    #[error("Role not accepted for this route")]
    InsufficientRole,
    /// Principal store failed or timed out
    #[error("Principal store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoCredential => "no_credential",
            AuthError::InvalidToken => "invalid_token",
            AuthError::PrincipalNotFound => "principal_not_found",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InsufficientRole => "insufficient_role",
            AuthError::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoCredential
            | AuthError::InvalidToken
            | AuthError::PrincipalNotFound
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
