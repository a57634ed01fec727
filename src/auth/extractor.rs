// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated principals.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is Principal
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Principal};
use crate::state::AppState;

/// Extractor for the authenticated principal.
///
/// Reads the principal attached by the
/// [`authenticate`](super::middleware::authenticate) middleware. On routes
/// mounted without it, runs the authentication stages itself and caches
/// the result in request extensions, so a request is authenticated at most
/// once.
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the principal
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(Auth(principal));
        }

        let principal = state.authenticator.authenticate(&parts.headers).await?;
        parts.extensions.insert(principal.clone());

        Ok(Auth(principal))
    }
}
