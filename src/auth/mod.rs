// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and role gating for the Taskboard API.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Bearer <JWT>` (issued by `/users/login`)
//! 2. Server runs, once per request:
//!    - [`extract_bearer`] pulls the credential out of the headers
//!    - [`TokenVerifier`] checks the HS256 signature and expiry
//!    - [`PrincipalResolver`] loads the account from the principal store
//! 3. The resolved [`Principal`] is placed in request extensions
//! 4. Routes that carry an [`AuthorizationGate`] check the stored role
//!
//! ## Security
//!
//! - Roles come from the store, never from token claims
//! - Every token failure surfaces as the same 401
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod issuer;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod roles;
pub mod token;

use std::sync::Arc;

use axum::http::HeaderMap;

pub use claims::{Claims, Principal};
pub use error::AuthError;
pub use extractor::Auth;
pub use gate::AuthorizationGate;
pub use issuer::TokenIssuer;
pub use resolver::{PrincipalResolver, PrincipalStore};
pub use roles::Role;
pub use token::{extract_bearer, Credential, SigningSecret, TokenVerifier};

/// The authentication stages composed in order: extract, verify, resolve.
#[derive(Clone)]
pub struct Authenticator {
    verifier: TokenVerifier,
    resolver: PrincipalResolver,
}

impl Authenticator {
    pub fn new(verifier: TokenVerifier, resolver: PrincipalResolver) -> Self {
        Self { verifier, resolver }
    }

    pub fn from_parts(
        secret: &SigningSecret,
        store: Arc<dyn PrincipalStore>,
        lookup_timeout: std::time::Duration,
    ) -> Self {
        Self::new(
            TokenVerifier::new(secret),
            PrincipalResolver::new(store, lookup_timeout),
        )
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let credential = extract_bearer(headers).ok_or(AuthError::NoCredential)?;
        let claims = self.verifier.verify(&credential)?;
        self.resolver.resolve(&claims).await
    }
}
