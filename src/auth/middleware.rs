// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! Mount with `route_layer` so unmatched paths still fall through to the
//! 404 fallback instead of answering 401:
//!
//! ```rust,ignore
//! let projects = Router::new()
//!     .route("/projects", post(create_project))
//!     .route_layer(from_fn_with_state(AuthorizationGate::ADMIN_ONLY, authorize))
//!     .route_layer(from_fn_with_state(state.clone(), authenticate));
//! ```
//!
//! The last `route_layer` runs first, so authentication always precedes
//! the gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthorizationGate, Principal};
use crate::state::AppState;

/// Run the authentication stages and attach the principal to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.authenticator.authenticate(request.headers()).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Apply a role gate to the principal attached by [`authenticate`].
pub async fn authorize(
    State(gate): State<AuthorizationGate>,
    request: Request,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Principal>() else {
        return AuthError::NoCredential.into_response();
    };

    if let Err(e) = gate.check(principal) {
        return e.into_response();
    }

    next.run(request).await
}
