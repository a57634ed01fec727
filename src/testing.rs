// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for in-crate tests.

use std::time::Duration;

use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{password::normalize_email, Role, SigningSecret};
use crate::config::AuthSettings;
use crate::models::User;
use crate::state::AppState;
use crate::store::{InMemoryStore, NewUser};

pub(crate) const TEST_SECRET: &str = "taskboard-test-secret-0123456789";

/// Stands in for a real hash on accounts that never log in.
const PLACEHOLDER_HASH: &str = "pbkdf2-sha256$1$AAAAAAAAAAAAAAAAAAAAAA==$AAAA";

pub(crate) fn test_settings() -> AuthSettings {
    AuthSettings {
        secret: SigningSecret::from(TEST_SECRET),
        token_ttl: Duration::from_secs(3600),
        lookup_timeout: Duration::from_secs(1),
    }
}

pub(crate) fn test_state() -> AppState {
    AppState::new(InMemoryStore::new(), &test_settings())
}

/// Insert an account directly and issue a token for it.
pub(crate) async fn seed_user(state: &AppState, email: &str, role: Role) -> (User, String) {
    let user = state
        .store
        .write()
        .await
        .create_user(NewUser {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash: PLACEHOLDER_HASH.to_string(),
            role,
        })
        .unwrap();
    let token = state.issuer.issue(user.id).unwrap();
    (user, token)
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub(crate) async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
