// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated principal representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;
use crate::models::User;

/// Claims carried by a bearer token.
///
/// Only `sub` is consumed, and only to look the account up. Nothing here is
/// used for authorization: the role is always re-read from the store so a
/// demoted account cannot keep acting on an older token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: Uuid,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// The authenticated actor of a request.
///
/// Built from a store record by [`From<User>`], which is the only place a
/// stored account crosses into request context. The type has no secret
/// fields, so nothing it is serialized into can leak a password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    /// Account ID
    pub id: Uuid,
    /// Normalized email address
    pub email: String,
    /// Role as stored at resolution time
    pub role: Role,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl Principal {
    /// Check if this principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
