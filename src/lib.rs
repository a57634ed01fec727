// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Taskboard - multi-tenant task and project service
//!
//! Every request flows through the same pipeline: bearer token extraction,
//! HS256 verification, principal lookup, optional role gate, body schema
//! validation, handler, and a single translation of the outcome into the
//! JSON response envelope.
//!
//! ## Modules
//!
//! - `api` - HTTP routes and the outer fault boundary (Axum)
//! - `auth` - Token verification, principal resolution, role gates
//! - `validation` - Declarative request body schemas
//! - `envelope` / `error` - Wire envelope and error translation
//! - `store` - In-memory accounts, tasks and projects

pub mod api;
pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

use uuid::Uuid;

use crate::auth::{
    password::{hash_password, normalize_email},
    Role,
};
use crate::config::SeedAdmin;
use crate::store::{InMemoryStore, NewUser, StoreError};

/// Create the configured admin account unless the email is already taken.
pub fn seed_admin(store: &mut InMemoryStore, seed: &SeedAdmin) -> anyhow::Result<()> {
    let email = normalize_email(&seed.email);
    let password_hash = hash_password(&seed.password)?;

    match store.create_user(NewUser {
        id: Uuid::new_v4(),
        email,
        password_hash,
        role: Role::Admin,
    }) {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "seeded admin account");
            Ok(())
        }
        Err(StoreError::Duplicate(_)) => {
            tracing::info!("seed admin already present");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_admin_is_idempotent() {
        let mut store = InMemoryStore::new();
        let seed = SeedAdmin {
            email: " Root@Example.com".to_string(),
            password: "bootstrap-password".to_string(),
        };

        seed_admin(&mut store, &seed).unwrap();
        seed_admin(&mut store, &seed).unwrap();

        let admin = store.user_by_email("root@example.com").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(auth::password::verify_password(
            "bootstrap-password",
            &admin.password_hash
        ));
    }
}
