// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{Authenticator, PrincipalStore, TokenIssuer};
use crate::config::AuthSettings;
use crate::store::InMemoryStore;

/// Shared application state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub authenticator: Arc<Authenticator>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    /// The store doubles as the principal store for authentication.
    pub fn new(store: InMemoryStore, settings: &AuthSettings) -> Self {
        let store = Arc::new(RwLock::new(store));
        let principals: Arc<dyn PrincipalStore> = store.clone();
        Self::with_principal_store(store, principals, settings)
    }

    /// Authenticate against a different principal store than the one
    /// handlers write to.
    pub fn with_principal_store(
        store: Arc<RwLock<InMemoryStore>>,
        principals: Arc<dyn PrincipalStore>,
        settings: &AuthSettings,
    ) -> Self {
        Self {
            store,
            authenticator: Arc::new(Authenticator::from_parts(
                &settings.secret,
                principals,
                settings.lookup_timeout,
            )),
            issuer: Arc::new(TokenIssuer::new(&settings.secret, settings.token_ttl)),
        }
    }
}
