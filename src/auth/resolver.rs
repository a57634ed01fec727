// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Principal lookup from verified claims.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use uuid::Uuid;

use super::{AuthError, Claims, Principal};
use crate::{models::User, store::StoreError};

/// Default bound on a single principal lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Read-only account lookup used on the authentication path.
///
/// - `Ok(Some(_))`: account exists
/// - `Ok(None)`: no such account (deleted since the token was issued)
/// - `Err(_)`: backend failure
pub trait PrincipalStore: Send + Sync {
    fn find_by_id<'a>(
        &'a self,
        id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>>;
}

#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn PrincipalStore>,
    timeout: Duration,
}

impl PrincipalResolver {
    pub fn new(store: Arc<dyn PrincipalStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Fetch the account named by `claims.sub` and strip it down to a
    /// [`Principal`]. Performs no writes.
    pub async fn resolve(&self, claims: &Claims) -> Result<Principal, AuthError> {
        match tokio::time::timeout(self.timeout, self.store.find_by_id(claims.sub)).await {
            Ok(Ok(Some(user))) => Ok(Principal::from(user)),
            Ok(Ok(None)) => {
                tracing::debug!(user_id = %claims.sub, "token subject not found");
                Err(AuthError::PrincipalNotFound)
            }
            Ok(Err(e)) => Err(AuthError::StoreUnavailable(e.to_string())),
            Err(_) => Err(AuthError::StoreUnavailable(format!(
                "lookup exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use chrono::Utc;

    /// Store double with a single account and a configurable delay.
    struct FixedStore {
        user: Option<User>,
        delay: Duration,
        fail: bool,
    }

    impl PrincipalStore for FixedStore {
        fn find_by_id<'a>(
            &'a self,
            id: Uuid,
        ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                if self.fail {
                    return Err(StoreError::Unavailable("pool exhausted".into()));
                }
                Ok(self.user.clone().filter(|u| u.id == id))
            })
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "secret-hash".into(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    fn claims_for(sub: Uuid) -> Claims {
        Claims { sub, iat: 0, exp: 0 }
    }

    fn resolver(store: FixedStore) -> PrincipalResolver {
        PrincipalResolver::new(Arc::new(store), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn resolves_existing_account() {
        let user = user();
        let id = user.id;
        let resolver = resolver(FixedStore {
            user: Some(user),
            delay: Duration::ZERO,
            fail: false,
        });

        let principal = resolver.resolve(&claims_for(id)).await.unwrap();
        assert_eq!(principal.id, id);
        assert_eq!(principal.role, Role::User);
    }

    #[tokio::test]
    async fn missing_account_is_principal_not_found() {
        let resolver = resolver(FixedStore {
            user: Some(user()),
            delay: Duration::ZERO,
            fail: false,
        });

        let err = resolver.resolve(&claims_for(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err, AuthError::PrincipalNotFound);
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let user = user();
        let id = user.id;
        let resolver = resolver(FixedStore {
            user: Some(user),
            delay: Duration::from_secs(5),
            fail: false,
        });

        let err = resolver.resolve(&claims_for(id)).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn store_failure_is_store_unavailable() {
        let resolver = resolver(FixedStore {
            user: None,
            delay: Duration::ZERO,
            fail: true,
        });

        let err = resolver.resolve(&claims_for(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }
}
