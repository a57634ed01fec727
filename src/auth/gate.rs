// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-route role gate.

use super::{AuthError, Principal, Role};

/// Accepts a principal only if its role is one of the listed roles.
///
/// Matching is exact. A route that should admit both roles lists both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationGate {
    accepted: &'static [Role],
}

impl AuthorizationGate {
    pub const ADMIN_ONLY: AuthorizationGate = AuthorizationGate::any_of(&[Role::Admin]);

    pub const fn any_of(accepted: &'static [Role]) -> Self {
        Self { accepted }
    }

    pub fn check(&self, principal: &Principal) -> Result<(), AuthError> {
        if self.accepted.contains(&principal.role) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %principal.id,
                role = %principal.role,
                "role not accepted by gate"
            );
            Err(AuthError::InsufficientRole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn admin_gate_rejects_user() {
        assert_eq!(
            AuthorizationGate::ADMIN_ONLY.check(&principal(Role::User)),
            Err(AuthError::InsufficientRole)
        );
        assert!(AuthorizationGate::ADMIN_ONLY
            .check(&principal(Role::Admin))
            .is_ok());
    }

    #[test]
    fn user_gate_rejects_admin() {
        let gate = AuthorizationGate::any_of(&[Role::User]);
        assert_eq!(
            gate.check(&principal(Role::Admin)),
            Err(AuthError::InsufficientRole)
        );
        assert!(gate.check(&principal(Role::User)).is_ok());
    }

    #[test]
    fn gate_listing_both_roles_admits_both() {
        let gate = AuthorizationGate::any_of(&[Role::User, Role::Admin]);
        assert!(gate.check(&principal(Role::User)).is_ok());
        assert!(gate.check(&principal(Role::Admin)).is_ok());
    }
}
