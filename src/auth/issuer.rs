// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance for the signup and login endpoints.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use super::{token::SigningSecret, Claims};
use crate::error::ApiError;

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a token for `user_id` valid for the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            ApiError::Internal(format!("failed to sign token: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{extract_bearer, TokenVerifier};
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let secret = SigningSecret::from("issuer-test-secret-0123456789");
        let issuer = TokenIssuer::new(&secret, Duration::from_secs(600));
        let verifier = TokenVerifier::new(&secret);
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let claims = verifier.verify(&extract_bearer(&headers).unwrap()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 600);
    }
}
