// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential extraction and token verification.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::{AuthError, Claims};

/// Clock skew tolerance (60 seconds).
pub const CLOCK_SKEW_LEEWAY: u64 = 60;

/// HS256 signing secret shared by the verifier and the issuer.
///
/// Supplied once at startup and passed explicitly to the components that
/// need it.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SigningSecret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}

/// Opaque bearer string pulled out of a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Pull the bearer credential out of request headers.
///
/// A missing header, a non-Bearer scheme and an empty token are all
/// reported as `None`.
pub fn extract_bearer(headers: &HeaderMap) -> Option<Credential> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(Credential(token.to_string()))
    }
}

/// Verifies HS256 tokens produced by [`TokenIssuer`](super::issuer::TokenIssuer)
/// or any other signer holding the same secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, then decode the claims.
    pub fn verify(&self, credential: &Credential) -> Result<Claims, AuthError> {
        decode::<Claims>(credential.as_str(), &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "bearer token rejected");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret-with-enough-bytes";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn sign(claims: &Claims, secret: &str) -> Credential {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        Credential(token)
    }

    fn claims_expiring_in(seconds: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            iat: now,
            exp: now + seconds,
        }
    }

    #[test]
    fn extracts_bearer_token() {
        let credential = extract_bearer(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(credential.as_str(), "abc.def.ghi");
    }

    #[test]
    fn absent_for_missing_header_wrong_scheme_or_empty_token() {
        assert!(extract_bearer(&HeaderMap::new()).is_none());
        assert!(extract_bearer(&headers_with("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_bearer(&headers_with("Bearer ")).is_none());
        assert!(extract_bearer(&headers_with("Bearer    ")).is_none());
        assert!(extract_bearer(&headers_with("abc.def.ghi")).is_none());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential("abc.def.ghi".to_string());
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(
            format!("{:?}", SigningSecret::from(SECRET)),
            "SigningSecret(***)"
        );
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let claims = claims_expiring_in(3600);
        let verified = verifier.verify(&sign(&claims, SECRET)).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn wrong_signature_is_invalid_token() {
        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let credential = sign(&claims_expiring_in(3600), "some-other-secret-entirely");
        assert_eq!(verifier.verify(&credential), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid_token() {
        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let credential = sign(&claims_expiring_in(-3600), SECRET);
        assert_eq!(verifier.verify(&credential), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expiry_within_leeway_is_accepted() {
        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let credential = sign(&claims_expiring_in(-10), SECRET);
        assert!(verifier.verify(&credential).is_ok());
    }

    #[test]
    fn malformed_token_is_invalid_token() {
        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let credential = Credential("not-a-jwt".to_string());
        assert_eq!(verifier.verify(&credential), Err(AuthError::InvalidToken));
    }

    #[test]
    fn tampered_payload_is_invalid_token() {
        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let credential = sign(&claims_expiring_in(3600), SECRET);
        let parts: Vec<&str> = credential.as_str().split('.').collect();
        let forged_payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"sub":"{}","iat":0,"exp":9999999999}}"#,
            Uuid::new_v4()
        ));
        let forged = Credential(format!("{}.{}.{}", parts[0], forged_payload, parts[2]));
        assert_eq!(verifier.verify(&forged), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_without_expiry_is_invalid_token() {
        #[derive(serde::Serialize)]
        struct NoExp {
            sub: Uuid,
            iat: i64,
        }

        let verifier = TokenVerifier::new(&SigningSecret::from(SECRET));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExp {
                sub: Uuid::new_v4(),
                iat: 0,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            verifier.verify(&Credential(token)),
            Err(AuthError::InvalidToken)
        );
    }
}
