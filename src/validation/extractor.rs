// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON body extractor that validates before deserializing.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::StatusCode,
};
use serde_json::Value;

use super::Validate;
use crate::error::ApiError;

/// Like [`axum::Json`], but the body must satisfy `T::schema()` first.
///
/// - body over the size limit: [`ApiError::PayloadTooLarge`]
/// - unreadable or non-JSON body: [`ApiError::BadRequest`]
/// - schema violations: [`ApiError::Validation`] with every message
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(body_error)?;

        let raw: Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let normalized = T::schema().validate(&raw)?;

        // A schema that accepts what the type cannot hold is a declaration
        // bug, not a client error.
        let value = serde_json::from_value(normalized)
            .map_err(|e| ApiError::Internal(format!("validated body did not deserialize: {e}")))?;

        Ok(ValidatedJson(value))
    }
}

fn body_error(e: BytesRejection) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(e.body_text())
    }
}
