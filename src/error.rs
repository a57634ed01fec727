// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application error type and the single error-to-envelope translation.
//!
//! Nothing but [`ApiError::into_response`] decides what error detail is
//! visible on the wire. Internal detail (`Internal`, store failures) is
//! logged and replaced by a generic message.

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::envelope::ResponseEnvelope;
use crate::store::StoreError;
use crate::validation::{SchemaError, ValidationErrors};

const UNAUTHORIZED_SUGGESTION: &str = "Please log in to continue";
const RETRY_SUGGESTION: &str = "Please try again later or contact support if the problem persists";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Body could not be read as JSON at all.
    #[error("malformed request body: {0}")]
    BadRequest(String),

    /// Body exceeded the configured size limit.
    #[error("request body too large")]
    PayloadTooLarge,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Unexpected fault. The payload is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => e.status_code(),
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate into the wire envelope.
    pub fn to_envelope(&self) -> ResponseEnvelope<()> {
        let status = self.status_code();
        let (message, errors, suggestion): (&str, Vec<String>, Option<&str>) = match self {
            ApiError::Auth(AuthError::InvalidCredentials) => (
                "Invalid email or password",
                Vec::new(),
                Some("Please check your credentials and try again"),
            ),
            ApiError::Auth(AuthError::InsufficientRole) => (
                "Forbidden",
                Vec::new(),
                Some("Your account does not have access to this resource"),
            ),
            ApiError::Auth(AuthError::StoreUnavailable(_)) | ApiError::Internal(_) => {
                ("An unexpected error occurred", Vec::new(), Some(RETRY_SUGGESTION))
            }
            ApiError::Auth(
                AuthError::NoCredential | AuthError::InvalidToken | AuthError::PrincipalNotFound,
            ) => ("Unauthorized", Vec::new(), Some(UNAUTHORIZED_SUGGESTION)),
            ApiError::Validation(errors) => ("Validation failed", errors.messages().to_vec(), None),
            ApiError::BadRequest(_) => (
                "Invalid request data",
                Vec::new(),
                Some("Please check your request format and try again"),
            ),
            ApiError::PayloadTooLarge => (
                "Request body too large",
                Vec::new(),
                Some("Please send a smaller request body"),
            ),
            ApiError::NotFound(message) | ApiError::Conflict(message) => {
                (message.as_str(), Vec::new(), None)
            }
            ApiError::MethodNotAllowed => ("Method not allowed", Vec::new(), None),
        };

        ResponseEnvelope::failure(status, message, errors, suggestion.map(str::to_string))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(_) | ApiError::Auth(AuthError::StoreUnavailable(_)) => {
                tracing::error!(error = %self, "request failed with internal error");
            }
            ApiError::Auth(e) => {
                tracing::debug!(code = e.error_code(), "request rejected");
            }
            _ => {}
        }

        self.to_envelope().into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => {
                ApiError::conflict("An account with this email already exists")
            }
            StoreError::Unavailable(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::Invalid(errors) => ApiError::Validation(errors),
            SchemaError::Compile(_) => ApiError::Internal(e.to_string()),
        }
    }
}

/// A path segment that does not decode cannot name any resource.
impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        tracing::debug!(error = %e.body_text(), "path parameter rejected");
        ApiError::not_found("Resource not found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::body_json;

    #[tokio::test]
    async fn internal_error_never_echoes_detail() {
        let response =
            ApiError::Internal("duplicate key value violates users_pkey".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "An unexpected error occurred");
        assert!(body.get("errors").is_none());
        assert!(!body.to_string().contains("users_pkey"));
    }

    #[tokio::test]
    async fn validation_error_lists_every_message() {
        let errors = ValidationErrors::from(vec![
            "email must be a valid email address".to_string(),
            "password must be at least 8 characters long".to_string(),
        ]);
        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn token_failures_render_identically() {
        let mut bodies = Vec::new();
        for err in [
            AuthError::NoCredential,
            AuthError::InvalidToken,
            AuthError::PrincipalNotFound,
        ] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            bodies.push(body_json(response).await);
        }
        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn not_found_uses_handler_message() {
        let body = body_json(ApiError::not_found("Task not found").into_response()).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "Task not found");
    }

    #[tokio::test]
    async fn oversized_body_is_413_envelope() {
        let response = ApiError::PayloadTooLarge.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = body_json(response).await;
        assert_eq!(body["status"], 413);
        assert_eq!(body["message"], "Request body too large");
    }

    #[test]
    fn uncompiled_schema_is_internal() {
        let err = ApiError::from(SchemaError::Compile("bad keyword".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_errors_map_to_conflict_and_internal() {
        assert_eq!(
            ApiError::from(StoreError::Duplicate("email")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
