// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Response Envelope
//!
//! Every response body, success or failure, has the same shape:
//!
//! ```json
//! { "success": true, "status": 201, "message": "Task created successfully",
//!   "data": { "task": { ... } } }
//! ```
//!
//! `success` is true iff `status` is 2xx iff `errors` is absent. The
//! constructors are the only way to build an envelope, and each one fixes
//! the fields that the invariant ties together.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Wire shape shared by every route.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResponseEnvelope<T> {
    /// True for 2xx responses only.
    success: bool,
    /// HTTP status code, repeated in the body.
    status: u16,
    /// Human-readable outcome.
    message: String,
    /// Payload, present only on successful responses that produce one.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    /// One message per violated field constraint (validation failures only).
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
    /// Hint on how to recover.
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> Option<&[String]> {
        self.errors.as_deref()
    }
}

impl ResponseEnvelope<()> {
    /// Failure envelope. `status` must not be 2xx; `errors` is dropped when
    /// empty so the field only appears for real field-level problems.
    pub fn failure(
        status: StatusCode,
        message: impl Into<String>,
        errors: Vec<String>,
        suggestion: Option<String>,
    ) -> Self {
        debug_assert!(!status.is_success(), "failure envelope with 2xx status");
        Self {
            success: false,
            status: status.as_u16(),
            message: message.into(),
            data: None,
            errors: (!errors.is_empty()).then_some(errors),
            suggestion,
        }
    }
}

/// Successful handler outcome. Handlers return `Result<ApiResponse<T>, ApiError>`
/// and both arms render as a [`ResponseEnvelope`].
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: String,
    data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 200 with payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 with payload.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_envelope(self) -> ResponseEnvelope<T> {
        ResponseEnvelope {
            success: true,
            status: self.status.as_u16(),
            message: self.message,
            data: self.data,
            errors: None,
            suggestion: None,
        }
    }
}

impl ApiResponse<()> {
    /// 200 without payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self.into_envelope())).into_response()
    }
}

impl IntoResponse for ResponseEnvelope<()> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::body_json;
    use serde_json::json;

    #[tokio::test]
    async fn success_envelope_carries_data_and_no_errors() {
        let response = ApiResponse::created("made", json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"success": true, "status": 201, "message": "made", "data": {"id": 1}})
        );
    }

    #[tokio::test]
    async fn message_only_success_omits_data() {
        let body = body_json(ApiResponse::message("OK").into_response()).await;
        assert_eq!(body, json!({"success": true, "status": 200, "message": "OK"}));
    }

    #[tokio::test]
    async fn failure_envelope_omits_data_and_empty_errors() {
        let response = ResponseEnvelope::failure(
            StatusCode::NOT_FOUND,
            "Resource not found",
            Vec::new(),
            Some("Please check the URL and try again".into()),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 404);
        assert!(body.get("errors").is_none());
        assert!(body.get("data").is_none());
        assert_eq!(body["suggestion"], "Please check the URL and try again");
    }

    #[test]
    fn failure_keeps_field_errors() {
        let envelope = ResponseEnvelope::failure(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            vec!["a".into(), "b".into()],
            None,
        );
        assert!(!envelope.is_success());
        assert_eq!(envelope.errors().map(<[String]>::len), Some(2));
        assert!(envelope.data().is_none());
    }
}
