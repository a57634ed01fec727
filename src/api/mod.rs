// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP routing.
//!
//! Routes fall in three groups:
//!
//! - public: `/ping`, `/users/signup`, `/users/login`
//! - authenticated: `/users*`, `/tasks*`
//! - admin: `/projects*`
//!
//! The whole tree sits inside one fault boundary (see [`with_boundary`])
//! that renders unmatched routes, unmatched methods and panics through the
//! same envelope as handler errors.

use std::any::Any;

use axum::{
    body::Body,
    extract::{FromRequestParts, Path},
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{any, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::{authenticate, authorize},
        AuthorizationGate, Principal, Role,
    },
    envelope::ResponseEnvelope,
    error::ApiError,
    models::{
        CreateProjectRequest, CreateTaskRequest, CredentialsRequest, Project, ProjectData, Task,
        TaskData, TaskListData, TaskStatus, TokenData, UpdateTaskRequest,
        UpdateTaskStatusRequest, UpdateUserRequest, UserData,
    },
    state::AppState,
};

pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

/// [`Path`] whose rejection renders through [`ApiError`] as a 404.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/ping", any(health::ping))
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login));

    let authenticated = Router::new()
        .route("/users/me", get(users::current_user))
        .route("/users", put(users::update_user).delete(users::delete_user))
        .route("/tasks", post(tasks::create_task).get(tasks::list_tasks))
        .route("/tasks/{id}", get(tasks::get_task).put(tasks::update_task))
        .route("/tasks/status/{id}", put(tasks::update_task_status))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    // The last route_layer runs first: authenticate, then gate.
    let admin = Router::new()
        .route("/projects", post(projects::create_project))
        .route("/projects/{id}", get(projects::get_project))
        .route_layer(from_fn_with_state(AuthorizationGate::ADMIN_ONLY, authorize))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let app = Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    with_boundary(app)
}

/// Wrap a fully routed app in the fallbacks and the outer layers.
///
/// Must be applied after every route is registered: the 405 fallback only
/// attaches to routes that already exist.
pub fn with_boundary(app: Router) -> Router {
    app.fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

async fn route_not_found() -> ResponseEnvelope<()> {
    ResponseEnvelope::failure(
        StatusCode::NOT_FOUND,
        "Resource not found",
        Vec::new(),
        Some("Please check the URL and try again".to_string()),
    )
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token issued by /users/signup or /users/login."))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        description = "Multi-tenant tasks and projects. Every response body is a \
                       `{success, status, message, data?, errors?, suggestion?}` envelope."
    ),
    paths(
        health::ping,
        users::signup,
        users::login,
        users::current_user,
        users::update_user,
        users::delete_user,
        tasks::create_task,
        tasks::list_tasks,
        tasks::get_task,
        tasks::update_task,
        tasks::update_task_status,
        projects::create_project,
        projects::get_project
    ),
    components(
        schemas(
            CredentialsRequest,
            UpdateUserRequest,
            CreateTaskRequest,
            UpdateTaskRequest,
            UpdateTaskStatusRequest,
            CreateProjectRequest,
            Task,
            TaskStatus,
            Project,
            Principal,
            Role,
            TokenData,
            UserData,
            TaskData,
            TaskListData,
            ProjectData
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Users", description = "Accounts and tokens"),
        (name = "Tasks", description = "Tasks assigned to the caller"),
        (name = "Projects", description = "Projects owned by the calling admin")
    )
)]
pub struct ApiDoc;
