// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Project endpoints. Mounted behind the admin gate.

use axum::extract::State;
use uuid::Uuid;

use super::PathParam;
use crate::{
    auth::Auth,
    envelope::ApiResponse,
    error::ApiError,
    models::{CreateProjectRequest, ProjectData},
    state::AppState,
    validation::ValidatedJson,
};

const PROJECT_NOT_FOUND: &str = "Project not found";

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    tag = "Projects",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Project created", body = ProjectData),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Auth(principal): Auth,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> Result<ApiResponse<ProjectData>, ApiError> {
    let project = state
        .store
        .write()
        .await
        .create_project(principal.id, request);

    tracing::info!(project_id = %project.id, owner_id = %principal.id, "project created");
    Ok(ApiResponse::created(
        "Project created successfully",
        ProjectData { project },
    ))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    tag = "Projects",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The project", body = ProjectData),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such project owned by the caller"),
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Auth(principal): Auth,
    PathParam(id): PathParam<String>,
) -> Result<ApiResponse<ProjectData>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found(PROJECT_NOT_FOUND))?;
    let project = state
        .store
        .read()
        .await
        .project(id, principal.id)
        .ok_or_else(|| ApiError::not_found(PROJECT_NOT_FOUND))?;
    Ok(ApiResponse::ok(
        "Project fetched successfully",
        ProjectData { project },
    ))
}
