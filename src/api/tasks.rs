// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Task endpoints. Every read and write is scoped to the caller as assignee.

use axum::extract::State;
use uuid::Uuid;

use super::PathParam;
use crate::{
    auth::Auth,
    envelope::ApiResponse,
    error::ApiError,
    models::{
        CreateTaskRequest, TaskData, TaskListData, UpdateTaskRequest, UpdateTaskStatusRequest,
    },
    state::AppState,
    validation::ValidatedJson,
};

const TASK_NOT_FOUND: &str = "Task not found";

/// Ids that are not UUIDs cannot name a task, so they are reported the same
/// way as a missing one.
fn task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(TASK_NOT_FOUND))
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    tag = "Tasks",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Task created", body = TaskData),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    Auth(principal): Auth,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<ApiResponse<TaskData>, ApiError> {
    let task = state.store.write().await.create_task(principal.id, request);
    Ok(ApiResponse::created("Task created successfully", TaskData { task }))
}

#[utoipa::path(
    get,
    path = "/tasks",
    tag = "Tasks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Tasks assigned to the caller", body = TaskListData),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> ApiResponse<TaskListData> {
    let tasks = state.store.read().await.tasks_for(principal.id);
    ApiResponse::ok("Tasks fetched successfully", TaskListData { tasks })
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    tag = "Tasks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The task", body = TaskData),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such task for this caller"),
    )
)]
pub async fn get_task(
    State(state): State<AppState>,
    Auth(principal): Auth,
    PathParam(id): PathParam<String>,
) -> Result<ApiResponse<TaskData>, ApiError> {
    let id = task_id(&id)?;
    let task = state
        .store
        .read()
        .await
        .task(id, principal.id)
        .ok_or_else(|| ApiError::not_found(TASK_NOT_FOUND))?;
    Ok(ApiResponse::ok("Task fetched successfully", TaskData { task }))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = UpdateTaskRequest,
    tag = "Tasks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Task updated", body = TaskData),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such task for this caller"),
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    Auth(principal): Auth,
    PathParam(id): PathParam<String>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> Result<ApiResponse<TaskData>, ApiError> {
    let id = task_id(&id)?;
    let task = state
        .store
        .write()
        .await
        .update_task(id, principal.id, request)
        .ok_or_else(|| ApiError::not_found(TASK_NOT_FOUND))?;
    Ok(ApiResponse::ok("Task updated successfully", TaskData { task }))
}

#[utoipa::path(
    put,
    path = "/tasks/status/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = UpdateTaskStatusRequest,
    tag = "Tasks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Status changed", body = TaskData),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such task for this caller"),
    )
)]
pub async fn update_task_status(
    State(state): State<AppState>,
    Auth(principal): Auth,
    PathParam(id): PathParam<String>,
    ValidatedJson(request): ValidatedJson<UpdateTaskStatusRequest>,
) -> Result<ApiResponse<TaskData>, ApiError> {
    let id = task_id(&id)?;
    let task = state
        .store
        .write()
        .await
        .update_task_status(id, principal.id, request.status)
        .ok_or_else(|| ApiError::not_found(TASK_NOT_FOUND))?;
    Ok(ApiResponse::ok(
        "Task status updated successfully",
        TaskData { task },
    ))
}
