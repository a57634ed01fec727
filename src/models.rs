// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Domain records held by the store, request bodies with their validation
//! schemas, and the `data` payloads carried by success envelopes.
//!
//! ## Model Categories
//!
//! - **Accounts**: [`User`] (store only, never serialized)
//! - **Tasks**: [`Task`] and [`TaskStatus`]
//! - **Projects**: [`Project`]

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Principal, Role};
use crate::validation::{Field, Schema, Validate};

// =============================================================================
// Accounts
// =============================================================================

/// Stored account record.
///
/// Carries the password hash and is not `Serialize`. The only way out of
/// the store into a response is [`Principal::from`].
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    /// Normalized (trimmed, NFKC, lowercase).
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Body of `POST /users/signup` and `POST /users/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    /// At least 8 characters.
    pub password: String,
}

static CREDENTIALS_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new([
        Field::string("email").email(),
        Field::string("password").min_length(8),
    ])
});

impl Validate for CredentialsRequest {
    fn schema() -> &'static Schema {
        &CREDENTIALS_SCHEMA
    }
}

/// Body of `PUT /users`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

static UPDATE_USER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new([
        Field::string("email").optional().email(),
        Field::string("password").optional().min_length(8),
    ])
});

impl Validate for UpdateUserRequest {
    fn schema() -> &'static Schema {
        &UPDATE_USER_SCHEMA
    }
}

// =============================================================================
// Tasks
// =============================================================================

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Wire names, in declaration order.
    pub const ALL: &'static [&'static str] = &["todo", "in_progress", "done"];
}

/// A task, always owned by exactly one assignee.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    /// Empty when not provided.
    pub description: String,
    pub status: TaskStatus,
    pub assignee_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// At least 5 characters.
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

static CREATE_TASK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new([
        Field::string("title").min_length(5),
        Field::string("description").optional(),
        Field::timestamp("due_date").optional(),
    ])
});

impl Validate for CreateTaskRequest {
    fn schema() -> &'static Schema {
        &CREATE_TASK_SCHEMA
    }
}

/// Body of `PUT /tasks/{id}`. Absent fields are left unchanged; an explicit
/// `"due_date": null` clears the due date.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

static UPDATE_TASK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new([
        Field::string("title").optional().min_length(5),
        Field::string("description").optional(),
        Field::timestamp("due_date").optional().nullable(),
    ])
});

impl Validate for UpdateTaskRequest {
    fn schema() -> &'static Schema {
        &UPDATE_TASK_SCHEMA
    }
}

/// Body of `PUT /tasks/status/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
}

static UPDATE_TASK_STATUS_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new([Field::string("status").one_of(TaskStatus::ALL)])
});

impl Validate for UpdateTaskStatusRequest {
    fn schema() -> &'static Schema {
        &UPDATE_TASK_STATUS_SCHEMA
    }
}

/// Distinguishes an absent key (`None`) from an explicit null (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    /// Empty when not provided.
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

static CREATE_PROJECT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new([
        Field::string("name").min_length(1),
        Field::string("description").optional(),
    ])
});

impl Validate for CreateProjectRequest {
    fn schema() -> &'static Schema {
        &CREATE_PROJECT_SCHEMA
    }
}

// =============================================================================
// Envelope payloads
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenData {
    /// HS256 bearer token.
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserData {
    pub user: Principal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskData {
    pub task: Task,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListData {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectData {
    pub project: Project,
}
