// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for accounts, tasks and projects.
//!
//! Shared as `Arc<tokio::sync::RwLock<InMemoryStore>>`; every method is a
//! single lock-scoped operation. Task and project lookups always take the
//! caller's id and treat a row owned by someone else exactly like a missing
//! row.

use std::{collections::HashMap, future::Future, pin::Pin};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{PrincipalStore, Role};
use crate::models::{
    CreateProjectRequest, CreateTaskRequest, Project, Task, TaskStatus, UpdateTaskRequest, User,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique column already holds this value.
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Account to insert. `email` must already be normalized.
///
/// The id is chosen by the caller so that anything derived from it, such as
/// a token, can be produced before the row is committed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<Uuid, User>,
    tasks: HashMap<Uuid, Task>,
    projects: HashMap<Uuid, Project>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.values().find(|u| u.email == email).cloned()
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        if self.user_by_email(&new.email).is_some() {
            return Err(StoreError::Duplicate("email"));
        }

        if self.users.contains_key(&new.id) {
            return Err(StoreError::Duplicate("id"));
        }

        let user = User {
            id: new.id,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Apply the given changes. `Ok(None)` if the account no longer exists.
    pub fn update_user(
        &mut self,
        id: Uuid,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<User>, StoreError> {
        if let Some(email) = &email {
            if self.users.values().any(|u| &u.email == email && u.id != id) {
                return Err(StoreError::Duplicate("email"));
            }
        }

        let Some(user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    /// Remove the account together with the tasks assigned to it and the
    /// projects it owns. Returns whether the account existed.
    pub fn delete_user(&mut self, id: Uuid) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        self.tasks.retain(|_, task| task.assignee_id != id);
        self.projects.retain(|_, project| project.owner_id != id);
        true
    }

    pub fn create_task(&mut self, assignee_id: Uuid, request: CreateTaskRequest) -> Task {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description.unwrap_or_default(),
            status: TaskStatus::default(),
            assignee_id,
            due_date: request.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id, task.clone());
        task
    }

    /// Tasks assigned to `assignee_id`, oldest first.
    pub fn tasks_for(&self, assignee_id: Uuid) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.assignee_id == assignee_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at, task.id));
        tasks
    }

    pub fn task(&self, id: Uuid, assignee_id: Uuid) -> Option<Task> {
        self.tasks
            .get(&id)
            .filter(|task| task.assignee_id == assignee_id)
            .cloned()
    }

    fn task_mut(&mut self, id: Uuid, assignee_id: Uuid) -> Option<&mut Task> {
        self.tasks
            .get_mut(&id)
            .filter(|task| task.assignee_id == assignee_id)
    }

    pub fn update_task(
        &mut self,
        id: Uuid,
        assignee_id: Uuid,
        request: UpdateTaskRequest,
    ) -> Option<Task> {
        let task = self.task_mut(id, assignee_id)?;
        if let Some(title) = request.title {
            task.title = title;
        }
        if let Some(description) = request.description {
            task.description = description;
        }
        if let Some(due_date) = request.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    pub fn update_task_status(
        &mut self,
        id: Uuid,
        assignee_id: Uuid,
        status: TaskStatus,
    ) -> Option<Task> {
        let task = self.task_mut(id, assignee_id)?;
        task.status = status;
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    pub fn create_project(&mut self, owner_id: Uuid, request: CreateProjectRequest) -> Project {
        let project = Project {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description.unwrap_or_default(),
            owner_id,
            created_at: Utc::now(),
        };
        self.projects.insert(project.id, project.clone());
        project
    }

    pub fn project(&self, id: Uuid, owner_id: Uuid) -> Option<Project> {
        self.projects
            .get(&id)
            .filter(|project| project.owner_id == owner_id)
            .cloned()
    }
}

impl PrincipalStore for RwLock<InMemoryStore> {
    fn find_by_id<'a>(
        &'a self,
        id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.read().await.user(id)) })
    }
}
