// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: signup, login and self-service profile management.

use axum::extract::State;
use uuid::Uuid;

use crate::{
    auth::{
        password::{hash_password, normalize_email, verify_dummy, verify_password},
        Auth, AuthError, Principal, Role,
    },
    envelope::ApiResponse,
    error::ApiError,
    models::{CredentialsRequest, TokenData, UpdateUserRequest, UserData},
    state::AppState,
    store::NewUser,
    validation::ValidatedJson,
};

/// Run CPU-heavy password work off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))
}

async fn hash(password: String) -> Result<String, ApiError> {
    blocking(move || hash_password(&password))
        .await?
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Create an account and return a token for it.
#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = CredentialsRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created", body = TokenData),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<ApiResponse<TokenData>, ApiError> {
    let email = normalize_email(&request.email);
    let password_hash = hash(request.password).await?;

    // Sign first: a signing failure must not leave an account behind.
    let id = Uuid::new_v4();
    let token = state.issuer.issue(id)?;

    let user = state.store.write().await.create_user(NewUser {
        id,
        email,
        password_hash,
        role: Role::User,
    })?;

    tracing::info!(user_id = %user.id, "account created");
    Ok(ApiResponse::created(
        "User created successfully",
        TokenData { token },
    ))
}

/// Exchange email and password for a token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = CredentialsRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Logged in", body = TokenData),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<ApiResponse<TokenData>, ApiError> {
    let email = normalize_email(&request.email);
    let user = state.store.read().await.user_by_email(&email);

    let password = request.password;
    let user = match user {
        Some(user) => {
            let stored = user.password_hash.clone();
            let valid = blocking(move || verify_password(&password, &stored)).await?;
            valid.then_some(user)
        }
        None => {
            blocking(move || verify_dummy(&password)).await?;
            None
        }
    };
    let user = user.ok_or(AuthError::InvalidCredentials)?;

    let token = state.issuer.issue(user.id)?;

    tracing::info!(user_id = %user.id, "login succeeded");
    Ok(ApiResponse::ok("User logged in successfully", TokenData { token }))
}

/// Return the authenticated account.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current account", body = UserData),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn current_user(Auth(principal): Auth) -> ApiResponse<UserData> {
    ApiResponse::ok("User fetched successfully", UserData { user: principal })
}

/// Change the authenticated account's email and/or password.
#[utoipa::path(
    put,
    path = "/users",
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Account updated", body = UserData),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let email = request.email.as_deref().map(normalize_email);
    let password_hash = match request.password {
        Some(password) => Some(hash(password).await?),
        None => None,
    };

    let user = state
        .store
        .write()
        .await
        .update_user(principal.id, email, password_hash)?
        .ok_or(AuthError::PrincipalNotFound)?;

    tracing::info!(user_id = %user.id, "account updated");
    Ok(ApiResponse::ok(
        "User updated successfully",
        UserData {
            user: Principal::from(user),
        },
    ))
}

/// Delete the authenticated account along with its tasks and projects.
#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<ApiResponse<()>, ApiError> {
    if !state.store.write().await.delete_user(principal.id) {
        return Err(AuthError::PrincipalNotFound.into());
    }

    tracing::info!(user_id = %principal.id, "account deleted");
    Ok(ApiResponse::message("User deleted successfully"))
}
