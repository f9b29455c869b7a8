//! User account handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::{IdPath, JsonBody, RawParams, list_query};
use crate::api::dto::{
    CreateUserRequest, ListParams, PageResponse, PasswordChangeRequest, UpdateUserRequest,
    UserResponse, VerifyEmailRequest,
};
use crate::app_state::AppState;
use crate::domain::User;
use crate::error::{ApiError, ErrorResponse};

/// `POST /users` — Register a user.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] for a short password and
/// [`ApiError::Conflict`] for a taken username or email.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Create a user",
    description = "Username and email must be unused. The password must meet the configured minimum length and is stored as an Argon2id hash.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid body or password too short", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let user = state.users.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `GET /users` — List users.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    summary = "List users",
    description = "Filterable by `username`, `email`, `gender`, `is_active` and `is_email_verified`.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of users", body = PageResponse<UserResponse>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<UserResponse>>, ApiError> {
    let query = list_query::<User>(params)?;
    let page = state.users.list(&query).await?;
    Ok(Json(page.map(UserResponse::from).into()))
}

/// `GET /users/{id}` — Get a user.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Get a user",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<UserResponse>, ApiError> {
    let id = id?.0;
    Ok(Json(state.users.get(id).await?.into()))
}

/// `PUT /users/{id}` — Update account details.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] or [`ApiError::Conflict`].
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Update a user",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = id?.0;
    let Json(req) = body?;
    Ok(Json(state.users.update(id, req.into()).await?.into()))
}

/// `DELETE /users/{id}` — Delete a user.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Delete a user",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /users/{id}/password` — Change the password.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] when the current password is wrong
/// or the new one is too short.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    tag = "Users",
    summary = "Change a user's password",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or new password too short", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<PasswordChangeRequest>,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    let Json(req) = body?;
    state
        .users
        .update_password(id, &req.current_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /users/{id}/verify-email` — Set the email verification flag.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/verify-email",
    tag = "Users",
    summary = "Set a user's email verification status",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<VerifyEmailRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = id?.0;
    let Json(req) = body?;
    Ok(Json(
        state.users.set_email_verified(id, req.verified).await?.into(),
    ))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/password", put(change_password))
        .route("/users/{id}/verify-email", put(verify_email))
}
