//! Workout session handlers, including the sets logged in a session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::{IdPath, JsonBody, NestedPath, RawParams, list_query};
use crate::api::dto::{ListParams, PageResponse};
use crate::app_state::AppState;
use crate::domain::{SessionLog, SessionLogDetails, WorkoutSession, WorkoutSessionDetails};
use crate::error::{ApiError, ErrorResponse};

/// `POST /workout-sessions` — Create a workout session.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/workout-sessions",
    tag = "Workout Sessions",
    summary = "Create a workout session",
    request_body = WorkoutSessionDetails,
    responses(
        (status = 201, description = "Workout session created", body = WorkoutSession),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_workout_session(
    State(state): State<AppState>,
    body: JsonBody<WorkoutSessionDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let row = state.workout_sessions.create(draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /workout-sessions` — List workout sessions, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/workout-sessions",
    tag = "Workout Sessions",
    summary = "List workout sessions",
    description = "Filterable by `user_id`, `plan_id` and `status`. Ordered by scheduled time, newest first.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of workout sessions", body = PageResponse<WorkoutSession>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_workout_sessions(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<WorkoutSession>>, ApiError> {
    let query = list_query::<WorkoutSession>(params)?;
    Ok(Json(state.workout_sessions.list(&query).await?.into()))
}

/// `GET /workout-sessions/{id}` — Get a workout session.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/workout-sessions/{id}",
    tag = "Workout Sessions",
    summary = "Get a workout session",
    params(("id" = uuid::Uuid, Path, description = "Workout session id")),
    responses(
        (status = 200, description = "Workout session", body = WorkoutSession),
        (status = 404, description = "Workout session not found", body = ErrorResponse),
    )
)]
pub async fn get_workout_session(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<WorkoutSession>, ApiError> {
    let id = id?.0;
    Ok(Json(state.workout_sessions.get(id).await?))
}

/// `PUT /workout-sessions/{id}` — Replace a workout session.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/workout-sessions/{id}",
    tag = "Workout Sessions",
    summary = "Update a workout session",
    params(("id" = uuid::Uuid, Path, description = "Workout session id")),
    request_body = WorkoutSessionDetails,
    responses(
        (status = 200, description = "Updated workout session", body = WorkoutSession),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Workout session not found", body = ErrorResponse),
    )
)]
pub async fn update_workout_session(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<WorkoutSessionDetails>,
) -> Result<Json<WorkoutSession>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.workout_sessions.update(id, draft).await?))
}

/// `DELETE /workout-sessions/{id}` — Delete a workout session.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/workout-sessions/{id}",
    tag = "Workout Sessions",
    summary = "Delete a workout session",
    params(("id" = uuid::Uuid, Path, description = "Workout session id")),
    responses(
        (status = 204, description = "Workout session deleted"),
        (status = 404, description = "Workout session not found", body = ErrorResponse),
    )
)]
pub async fn delete_workout_session(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.workout_sessions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Sets logged within a session ─────────────────────────────────────────

/// `POST /workout-sessions/{id}/logs` — Add a session log to a workout session.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout session does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/workout-sessions/{id}/logs",
    tag = "Workout Sessions",
    summary = "Add a session log to a workout session",
    params(("id" = uuid::Uuid, Path, description = "Workout session id")),
    request_body = SessionLogDetails,
    responses(
        (status = 201, description = "Session log added", body = SessionLog),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Workout session not found", body = ErrorResponse),
    )
)]
pub async fn add_session_log(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<SessionLogDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let parent = id?.0;
    let Json(draft) = body?;
    let row = state.session_logs.add(parent, draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /workout-sessions/{id}/logs` — List the session logs of a workout session.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout session does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/workout-sessions/{id}/logs",
    tag = "Workout Sessions",
    summary = "List a workout session's session logs",
    description = "Filterable by `exercise_id`. Ordered by exercise, then set number.",
    params(("id" = uuid::Uuid, Path, description = "Workout session id"), ListParams),
    responses(
        (status = 200, description = "Page of session logs", body = PageResponse<SessionLog>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "Workout session not found", body = ErrorResponse),
    )
)]
pub async fn list_session_logs(
    State(state): State<AppState>,
    id: IdPath,
    params: RawParams,
) -> Result<Json<PageResponse<SessionLog>>, ApiError> {
    let parent = id?.0;
    let query = list_query::<SessionLog>(params)?;
    Ok(Json(state.session_logs.list(parent, &query).await?.into()))
}

/// `PUT /workout-sessions/{id}/logs/{log_id}` — Replace a session log.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout session or the session log does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/workout-sessions/{id}/logs/{log_id}",
    tag = "Workout Sessions",
    summary = "Update a workout session's session log",
    params(
        ("id" = uuid::Uuid, Path, description = "Workout session id"),
        ("log_id" = uuid::Uuid, Path, description = "Session log id"),
    ),
    request_body = SessionLogDetails,
    responses(
        (status = 200, description = "Updated session log", body = SessionLog),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Workout session or session log not found", body = ErrorResponse),
    )
)]
pub async fn update_session_log(
    State(state): State<AppState>,
    ids: NestedPath,
    body: JsonBody<SessionLogDetails>,
) -> Result<Json<SessionLog>, ApiError> {
    let (parent, child) = ids?.0;
    let Json(draft) = body?;
    Ok(Json(state.session_logs.update(parent, child, draft).await?))
}

/// `DELETE /workout-sessions/{id}/logs/{log_id}` — Remove a session log.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout session or the session log does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/workout-sessions/{id}/logs/{log_id}",
    tag = "Workout Sessions",
    summary = "Remove a workout session's session log",
    params(
        ("id" = uuid::Uuid, Path, description = "Workout session id"),
        ("log_id" = uuid::Uuid, Path, description = "Session log id"),
    ),
    responses(
        (status = 204, description = "Session log removed"),
        (status = 404, description = "Workout session or session log not found", body = ErrorResponse),
    )
)]
pub async fn remove_session_log(
    State(state): State<AppState>,
    ids: NestedPath,
) -> Result<StatusCode, ApiError> {
    let (parent, child) = ids?.0;
    state.session_logs.remove(parent, child).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Workout session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workout-sessions",
            get(list_workout_sessions).post(create_workout_session),
        )
        .route(
            "/workout-sessions/{id}",
            get(get_workout_session)
                .put(update_workout_session)
                .delete(delete_workout_session),
        )
        .route(
            "/workout-sessions/{id}/logs",
            get(list_session_logs).post(add_session_log),
        )
        .route(
            "/workout-sessions/{id}/logs/{log_id}",
            put(update_session_log).delete(remove_session_log),
        )
}
