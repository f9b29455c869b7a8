//! Exercise catalogue handlers: CRUD, filtered listing and search.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::{IdPath, JsonBody, RawParams, list_query};
use crate::api::dto::{ListParams, PageResponse};
use crate::app_state::AppState;
use crate::domain::{Exercise, ExerciseDetails};
use crate::error::{ApiError, ErrorResponse};

/// `POST /exercises` — Add an exercise to the catalogue.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/exercises",
    tag = "Exercises",
    summary = "Create an exercise",
    request_body = ExerciseDetails,
    responses(
        (status = 201, description = "Exercise created", body = Exercise),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_exercise(
    State(state): State<AppState>,
    body: JsonBody<ExerciseDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let item = state.exercises.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /exercises` — List exercises.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/exercises",
    tag = "Exercises",
    summary = "List exercises",
    description = "Filterable by `name`, `muscle_group_primary`, `equipment_required`, `difficulty_level`, `exercise_type`, `created_by_user_id` and `is_public`.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of exercises", body = PageResponse<Exercise>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_exercises(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<Exercise>>, ApiError> {
    let query = list_query::<Exercise>(params)?;
    let page = state.exercises.list(&query).await?;
    Ok(Json(page.into()))
}

/// `GET /exercises/search` — Search exercises by name or description.
///
/// # Errors
///
/// Returns [`ApiError`] when the search text is missing or blank.
#[utoipa::path(
    get,
    path = "/api/v1/exercises/search",
    tag = "Exercises",
    summary = "Search exercises",
    description = "Case-insensitive substring match on `name` and `description`. Accepts the same filters as the list endpoint.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of matching exercises", body = PageResponse<Exercise>),
        (status = 400, description = "Missing or invalid query", body = ErrorResponse),
    )
)]
pub async fn search_exercises(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<Exercise>>, ApiError> {
    let query = list_query::<Exercise>(params)?;
    let page = state.exercises.search(&query).await?;
    Ok(Json(page.into()))
}

/// `GET /exercises/{id}` — Get an exercise.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}",
    tag = "Exercises",
    summary = "Get an exercise",
    params(("id" = uuid::Uuid, Path, description = "Exercise id")),
    responses(
        (status = 200, description = "Exercise", body = Exercise),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
    )
)]
pub async fn get_exercise(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Exercise>, ApiError> {
    let id = id?.0;
    Ok(Json(state.exercises.get(id).await?))
}

/// `PUT /exercises/{id}` — Replace an exercise.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/exercises/{id}",
    tag = "Exercises",
    summary = "Update an exercise",
    params(("id" = uuid::Uuid, Path, description = "Exercise id")),
    request_body = ExerciseDetails,
    responses(
        (status = 200, description = "Updated exercise", body = Exercise),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
    )
)]
pub async fn update_exercise(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<ExerciseDetails>,
) -> Result<Json<Exercise>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.exercises.update(id, draft).await?))
}

/// `DELETE /exercises/{id}` — Delete an exercise.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/exercises/{id}",
    tag = "Exercises",
    summary = "Delete an exercise",
    params(("id" = uuid::Uuid, Path, description = "Exercise id")),
    responses(
        (status = 204, description = "Exercise deleted"),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
    )
)]
pub async fn delete_exercise(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.exercises.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Exercise routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route("/exercises/search", get(search_exercises))
        .route(
            "/exercises/{id}",
            get(get_exercise)
                .put(update_exercise)
                .delete(delete_exercise),
        )
}
