//! Workout plan handlers: CRUD, search, and the exercises of a plan.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::{IdPath, JsonBody, NestedPath, RawParams, list_query};
use crate::api::dto::{ListParams, PageResponse};
use crate::app_state::AppState;
use crate::domain::{PlanExercise, PlanExerciseDetails, WorkoutPlan, WorkoutPlanDetails};
use crate::error::{ApiError, ErrorResponse};

/// `POST /workout-plans` — Create a workout plan.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/workout-plans",
    tag = "Workout Plans",
    summary = "Create a workout plan",
    request_body = WorkoutPlanDetails,
    responses(
        (status = 201, description = "Workout plan created", body = WorkoutPlan),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_workout_plan(
    State(state): State<AppState>,
    body: JsonBody<WorkoutPlanDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let row = state.workout_plans.create(draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /workout-plans` — List workout plans.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/workout-plans",
    tag = "Workout Plans",
    summary = "List workout plans",
    description = "Filterable by `user_id`, `difficulty_level` and `is_public`.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of workout plans", body = PageResponse<WorkoutPlan>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_workout_plans(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<WorkoutPlan>>, ApiError> {
    let query = list_query::<WorkoutPlan>(params)?;
    Ok(Json(state.workout_plans.list(&query).await?.into()))
}

/// `GET /workout-plans/{id}` — Get a workout plan.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/workout-plans/{id}",
    tag = "Workout Plans",
    summary = "Get a workout plan",
    params(("id" = uuid::Uuid, Path, description = "Workout plan id")),
    responses(
        (status = 200, description = "Workout plan", body = WorkoutPlan),
        (status = 404, description = "Workout plan not found", body = ErrorResponse),
    )
)]
pub async fn get_workout_plan(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<WorkoutPlan>, ApiError> {
    let id = id?.0;
    Ok(Json(state.workout_plans.get(id).await?))
}

/// `PUT /workout-plans/{id}` — Replace a workout plan.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/workout-plans/{id}",
    tag = "Workout Plans",
    summary = "Update a workout plan",
    params(("id" = uuid::Uuid, Path, description = "Workout plan id")),
    request_body = WorkoutPlanDetails,
    responses(
        (status = 200, description = "Updated workout plan", body = WorkoutPlan),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Workout plan not found", body = ErrorResponse),
    )
)]
pub async fn update_workout_plan(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<WorkoutPlanDetails>,
) -> Result<Json<WorkoutPlan>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.workout_plans.update(id, draft).await?))
}

/// `DELETE /workout-plans/{id}` — Delete a workout plan.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/workout-plans/{id}",
    tag = "Workout Plans",
    summary = "Delete a workout plan",
    params(("id" = uuid::Uuid, Path, description = "Workout plan id")),
    responses(
        (status = 204, description = "Workout plan deleted"),
        (status = 404, description = "Workout plan not found", body = ErrorResponse),
    )
)]
pub async fn delete_workout_plan(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.workout_plans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /workout-plans/search` — Search workout plans by name or description.
///
/// # Errors
///
/// Returns [`ApiError`] when the search text is missing or blank.
#[utoipa::path(
    get,
    path = "/api/v1/workout-plans/search",
    tag = "Workout Plans",
    summary = "Search workout plans",
    description = "Case-insensitive substring match on `name` and `description`. Accepts the same filters as the list endpoint.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of matching workout plans", body = PageResponse<WorkoutPlan>),
        (status = 400, description = "Missing or invalid query", body = ErrorResponse),
    )
)]
pub async fn search_workout_plans(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<WorkoutPlan>>, ApiError> {
    let query = list_query::<WorkoutPlan>(params)?;
    Ok(Json(state.workout_plans.search(&query).await?.into()))
}

// ── Exercises within a plan ──────────────────────────────────────────────

/// `POST /workout-plans/{id}/exercises` — Add a plan exercise to a workout plan.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout plan does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/workout-plans/{id}/exercises",
    tag = "Workout Plans",
    summary = "Add a plan exercise to a workout plan",
    params(("id" = uuid::Uuid, Path, description = "Workout plan id")),
    request_body = PlanExerciseDetails,
    responses(
        (status = 201, description = "Plan exercise added", body = PlanExercise),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Workout plan not found", body = ErrorResponse),
    )
)]
pub async fn add_plan_exercise(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<PlanExerciseDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let parent = id?.0;
    let Json(draft) = body?;
    let row = state.plan_exercises.add(parent, draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /workout-plans/{id}/exercises` — List the plan exercises of a workout plan.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout plan does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/workout-plans/{id}/exercises",
    tag = "Workout Plans",
    summary = "List a workout plan's plan exercises",
    description = "Filterable by `exercise_id` and `day_of_week`. Ordered by position in the plan.",
    params(("id" = uuid::Uuid, Path, description = "Workout plan id"), ListParams),
    responses(
        (status = 200, description = "Page of plan exercises", body = PageResponse<PlanExercise>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "Workout plan not found", body = ErrorResponse),
    )
)]
pub async fn list_plan_exercises(
    State(state): State<AppState>,
    id: IdPath,
    params: RawParams,
) -> Result<Json<PageResponse<PlanExercise>>, ApiError> {
    let parent = id?.0;
    let query = list_query::<PlanExercise>(params)?;
    Ok(Json(state.plan_exercises.list(parent, &query).await?.into()))
}

/// `PUT /workout-plans/{id}/exercises/{exercise_id}` — Replace a plan exercise.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout plan or the plan exercise does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/workout-plans/{id}/exercises/{exercise_id}",
    tag = "Workout Plans",
    summary = "Update a workout plan's plan exercise",
    params(
        ("id" = uuid::Uuid, Path, description = "Workout plan id"),
        ("exercise_id" = uuid::Uuid, Path, description = "Plan exercise id"),
    ),
    request_body = PlanExerciseDetails,
    responses(
        (status = 200, description = "Updated plan exercise", body = PlanExercise),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Workout plan or plan exercise not found", body = ErrorResponse),
    )
)]
pub async fn update_plan_exercise(
    State(state): State<AppState>,
    ids: NestedPath,
    body: JsonBody<PlanExerciseDetails>,
) -> Result<Json<PlanExercise>, ApiError> {
    let (parent, child) = ids?.0;
    let Json(draft) = body?;
    Ok(Json(state.plan_exercises.update(parent, child, draft).await?))
}

/// `DELETE /workout-plans/{id}/exercises/{exercise_id}` — Remove a plan exercise.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the workout plan or the plan exercise does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/workout-plans/{id}/exercises/{exercise_id}",
    tag = "Workout Plans",
    summary = "Remove a workout plan's plan exercise",
    params(
        ("id" = uuid::Uuid, Path, description = "Workout plan id"),
        ("exercise_id" = uuid::Uuid, Path, description = "Plan exercise id"),
    ),
    responses(
        (status = 204, description = "Plan exercise removed"),
        (status = 404, description = "Workout plan or plan exercise not found", body = ErrorResponse),
    )
)]
pub async fn remove_plan_exercise(
    State(state): State<AppState>,
    ids: NestedPath,
) -> Result<StatusCode, ApiError> {
    let (parent, child) = ids?.0;
    state.plan_exercises.remove(parent, child).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Workout plan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workout-plans",
            get(list_workout_plans).post(create_workout_plan),
        )
        .route("/workout-plans/search", get(search_workout_plans))
        .route(
            "/workout-plans/{id}",
            get(get_workout_plan)
                .put(update_workout_plan)
                .delete(delete_workout_plan),
        )
        .route(
            "/workout-plans/{id}/exercises",
            get(list_plan_exercises).post(add_plan_exercise),
        )
        .route(
            "/workout-plans/{id}/exercises/{exercise_id}",
            put(update_plan_exercise).delete(remove_plan_exercise),
        )
}
