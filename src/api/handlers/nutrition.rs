//! Nutrition goal and biometric handlers, plus the per-user shortcuts for
//! the active goal and the latest measurements.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::{IdPath, JsonBody, RawParams, list_query};
use crate::api::dto::{ListParams, PageResponse};
use crate::app_state::AppState;
use crate::domain::{Biometric, BiometricDetails, NutritionGoal, NutritionGoalDetails};
use crate::error::{ApiError, ErrorResponse};
use crate::query::FilterSet;

/// `POST /nutrition-goals` — Create a nutrition goal.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/nutrition-goals",
    tag = "Nutrition",
    summary = "Create a nutrition goal",
    request_body = NutritionGoalDetails,
    responses(
        (status = 201, description = "Nutrition goal created", body = NutritionGoal),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_nutrition_goal(
    State(state): State<AppState>,
    body: JsonBody<NutritionGoalDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let row = state.nutrition_goals.create(draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /nutrition-goals` — List nutrition goals, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/nutrition-goals",
    tag = "Nutrition",
    summary = "List nutrition goals",
    description = "Filterable by `user_id`, `is_active` and `goal_effective_date`. Ordered by effective date, newest first.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of nutrition goals", body = PageResponse<NutritionGoal>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_nutrition_goals(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<NutritionGoal>>, ApiError> {
    let query = list_query::<NutritionGoal>(params)?;
    Ok(Json(state.nutrition_goals.list(&query).await?.into()))
}

/// `GET /nutrition-goals/{id}` — Get a nutrition goal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/nutrition-goals/{id}",
    tag = "Nutrition",
    summary = "Get a nutrition goal",
    params(("id" = uuid::Uuid, Path, description = "Nutrition goal id")),
    responses(
        (status = 200, description = "Nutrition goal", body = NutritionGoal),
        (status = 404, description = "Nutrition goal not found", body = ErrorResponse),
    )
)]
pub async fn get_nutrition_goal(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<NutritionGoal>, ApiError> {
    let id = id?.0;
    Ok(Json(state.nutrition_goals.get(id).await?))
}

/// `PUT /nutrition-goals/{id}` — Replace a nutrition goal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/nutrition-goals/{id}",
    tag = "Nutrition",
    summary = "Update a nutrition goal",
    params(("id" = uuid::Uuid, Path, description = "Nutrition goal id")),
    request_body = NutritionGoalDetails,
    responses(
        (status = 200, description = "Updated nutrition goal", body = NutritionGoal),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Nutrition goal not found", body = ErrorResponse),
    )
)]
pub async fn update_nutrition_goal(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<NutritionGoalDetails>,
) -> Result<Json<NutritionGoal>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.nutrition_goals.update(id, draft).await?))
}

/// `DELETE /nutrition-goals/{id}` — Delete a nutrition goal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/nutrition-goals/{id}",
    tag = "Nutrition",
    summary = "Delete a nutrition goal",
    params(("id" = uuid::Uuid, Path, description = "Nutrition goal id")),
    responses(
        (status = 204, description = "Nutrition goal deleted"),
        (status = 404, description = "Nutrition goal not found", body = ErrorResponse),
    )
)]
pub async fn delete_nutrition_goal(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.nutrition_goals.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /biometrics` — Create a biometric entry.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/biometrics",
    tag = "Biometrics",
    summary = "Create a biometric entry",
    request_body = BiometricDetails,
    responses(
        (status = 201, description = "Biometric entry created", body = Biometric),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_biometric(
    State(state): State<AppState>,
    body: JsonBody<BiometricDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let row = state.biometrics.create(draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /biometrics` — List biometric entries, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/biometrics",
    tag = "Biometrics",
    summary = "List biometric entries",
    description = "Filterable by `user_id`, `log_date` and `activity_level`. Ordered by log date, newest first.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of biometric entries", body = PageResponse<Biometric>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_biometrics(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<Biometric>>, ApiError> {
    let query = list_query::<Biometric>(params)?;
    Ok(Json(state.biometrics.list(&query).await?.into()))
}

/// `GET /biometrics/{id}` — Get a biometric entry.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/biometrics/{id}",
    tag = "Biometrics",
    summary = "Get a biometric entry",
    params(("id" = uuid::Uuid, Path, description = "Biometric entry id")),
    responses(
        (status = 200, description = "Biometric entry", body = Biometric),
        (status = 404, description = "Biometric entry not found", body = ErrorResponse),
    )
)]
pub async fn get_biometric(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Biometric>, ApiError> {
    let id = id?.0;
    Ok(Json(state.biometrics.get(id).await?))
}

/// `PUT /biometrics/{id}` — Replace a biometric entry.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/biometrics/{id}",
    tag = "Biometrics",
    summary = "Update a biometric entry",
    params(("id" = uuid::Uuid, Path, description = "Biometric entry id")),
    request_body = BiometricDetails,
    responses(
        (status = 200, description = "Updated biometric entry", body = Biometric),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Biometric entry not found", body = ErrorResponse),
    )
)]
pub async fn update_biometric(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<BiometricDetails>,
) -> Result<Json<Biometric>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.biometrics.update(id, draft).await?))
}

/// `DELETE /biometrics/{id}` — Delete a biometric entry.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/biometrics/{id}",
    tag = "Biometrics",
    summary = "Delete a biometric entry",
    params(("id" = uuid::Uuid, Path, description = "Biometric entry id")),
    responses(
        (status = 204, description = "Biometric entry deleted"),
        (status = 404, description = "Biometric entry not found", body = ErrorResponse),
    )
)]
pub async fn delete_biometric(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.biometrics.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Per-user shortcuts ───────────────────────────────────────────────────

/// `GET /users/{id}/nutrition-goals/active` — The user's current goal.
///
/// The active goal with the latest effective date wins.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the user has no active goal.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/nutrition-goals/active",
    tag = "Nutrition",
    summary = "Get a user's active nutrition goal",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Active nutrition goal", body = NutritionGoal),
        (status = 404, description = "No active goal", body = ErrorResponse),
    )
)]
pub async fn active_nutrition_goal(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<NutritionGoal>, ApiError> {
    let user_id = id?.0;
    let filters = FilterSet::new()
        .with("user_id", user_id)
        .with("is_active", true);
    state
        .nutrition_goals
        .latest(filters)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("active nutrition goal", user_id))
}

/// `GET /users/{id}/biometrics/latest` — The user's most recent entry.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the user has no entries.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/biometrics/latest",
    tag = "Biometrics",
    summary = "Get a user's latest biometrics",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Latest biometric entry", body = Biometric),
        (status = 404, description = "No entries", body = ErrorResponse),
    )
)]
pub async fn latest_biometrics(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Biometric>, ApiError> {
    let user_id = id?.0;
    state
        .biometrics
        .latest(FilterSet::new().with("user_id", user_id))
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("biometric entry", user_id))
}

/// Nutrition goal and biometric routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/nutrition-goals",
            get(list_nutrition_goals).post(create_nutrition_goal),
        )
        .route(
            "/nutrition-goals/{id}",
            get(get_nutrition_goal)
                .put(update_nutrition_goal)
                .delete(delete_nutrition_goal),
        )
        .route("/biometrics", get(list_biometrics).post(create_biometric))
        .route(
            "/biometrics/{id}",
            get(get_biometric)
                .put(update_biometric)
                .delete(delete_biometric),
        )
        .route(
            "/users/{id}/nutrition-goals/active",
            get(active_nutrition_goal),
        )
        .route("/users/{id}/biometrics/latest", get(latest_biometrics))
}
