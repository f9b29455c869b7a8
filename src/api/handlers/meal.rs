//! Meal handlers, including the food items logged in a meal.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::{IdPath, JsonBody, NestedPath, RawParams, list_query};
use crate::api::dto::{ListParams, PageResponse};
use crate::app_state::AppState;
use crate::domain::{Meal, MealDetails, MealFoodItem, MealFoodItemDetails};
use crate::error::{ApiError, ErrorResponse};

/// `POST /meals` — Log a meal.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/meals",
    tag = "Meals",
    summary = "Create a meal",
    request_body = MealDetails,
    responses(
        (status = 201, description = "Meal created", body = Meal),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_meal(
    State(state): State<AppState>,
    body: JsonBody<MealDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let meal = state.meals.create(draft).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// `GET /meals` — List meals, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/meals",
    tag = "Meals",
    summary = "List meals",
    description = "Filterable by `user_id`, `meal_type` and `meal_date`. Ordered by date and time, newest first.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of meals", body = PageResponse<Meal>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_meals(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<Meal>>, ApiError> {
    let query = list_query::<Meal>(params)?;
    Ok(Json(state.meals.list(&query).await?.into()))
}

/// `GET /meals/{id}` — Get a meal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/meals/{id}",
    tag = "Meals",
    summary = "Get a meal",
    params(("id" = uuid::Uuid, Path, description = "Meal id")),
    responses(
        (status = 200, description = "Meal", body = Meal),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    )
)]
pub async fn get_meal(State(state): State<AppState>, id: IdPath) -> Result<Json<Meal>, ApiError> {
    let id = id?.0;
    Ok(Json(state.meals.get(id).await?))
}

/// `PUT /meals/{id}` — Replace a meal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/meals/{id}",
    tag = "Meals",
    summary = "Update a meal",
    params(("id" = uuid::Uuid, Path, description = "Meal id")),
    request_body = MealDetails,
    responses(
        (status = 200, description = "Updated meal", body = Meal),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    )
)]
pub async fn update_meal(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<MealDetails>,
) -> Result<Json<Meal>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.meals.update(id, draft).await?))
}

/// `DELETE /meals/{id}` — Delete a meal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/meals/{id}",
    tag = "Meals",
    summary = "Delete a meal",
    params(("id" = uuid::Uuid, Path, description = "Meal id")),
    responses(
        (status = 204, description = "Meal deleted"),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    )
)]
pub async fn delete_meal(State(state): State<AppState>, id: IdPath) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.meals.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Food items within a meal ─────────────────────────────────────────────

/// `POST /meals/{id}/food-items` — Log a food item in a meal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the meal does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/meals/{id}/food-items",
    tag = "Meals",
    summary = "Add a food item to a meal",
    params(("id" = uuid::Uuid, Path, description = "Meal id")),
    request_body = MealFoodItemDetails,
    responses(
        (status = 201, description = "Food item logged", body = MealFoodItem),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    )
)]
pub async fn add_meal_food_item(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<MealFoodItemDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let meal_id = id?.0;
    let Json(draft) = body?;
    let item = state.meal_food_items.add(meal_id, draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /meals/{id}/food-items` — List the food items of a meal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the meal does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/meals/{id}/food-items",
    tag = "Meals",
    summary = "List a meal's food items",
    description = "Filterable by `food_item_id`. Ordered by logging time.",
    params(("id" = uuid::Uuid, Path, description = "Meal id"), ListParams),
    responses(
        (status = 200, description = "Page of logged food items", body = PageResponse<MealFoodItem>),
        (status = 404, description = "Meal not found", body = ErrorResponse),
    )
)]
pub async fn list_meal_food_items(
    State(state): State<AppState>,
    id: IdPath,
    params: RawParams,
) -> Result<Json<PageResponse<MealFoodItem>>, ApiError> {
    let meal_id = id?.0;
    let query = list_query::<MealFoodItem>(params)?;
    Ok(Json(state.meal_food_items.list(meal_id, &query).await?.into()))
}

/// `PUT /meals/{id}/food-items/{item_id}` — Replace a logged food item.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the meal or the item does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/meals/{id}/food-items/{item_id}",
    tag = "Meals",
    summary = "Update a meal's food item",
    params(
        ("id" = uuid::Uuid, Path, description = "Meal id"),
        ("item_id" = uuid::Uuid, Path, description = "Logged food item id"),
    ),
    request_body = MealFoodItemDetails,
    responses(
        (status = 200, description = "Updated food item", body = MealFoodItem),
        (status = 404, description = "Meal or food item not found", body = ErrorResponse),
    )
)]
pub async fn update_meal_food_item(
    State(state): State<AppState>,
    ids: NestedPath,
    body: JsonBody<MealFoodItemDetails>,
) -> Result<Json<MealFoodItem>, ApiError> {
    let (meal_id, item_id) = ids?.0;
    let Json(draft) = body?;
    Ok(Json(
        state
            .meal_food_items
            .update(meal_id, item_id, draft)
            .await?,
    ))
}

/// `DELETE /meals/{id}/food-items/{item_id}` — Remove a food item from a meal.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the meal or the item does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/meals/{id}/food-items/{item_id}",
    tag = "Meals",
    summary = "Remove a meal's food item",
    params(
        ("id" = uuid::Uuid, Path, description = "Meal id"),
        ("item_id" = uuid::Uuid, Path, description = "Logged food item id"),
    ),
    responses(
        (status = 204, description = "Food item removed"),
        (status = 404, description = "Meal or food item not found", body = ErrorResponse),
    )
)]
pub async fn remove_meal_food_item(
    State(state): State<AppState>,
    ids: NestedPath,
) -> Result<StatusCode, ApiError> {
    let (meal_id, item_id) = ids?.0;
    state.meal_food_items.remove(meal_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Meal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route(
            "/meals/{id}",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
        .route(
            "/meals/{id}/food-items",
            get(list_meal_food_items).post(add_meal_food_item),
        )
        .route(
            "/meals/{id}/food-items/{item_id}",
            put(update_meal_food_item).delete(remove_meal_food_item),
        )
}
