//! Food catalogue handlers: CRUD, filtered listing and search.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::{IdPath, JsonBody, RawParams, list_query};
use crate::api::dto::{ListParams, PageResponse};
use crate::app_state::AppState;
use crate::domain::{FoodItem, FoodItemDetails};
use crate::error::{ApiError, ErrorResponse};

/// `POST /food-items` — Add a food to the catalogue.
///
/// # Errors
///
/// Returns [`ApiError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/food-items",
    tag = "Food Items",
    summary = "Create a food item",
    request_body = FoodItemDetails,
    responses(
        (status = 201, description = "Food item created", body = FoodItem),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
    )
)]
pub async fn create_food_item(
    State(state): State<AppState>,
    body: JsonBody<FoodItemDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let item = state.food_items.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /food-items` — List food items.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid filters or pagination.
#[utoipa::path(
    get,
    path = "/api/v1/food-items",
    tag = "Food Items",
    summary = "List food items",
    description = "Filterable by `name`, `brand_name`, `barcode_upc`, `source`, `is_verified` and `created_by_user_id`.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of food items", body = PageResponse<FoodItem>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_food_items(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<FoodItem>>, ApiError> {
    let query = list_query::<FoodItem>(params)?;
    let page = state.food_items.list(&query).await?;
    Ok(Json(page.into()))
}

/// `GET /food-items/search` — Search food items by name or brand.
///
/// # Errors
///
/// Returns [`ApiError`] when the search text is missing or blank.
#[utoipa::path(
    get,
    path = "/api/v1/food-items/search",
    tag = "Food Items",
    summary = "Search food items",
    description = "Case-insensitive substring match on `name` and `brand_name`. Accepts the same filters as the list endpoint.",
    params(ListParams),
    responses(
        (status = 200, description = "Page of matching food items", body = PageResponse<FoodItem>),
        (status = 400, description = "Missing or invalid query", body = ErrorResponse),
    )
)]
pub async fn search_food_items(
    State(state): State<AppState>,
    params: RawParams,
) -> Result<Json<PageResponse<FoodItem>>, ApiError> {
    let query = list_query::<FoodItem>(params)?;
    let page = state.food_items.search(&query).await?;
    Ok(Json(page.into()))
}

/// `GET /food-items/{id}` — Get a food item.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/food-items/{id}",
    tag = "Food Items",
    summary = "Get a food item",
    params(("id" = uuid::Uuid, Path, description = "Food item id")),
    responses(
        (status = 200, description = "Food item", body = FoodItem),
        (status = 404, description = "Food item not found", body = ErrorResponse),
    )
)]
pub async fn get_food_item(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<FoodItem>, ApiError> {
    let id = id?.0;
    Ok(Json(state.food_items.get(id).await?))
}

/// `PUT /food-items/{id}` — Replace a food item.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    put,
    path = "/api/v1/food-items/{id}",
    tag = "Food Items",
    summary = "Update a food item",
    params(("id" = uuid::Uuid, Path, description = "Food item id")),
    request_body = FoodItemDetails,
    responses(
        (status = 200, description = "Updated food item", body = FoodItem),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Food item not found", body = ErrorResponse),
    )
)]
pub async fn update_food_item(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<FoodItemDetails>,
) -> Result<Json<FoodItem>, ApiError> {
    let id = id?.0;
    let Json(draft) = body?;
    Ok(Json(state.food_items.update(id, draft).await?))
}

/// `DELETE /food-items/{id}` — Delete a food item.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/food-items/{id}",
    tag = "Food Items",
    summary = "Delete a food item",
    params(("id" = uuid::Uuid, Path, description = "Food item id")),
    responses(
        (status = 204, description = "Food item deleted"),
        (status = 404, description = "Food item not found", body = ErrorResponse),
    )
)]
pub async fn delete_food_item(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = id?.0;
    state.food_items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Food item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/food-items", get(list_food_items).post(create_food_item))
        .route("/food-items/search", get(search_food_items))
        .route(
            "/food-items/{id}",
            get(get_food_item)
                .put(update_food_item)
                .delete(delete_food_item),
        )
}
