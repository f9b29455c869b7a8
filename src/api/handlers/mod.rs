//! REST endpoint handlers organized by resource.
//!
//! Extractors are taken as `Result<_, Rejection>` so malformed bodies,
//! paths and query strings surface as [`ApiError`] JSON bodies instead of
//! Axum's plain-text rejections.

pub mod exercise;
pub mod food_item;
pub mod meal;
pub mod nutrition;
pub mod system;
pub mod user;
pub mod workout_plan;
pub mod workout_session;

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::{Json, Router};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::persistence::Entity;
use crate::query::ListQuery;

/// JSON request body.
pub(crate) type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Single `{id}` path segment.
pub(crate) type IdPath = Result<Path<Uuid>, PathRejection>;

/// Parent and child ids of a nested resource.
pub(crate) type NestedPath = Result<Path<(Uuid, Uuid)>, PathRejection>;

/// Raw query string, validated per resource.
pub(crate) type RawParams = Result<Query<BTreeMap<String, String>>, QueryRejection>;

/// Validates a query string against `E`'s filterable fields.
pub(crate) fn list_query<E: Entity>(params: RawParams) -> Result<ListQuery, ApiError> {
    let Query(params) = params?;
    Ok(ListQuery::from_params(E::FIELDS, params)?)
}

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(user::routes())
        .merge(food_item::routes())
        .merge(exercise::routes())
        .merge(meal::routes())
        .merge(nutrition::routes())
        .merge(workout_session::routes())
        .merge(workout_plan::routes())
}
