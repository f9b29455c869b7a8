//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; `/health` and the
//! API docs live at the root.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::openapi::ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// The served application: routes, API docs and middleware, bound to
/// `state`.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    let router = build_router();

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
    );

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
