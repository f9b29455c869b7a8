//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for services and handlers. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::persistence::StoreError;
use crate::query::QueryError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "user not found: 1b4e28ba-2fa1-11d2-883f-0016d3cca427",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`ApiError`] code ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Uniqueness conflicts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Conflict {
    /// Another user has this username.
    #[error("username already taken")]
    UsernameTaken,
    /// Another user has this email.
    #[error("email already registered")]
    EmailTaken,
    /// Any other unique key.
    #[error("duplicate record ({0})")]
    Duplicate(String),
}

/// Semantically invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    /// Password shorter than the configured minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length in characters.
        min: usize,
    },
    /// Current password did not verify.
    #[error("current password is incorrect")]
    WrongPassword,
    /// A referenced record does not exist.
    #[error("referenced record does not exist ({0})")]
    DanglingReference(String),
    /// A numeric field is outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Smallest accepted value.
        min: i32,
        /// Largest accepted value.
        max: i32,
    },
    /// A check constraint rejected the write.
    #[error("value rejected by constraint ({0})")]
    ConstraintViolated(String),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                     |
/// |-----------|-----------------------|---------------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request                 |
/// | 2000–2999 | Not Found / Conflict  | 404 Not Found / 409 Conflict    |
/// | 3000–3999 | Server                | 500 Internal Server Error       |
/// | 4000–4999 | Auth                  | 401 Unauthorized / 403 Forbidden|
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Record with the given ID was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Record kind.
        entity: &'static str,
        /// Requested id.
        id: Uuid,
    },

    /// Write would violate a uniqueness rule.
    #[error(transparent)]
    Conflict(Conflict),

    /// Input failed a business rule.
    #[error(transparent)]
    InvalidInput(InvalidInput),

    /// Malformed pagination, filter, or search input.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Request body could not be read.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Path or query string could not be decoded.
    #[error("invalid request parameter: {0}")]
    InvalidParameter(String),

    /// Caller is not authenticated.
    #[error("unauthorized")]
    Unauthorized,

    /// Caller may not perform the action.
    #[error("forbidden")]
    Forbidden,

    /// Backing store failed. The cause is logged, never returned.
    #[error("failed to {action}")]
    Backend {
        /// What was being attempted, e.g. `list meals`.
        action: String,
        /// Underlying failure.
        #[source]
        source: StoreError,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for [`ApiError::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Maps a store failure during `action`.
    ///
    /// Constraint violations become client errors; everything else is a
    /// backend failure.
    #[must_use]
    pub fn store(action: impl Into<String>, source: StoreError) -> Self {
        match source {
            StoreError::UniqueViolation { constraint } => Self::Conflict(Conflict::Duplicate(
                constraint.unwrap_or_else(|| "unique".to_string()),
            )),
            StoreError::ForeignKeyViolation { constraint } => {
                Self::InvalidInput(InvalidInput::DanglingReference(
                    constraint.unwrap_or_else(|| "foreign key".to_string()),
                ))
            }
            StoreError::CheckViolation { constraint } => {
                Self::InvalidInput(InvalidInput::ConstraintViolated(
                    constraint.unwrap_or_else(|| "check".to_string()),
                ))
            }
            other => Self::Backend {
                action: action.into(),
                source: other,
            },
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidBody(_) => 1001,
            Self::Query(
                QueryError::InvalidPagination { .. }
                | QueryError::InvalidBounds { .. }
                | QueryError::DuplicateParam { .. },
            ) => 1002,
            Self::Query(QueryError::UnknownField(_)) => 1003,
            Self::Query(QueryError::InvalidFilterValue { .. }) => 1004,
            Self::Query(QueryError::EmptySearch | QueryError::SearchUnsupported(_)) => 1005,
            Self::InvalidInput(InvalidInput::PasswordTooShort { .. }) => 1006,
            Self::InvalidInput(InvalidInput::WrongPassword) => 1007,
            Self::InvalidInput(InvalidInput::DanglingReference(_)) => 1008,
            Self::InvalidParameter(_) => 1009,
            Self::InvalidInput(InvalidInput::OutOfRange { .. }) => 1010,
            Self::InvalidInput(InvalidInput::ConstraintViolated(_)) => 1011,
            Self::NotFound { .. } => 2001,
            Self::Conflict(Conflict::UsernameTaken) => 2101,
            Self::Conflict(Conflict::EmailTaken) => 2102,
            Self::Conflict(Conflict::Duplicate(_)) => 2103,
            Self::Internal(_) => 3000,
            Self::Backend { .. } => 3001,
            Self::Unauthorized => 4001,
            Self::Forbidden => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Query(_)
            | Self::InvalidInput(_)
            | Self::InvalidBody(_)
            | Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Backend { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Conflict> for ApiError {
    fn from(conflict: Conflict) -> Self {
        Self::Conflict(conflict)
    }
}

impl From<InvalidInput> for ApiError {
    fn from(invalid: InvalidInput) -> Self {
        Self::InvalidInput(invalid)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidParameter(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidParameter(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Backend { action, source } => {
                tracing::error!(%action, error = %source, "backing store failure");
            }
            Self::Internal(message) => tracing::error!(%message, "internal error"),
            _ => {}
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_constraint_violations_are_client_errors() {
        let dup = ApiError::store(
            "create food item",
            StoreError::UniqueViolation {
                constraint: Some("food_items_pkey".to_string()),
            },
        );
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);

        let dangling = ApiError::store(
            "create meal",
            StoreError::ForeignKeyViolation { constraint: None },
        );
        assert_eq!(dangling.status_code(), StatusCode::BAD_REQUEST);

        let check = ApiError::store(
            "create workout session",
            StoreError::CheckViolation {
                constraint: Some("user_workout_sessions_mood_rating_check".to_string()),
            },
        );
        assert_eq!(check.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(check.error_code(), 1011);
    }

    #[test]
    fn backend_failure_hides_cause() {
        let err = ApiError::store("list meals", StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "failed to list meals");
        assert_eq!(err.error_code(), 3001);
    }

    #[test]
    fn query_errors_are_bad_requests() {
        let err = ApiError::from(QueryError::EmptySearch);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let err = ApiError::from(QueryError::UnknownField("password_hash".to_string()));
        assert_eq!(err.error_code(), 1003);
    }

    #[test]
    fn auth_variants_map_to_auth_statuses() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn conflict_kinds_have_distinct_codes() {
        assert_eq!(ApiError::from(Conflict::UsernameTaken).error_code(), 2101);
        assert_eq!(ApiError::from(Conflict::EmailTaken).error_code(), 2102);
        assert_eq!(
            ApiError::not_found("user", Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
