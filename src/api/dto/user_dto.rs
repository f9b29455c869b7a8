//! User account DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{User, UserProfile};
use crate::service::{NewUser, UserChanges};

/// Request body for `POST /users`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Unique handle.
    pub username: String,
    /// Unique address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional personal details.
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            profile: req.profile,
        }
    }
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Unique handle.
    pub username: String,
    /// Unique address.
    pub email: String,
    /// Personal details; omitted fields are cleared.
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Enable or disable the account. Unchanged when omitted.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            profile: req.profile,
            is_active: req.is_active,
        }
    }
}

/// Request body for `PUT /users/{id}/password`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PasswordChangeRequest {
    /// Password currently set.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Request body for `PUT /users/{id}/verify-email`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    /// New verification state.
    pub verified: bool,
}

/// A user as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// User id.
    pub id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Unique address.
    pub email: String,
    /// Personal details.
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Account enabled.
    pub is_active: bool,
    /// Email ownership confirmed.
    pub is_email_verified: bool,
    /// Last successful sign-in.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile: user.profile,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_request_reads_flattened_profile() {
        let json = serde_json::json!({
            "username": "ana",
            "email": "ana@example.com",
            "password": "longenough",
            "first_name": "Ana",
        });
        let Ok(req) = serde_json::from_value::<CreateUserRequest>(json) else {
            panic!("request should parse");
        };
        assert_eq!(req.profile.first_name.as_deref(), Some("Ana"));
        assert!(req.profile.last_name.is_none());
    }

    #[test]
    fn response_never_contains_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            profile: UserProfile::default(),
            is_active: true,
            is_email_verified: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        let Ok(json) = serde_json::to_value(UserResponse::from(user)) else {
            panic!("response should serialize");
        };
        assert!(json.get("password_hash").is_none());
        assert_eq!(json.get("username"), Some(&serde_json::json!("ana")));
        assert!(!json.to_string().contains("argon2"));
    }
}
