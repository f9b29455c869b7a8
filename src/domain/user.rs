//! User accounts.
//!
//! [`User`] deliberately has no `Serialize` impl: it carries the password
//! hash, and responses go through
//! [`UserResponse`](crate::api::dto::UserResponse) instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::persistence::{Entity, UniqueKey};
use crate::query::{FieldKind, FieldSpec, Value};

/// Constraint guarding `users.username`.
pub const USERNAME_CONSTRAINT: &str = "users_username_key";
/// Constraint guarding `users.email`.
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Optional personal details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Birth date.
    pub date_of_birth: Option<NaiveDate>,
    /// Free-form gender.
    pub gender: Option<String>,
    /// Avatar.
    pub profile_picture_url: Option<String>,
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    /// Primary key.
    pub id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Unique address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Personal details.
    #[sqlx(flatten)]
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

impl Entity for User {
    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("username", FieldKind::Text),
        FieldSpec::new("email", FieldKind::Text),
        FieldSpec::new("gender", FieldKind::Text),
        FieldSpec::new("is_active", FieldKind::Bool),
        FieldSpec::new("is_email_verified", FieldKind::Bool),
    ];
    const UNIQUE: &'static [UniqueKey] = &[
        UniqueKey::new("username", USERNAME_CONSTRAINT),
        UniqueKey::new("email", EMAIL_CONSTRAINT),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id, username, email, password_hash];
        cols.extend(columns![self.profile;
            first_name,
            last_name,
            date_of_birth,
            gender,
            profile_picture_url,
        ]);
        cols.extend(columns![self;
            is_active,
            is_email_verified,
            last_login_at,
            created_at,
            updated_at,
        ]);
        cols
    }
}
