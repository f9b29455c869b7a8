//! User accounts: uniqueness-checked creation, profile updates, passwords.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use crate::domain::user::{EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use crate::domain::{NewRecord, User, UserProfile};
use crate::error::{ApiError, Conflict, InvalidInput};
use crate::persistence::{Repository, StoreError};
use crate::query::{Criteria, FilterSet, ListQuery, Page, PageBounds, QueryError};

/// Input for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique handle.
    pub username: String,
    /// Unique address.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Personal details.
    pub profile: UserProfile,
}

/// Replacement account fields. `is_active` is kept when `None`.
#[derive(Debug, Clone)]
pub struct UserChanges {
    /// New handle.
    pub username: String,
    /// New address.
    pub email: String,
    /// New personal details.
    pub profile: UserProfile,
    /// Enable or disable the account.
    pub is_active: Option<bool>,
}

/// Orchestrates user accounts.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: Arc<dyn Repository<User>>,
    bounds: PageBounds,
    min_password_len: usize,
}

impl UserService {
    /// Creates a user service.
    #[must_use]
    pub fn new(repo: Arc<dyn Repository<User>>, bounds: PageBounds, min_password_len: usize) -> Self {
        Self {
            repo,
            bounds,
            min_password_len,
        }
    }

    fn check_password(&self, password: &str) -> Result<(), ApiError> {
        if password.chars().count() < self.min_password_len {
            return Err(InvalidInput::PasswordTooShort {
                min: self.min_password_len,
            }
            .into());
        }
        Ok(())
    }

    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<User>, ApiError> {
        self.repo
            .find_first(&Criteria::filtered(FilterSet::new().with(field, value)))
            .await
            .map_err(|e| ApiError::store("look up user", e))
    }

    /// Fails when `field = value` belongs to a user other than `owner`.
    async fn ensure_free(
        &self,
        field: &'static str,
        value: &str,
        owner: Option<Uuid>,
        conflict: Conflict,
    ) -> Result<(), ApiError> {
        match self.find_by(field, value).await? {
            Some(user) if Some(user.id) != owner => Err(conflict.into()),
            _ => Ok(()),
        }
    }

    /// Creates an account.
    ///
    /// Checks run in order: password length, username, email. Nothing is
    /// written unless all pass.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::PasswordTooShort`],
    /// [`Conflict::UsernameTaken`] or [`Conflict::EmailTaken`], the
    /// latter two also when a concurrent insert wins the race.
    pub async fn create(&self, new_user: NewUser) -> Result<User, ApiError> {
        self.check_password(&new_user.password)?;
        self.ensure_free("username", &new_user.username, None, Conflict::UsernameTaken)
            .await?;
        self.ensure_free("email", &new_user.email, None, Conflict::EmailTaken)
            .await?;

        let record = NewRecord::generate();
        let user = User {
            id: record.id,
            username: new_user.username,
            email: new_user.email,
            password_hash: hash_password(&new_user.password).await?,
            profile: new_user.profile,
            is_active: true,
            is_email_verified: false,
            last_login_at: None,
            created_at: record.now,
            updated_at: record.now,
        };
        let stored = self
            .repo
            .insert(&user)
            .await
            .map_err(|e| map_write_error("create user", e))?;
        tracing::info!(id = %stored.id, username = %stored.username, "user created");
        Ok(stored)
    }

    /// Fetches an account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no user has this id.
    pub async fn get(&self, id: Uuid) -> Result<User, ApiError> {
        self.repo
            .get(id)
            .await
            .map_err(|e| ApiError::store("get user", e))?
            .ok_or(ApiError::not_found("user", id))
    }

    /// Lists one page of accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Query`] for invalid input, including any search
    /// text.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<User>, ApiError> {
        let criteria = query.criteria()?;
        if criteria.search.is_some() {
            return Err(QueryError::SearchUnsupported("user").into());
        }
        self.repo
            .find_page(&criteria, query.page_request(&self.bounds))
            .await
            .map_err(|e| ApiError::store("list users", e))
    }

    /// Replaces account fields. Username and email uniqueness is only
    /// re-checked for values that changed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] or a [`Conflict`].
    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, ApiError> {
        let mut user = self.get(id).await?;
        if changes.username != user.username {
            self.ensure_free("username", &changes.username, Some(id), Conflict::UsernameTaken)
                .await?;
        }
        if changes.email != user.email {
            self.ensure_free("email", &changes.email, Some(id), Conflict::EmailTaken)
                .await?;
        }
        user.username = changes.username;
        user.email = changes.email;
        user.profile = changes.profile;
        if let Some(active) = changes.is_active {
            user.is_active = active;
        }
        self.save(user, "update user").await
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no user has this id.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(|e| ApiError::store("delete user", e))?;
        if !removed {
            return Err(ApiError::not_found("user", id));
        }
        tracing::info!(%id, "user deleted");
        Ok(())
    }

    /// Changes the password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::PasswordTooShort`] for a short new password
    /// and [`InvalidInput::WrongPassword`] when `current` does not verify.
    pub async fn update_password(&self, id: Uuid, current: &str, new: &str) -> Result<(), ApiError> {
        self.check_password(new)?;
        let mut user = self.get(id).await?;
        if !verify_password(current, &user.password_hash).await? {
            tracing::warn!(%id, "password change rejected");
            return Err(InvalidInput::WrongPassword.into());
        }
        user.password_hash = hash_password(new).await?;
        self.save(user, "update password").await?;
        tracing::info!(%id, "password changed");
        Ok(())
    }

    /// Sets the email-verified flag.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no user has this id.
    pub async fn set_email_verified(&self, id: Uuid, verified: bool) -> Result<User, ApiError> {
        let mut user = self.get(id).await?;
        user.is_email_verified = verified;
        self.save(user, "update email verification").await
    }

    async fn save(&self, mut user: User, action: &'static str) -> Result<User, ApiError> {
        let id = user.id;
        user.updated_at = Utc::now();
        self.repo
            .update(&user)
            .await
            .map_err(|e| map_write_error(action, e))?
            .ok_or(ApiError::not_found("user", id))
    }
}

/// Maps the users table's own constraints back to their conflict kinds.
fn map_write_error(action: &'static str, err: StoreError) -> ApiError {
    if let StoreError::UniqueViolation { constraint } = &err {
        match constraint.as_deref() {
            Some(USERNAME_CONSTRAINT) => return Conflict::UsernameTaken.into(),
            Some(EMAIL_CONSTRAINT) => return Conflict::EmailTaken.into(),
            _ => {}
        }
    }
    ApiError::store(action, err)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::Backend;

    fn service() -> UserService {
        UserService::new(Backend::Memory.repository(), PageBounds::STANDARD, 8)
    }

    fn new_user(username: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            profile: UserProfile::default(),
        }
    }

    #[tokio::test]
    async fn create_sets_defaults_and_hashes() {
        let svc = service();
        let Ok(user) = svc.create(new_user("ana", "ana@example.com", "s3cretpass")).await else {
            panic!("create should succeed");
        };
        assert!(user.is_active);
        assert!(!user.is_email_verified);
        assert_eq!(user.created_at, user.updated_at);
        assert_ne!(user.password_hash, "s3cretpass");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let svc = service();
        let Ok(_) = svc.create(new_user("alice", "alice@a.io", "longenough")).await else {
            panic!("first create should succeed");
        };
        let result = svc.create(new_user("alice", "other@a.io", "longenough")).await;
        assert!(matches!(
            result,
            Err(ApiError::Conflict(Conflict::UsernameTaken))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service();
        let Ok(_) = svc.create(new_user("bob", "bob@a.io", "longenough")).await else {
            panic!("first create should succeed");
        };
        let result = svc.create(new_user("robert", "bob@a.io", "longenough")).await;
        assert!(matches!(result, Err(ApiError::Conflict(Conflict::EmailTaken))));
    }

    #[tokio::test]
    async fn short_password_is_rejected_without_write() {
        let svc = service();
        let result = svc.create(new_user("carol", "carol@a.io", "abcde")).await;
        assert!(matches!(
            result,
            Err(ApiError::InvalidInput(InvalidInput::PasswordTooShort { min: 8 }))
        ));
        let Ok(page) = svc.list(&ListQuery::default()).await else {
            panic!("list should succeed");
        };
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn password_check_precedes_uniqueness() {
        let svc = service();
        let Ok(_) = svc.create(new_user("dave", "dave@a.io", "longenough")).await else {
            panic!("create should succeed");
        };
        let result = svc.create(new_user("dave", "dave@a.io", "short")).await;
        assert!(matches!(
            result,
            Err(ApiError::InvalidInput(InvalidInput::PasswordTooShort { .. }))
        ));
    }

    #[tokio::test]
    async fn store_level_violation_maps_to_conflict_kind() {
        let err = map_write_error(
            "create user",
            StoreError::UniqueViolation {
                constraint: Some(EMAIL_CONSTRAINT.to_string()),
            },
        );
        assert!(matches!(err, ApiError::Conflict(Conflict::EmailTaken)));
    }

    #[tokio::test]
    async fn update_rechecks_only_changed_fields() {
        let svc = service();
        let (Ok(erin), Ok(_frank)) = (
            svc.create(new_user("erin", "erin@a.io", "longenough")).await,
            svc.create(new_user("frank", "frank@a.io", "longenough")).await,
        ) else {
            panic!("create should succeed");
        };
        let keep = UserChanges {
            username: "erin".to_string(),
            email: "erin@a.io".to_string(),
            profile: UserProfile {
                first_name: Some("Erin".to_string()),
                ..UserProfile::default()
            },
            is_active: None,
        };
        let Ok(updated) = svc.update(erin.id, keep).await else {
            panic!("unchanged identity should not conflict");
        };
        assert_eq!(updated.profile.first_name.as_deref(), Some("Erin"));
        assert_eq!(updated.created_at, erin.created_at);

        let steal = UserChanges {
            username: "frank".to_string(),
            email: "erin@a.io".to_string(),
            profile: UserProfile::default(),
            is_active: None,
        };
        assert!(matches!(
            svc.update(erin.id, steal).await,
            Err(ApiError::Conflict(Conflict::UsernameTaken))
        ));
    }

    #[tokio::test]
    async fn password_change_requires_current_password() {
        let svc = service();
        let Ok(user) = svc.create(new_user("gina", "gina@a.io", "first-password")).await else {
            panic!("create should succeed");
        };
        assert!(matches!(
            svc.update_password(user.id, "wrong-password", "second-password").await,
            Err(ApiError::InvalidInput(InvalidInput::WrongPassword))
        ));
        assert!(matches!(
            svc.update_password(user.id, "first-password", "short").await,
            Err(ApiError::InvalidInput(InvalidInput::PasswordTooShort { .. }))
        ));
        assert!(svc
            .update_password(user.id, "first-password", "second-password")
            .await
            .is_ok());
        let Ok(stored) = svc.get(user.id).await else {
            panic!("user should exist");
        };
        assert!(matches!(verify_password("second-password", &stored.password_hash).await, Ok(true)));
    }

    #[tokio::test]
    async fn email_verification_flag_is_set() {
        let svc = service();
        let Ok(user) = svc.create(new_user("hugo", "hugo@a.io", "longenough")).await else {
            panic!("create should succeed");
        };
        let Ok(verified) = svc.set_email_verified(user.id, true).await else {
            panic!("verification should succeed");
        };
        assert!(verified.is_email_verified);
        assert!(matches!(
            svc.set_email_verified(Uuid::new_v4(), true).await,
            Err(ApiError::NotFound { entity: "user", .. })
        ));
    }
}
