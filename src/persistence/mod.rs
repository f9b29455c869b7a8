//! Persistence layer: one generic repository per entity table.
//!
//! [`Repository`] is the storage seam used by every service. Two
//! implementations exist: [`PgRepository`] on top of `sqlx::PgPool` and
//! [`MemoryRepository`] for running without a database. [`Backend`] picks
//! one at startup.

pub mod entity;
pub mod memory;
pub mod postgres;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub use entity::{Entity, SortKey, UniqueKey};
pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::query::{Criteria, Page, PageRequest};

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation {
        /// Constraint name, when the backend reports it.
        constraint: Option<String>,
    },

    /// A foreign key rejected the write.
    #[error("foreign key violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation {
        /// Constraint name, when the backend reports it.
        constraint: Option<String>,
    },

    /// A check constraint rejected the write.
    #[error("check constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    CheckViolation {
        /// Constraint name, when the backend reports it.
        constraint: Option<String>,
    },

    /// A filter named a column outside the entity allowlist.
    #[error("unknown column: {0}")]
    UnknownField(String),

    /// Search was requested on an entity without search fields.
    #[error("search is not supported for {0}")]
    UnsupportedSearch(&'static str),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            let constraint = db.constraint().map(str::to_string);
            if db.is_unique_violation() {
                return Self::UniqueViolation { constraint };
            }
            if db.is_foreign_key_violation() {
                return Self::ForeignKeyViolation { constraint };
            }
            if db.is_check_violation() {
                return Self::CheckViolation { constraint };
            }
        }
        Self::Database(err)
    }
}

/// CRUD plus filtered, searchable, paged listing for one entity table.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync + Debug {
    /// Counts rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure or invalid criteria.
    async fn count(&self, criteria: &Criteria) -> Result<u64, StoreError>;

    /// Returns one page of rows matching `criteria` in entity order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure or invalid criteria.
    async fn list_page(&self, criteria: &Criteria, page: PageRequest)
    -> Result<Vec<E>, StoreError>;

    /// Fetches a row by primary key.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError>;

    /// Inserts a row and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] on a duplicate key.
    async fn insert(&self, row: &E) -> Result<E, StoreError>;

    /// Replaces the row with the same key. `None` when no such row exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] on a duplicate key.
    async fn update(&self, row: &E) -> Result<Option<E>, StoreError>;

    /// Deletes a row. `false` when no such row existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Counts, then lists, and assembles a [`Page`].
    ///
    /// The two reads are not isolated from concurrent writes.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] raised.
    async fn find_page(&self, criteria: &Criteria, page: PageRequest) -> Result<Page<E>, StoreError> {
        let total = self.count(criteria).await?;
        let items = self.list_page(criteria, page).await?;
        Ok(Page::new(items, total, page))
    }

    /// First row in entity order matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn find_first(&self, criteria: &Criteria) -> Result<Option<E>, StoreError> {
        Ok(self
            .list_page(criteria, PageRequest::FIRST)
            .await?
            .into_iter()
            .next())
    }
}

/// Storage backend chosen at startup.
#[derive(Debug, Clone)]
pub enum Backend {
    /// PostgreSQL through a shared connection pool.
    Postgres(PgPool),
    /// In-process tables, lost on shutdown.
    Memory,
}

impl Backend {
    /// Creates the repository for entity `E` on this backend.
    #[must_use]
    pub fn repository<E: Entity>(&self) -> Arc<dyn Repository<E>> {
        match self {
            Self::Postgres(pool) => Arc::new(PgRepository::<E>::new(pool.clone())),
            Self::Memory => Arc::new(MemoryRepository::<E>::new()),
        }
    }

    /// Short label for logs and the health endpoint.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }
}
