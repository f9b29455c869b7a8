//! Static table metadata for stored records.
//!
//! Every SQL identifier the stores emit comes from the constants declared
//! here, never from request input.

use std::fmt::Debug;

use sqlx::FromRow;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::query::{FieldSpec, Value};

/// One component of an entity's listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Column name.
    pub column: &'static str,
    /// Descending when `true`. Nulls sort last either way.
    pub descending: bool,
}

impl SortKey {
    /// Ascending key.
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    /// Descending key.
    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// A single-column uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueKey {
    /// Constrained column.
    pub column: &'static str,
    /// Constraint name as declared in the schema.
    pub constraint: &'static str,
}

impl UniqueKey {
    /// Declares a constraint.
    #[must_use]
    pub const fn new(column: &'static str, constraint: &'static str) -> Self {
        Self { column, constraint }
    }
}

/// A record stored in its own table, keyed by a UUID.
pub trait Entity:
    Clone + Debug + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static
{
    /// Singular name used in messages and logs.
    const NAME: &'static str;
    /// Table name.
    const TABLE: &'static str;
    /// Primary key column.
    const KEY: &'static str = "id";
    /// Filterable fields.
    const FIELDS: &'static [FieldSpec];
    /// Text columns matched by free-text search. Empty disables search.
    const SEARCH_FIELDS: &'static [&'static str] = &[];
    /// Listing order, before the primary-key tie-break.
    const ORDER: &'static [SortKey] = &[SortKey::asc("created_at")];
    /// Uniqueness constraints beyond the primary key.
    const UNIQUE: &'static [UniqueKey] = &[];

    /// Primary key value.
    fn id(&self) -> Uuid;

    /// Every column with its value, primary key first.
    fn columns(&self) -> Vec<(&'static str, Value)>;

    /// Value of one column, if the entity has it.
    fn value(&self, column: &str) -> Option<Value> {
        self.columns()
            .into_iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}
