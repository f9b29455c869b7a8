//! PostgreSQL implementation of [`Repository`].
//!
//! Statements are assembled with `sqlx::QueryBuilder`. Column and table
//! names come from [`Entity`] constants; every value is a bound parameter.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Entity, Repository, StoreError};
use crate::query::{Criteria, FieldSpec, PageRequest, Value};

/// PostgreSQL-backed repository for entity `E`.
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    /// Creates a repository on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for PgRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgRepository")
            .field("table", &E::TABLE)
            .finish_non_exhaustive()
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value.clone() {
        Value::Uuid(v) => qb.push_bind(v),
        Value::Text(v) => qb.push_bind(v),
        Value::Int(v) => qb.push_bind(v),
        Value::Float(v) => qb.push_bind(v),
        Value::Bool(v) => qb.push_bind(v),
        Value::Date(v) => qb.push_bind(v),
        Value::Time(v) => qb.push_bind(v),
        Value::Timestamp(v) => qb.push_bind(v),
        Value::TextList(v) => qb.push_bind(v),
    };
}

/// Appends `WHERE ...` for the criteria. Filter columns are re-checked
/// against the allowlist and replaced by its static names.
fn push_where<E: Entity>(
    qb: &mut QueryBuilder<'_, Postgres>,
    criteria: &Criteria,
) -> Result<(), StoreError> {
    let mut clause = " WHERE ";
    for (field, value) in criteria.filters.iter() {
        let spec = FieldSpec::find(E::FIELDS, field)
            .ok_or_else(|| StoreError::UnknownField(field.to_string()))?;
        qb.push(clause).push(spec.name);
        if value.is_null() {
            qb.push(" IS NULL");
        } else {
            qb.push(" = ");
            push_value(qb, value);
        }
        clause = " AND ";
    }

    if let Some(term) = &criteria.search {
        if E::SEARCH_FIELDS.is_empty() {
            return Err(StoreError::UnsupportedSearch(E::NAME));
        }
        let pattern = term.like_pattern();
        qb.push(clause).push("(");
        let mut separated = qb.separated(" OR ");
        for column in E::SEARCH_FIELDS {
            separated.push(*column);
            separated.push_unseparated(" ILIKE ");
            separated.push_bind_unseparated(pattern.clone());
        }
        qb.push(")");
    }
    Ok(())
}

fn push_order<E: Entity>(qb: &mut QueryBuilder<'_, Postgres>) {
    qb.push(" ORDER BY ");
    for key in E::ORDER {
        qb.push(key.column);
        qb.push(if key.descending {
            " DESC NULLS LAST, "
        } else {
            " ASC NULLS LAST, "
        });
    }
    qb.push(E::KEY).push(" ASC");
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn count(&self, criteria: &Criteria) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        qb.push(E::TABLE);
        push_where::<E>(&mut qb, criteria)?;
        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn list_page(
        &self,
        criteria: &Criteria,
        page: PageRequest,
    ) -> Result<Vec<E>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        qb.push(E::TABLE);
        push_where::<E>(&mut qb, criteria)?;
        push_order::<E>(&mut qb);
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());
        let rows = qb.build_query_as::<E>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        qb.push(E::TABLE)
            .push(" WHERE ")
            .push(E::KEY)
            .push(" = ")
            .push_bind(id);
        let row = qb.build_query_as::<E>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn insert(&self, row: &E) -> Result<E, StoreError> {
        let columns = row.columns();
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(E::TABLE).push(" (");
        let mut names = qb.separated(", ");
        for (name, _) in &columns {
            names.push(*name);
        }
        qb.push(") VALUES (");
        for (i, (_, value)) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(") RETURNING *");
        let stored = qb.build_query_as::<E>().fetch_one(&self.pool).await?;
        Ok(stored)
    }

    async fn update(&self, row: &E) -> Result<Option<E>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
        qb.push(E::TABLE).push(" SET ");
        let mut first = true;
        for (name, value) in row.columns() {
            if name == E::KEY {
                continue;
            }
            if !first {
                qb.push(", ");
            }
            first = false;
            qb.push(name).push(" = ");
            push_value(&mut qb, &value);
        }
        qb.push(" WHERE ")
            .push(E::KEY)
            .push(" = ")
            .push_bind(row.id())
            .push(" RETURNING *");
        let stored = qb.build_query_as::<E>().fetch_optional(&self.pool).await?;
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(E::TABLE)
            .push(" WHERE ")
            .push(E::KEY)
            .push(" = ")
            .push_bind(id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SortKey;
    use crate::query::{FieldKind, FilterSet, SearchTerm};
    use sqlx::FromRow;

    #[derive(Debug, Clone, FromRow)]
    struct Reading {
        id: Uuid,
    }

    impl Entity for Reading {
        const NAME: &'static str = "reading";
        const TABLE: &'static str = "readings";
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::new("owner_id", FieldKind::Uuid),
            FieldSpec::new("kind", FieldKind::Text),
        ];
        const SEARCH_FIELDS: &'static [&'static str] = &["name", "brand_name"];
        const ORDER: &'static [SortKey] = &[SortKey::desc("logged_on")];

        fn id(&self) -> Uuid {
            self.id
        }

        fn columns(&self) -> Vec<(&'static str, Value)> {
            vec![("id", self.id.into())]
        }
    }

    fn select_sql(criteria: &Criteria) -> Result<String, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        qb.push(Reading::TABLE);
        push_where::<Reading>(&mut qb, criteria)?;
        push_order::<Reading>(&mut qb);
        Ok(qb.into_sql())
    }

    #[test]
    fn filters_and_search_are_parameterised() {
        let criteria = Criteria {
            filters: FilterSet::new()
                .with("kind", "system")
                .with("owner_id", Value::Uuid(None)),
            search: SearchTerm::new("oat").ok(),
        };
        let sql = select_sql(&criteria).unwrap_or_default();
        assert_eq!(
            sql,
            "SELECT * FROM readings WHERE kind = $1 AND owner_id IS NULL \
             AND (name ILIKE $2 OR brand_name ILIKE $3) \
             ORDER BY logged_on DESC NULLS LAST, id ASC"
        );
    }

    #[test]
    fn unlisted_filter_column_is_refused() {
        let criteria = Criteria::filtered(FilterSet::new().with("password_hash", "x"));
        assert!(matches!(
            select_sql(&criteria),
            Err(StoreError::UnknownField(ref f)) if f == "password_hash"
        ));
    }

    #[test]
    fn empty_criteria_has_no_where() {
        let sql = select_sql(&Criteria::default()).unwrap_or_default();
        assert_eq!(
            sql,
            "SELECT * FROM readings ORDER BY logged_on DESC NULLS LAST, id ASC"
        );
    }
}
