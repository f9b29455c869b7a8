//! In-process implementation of [`Repository`].
//!
//! Rows live in a `tokio::sync::RwLock<BTreeMap>` per entity table.
//! Matching, ordering and uniqueness follow the PostgreSQL backend so the
//! two are interchangeable behind the trait.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Entity, Repository, StoreError};
use crate::query::{Criteria, FieldSpec, PageRequest, Value};

/// Repository keeping rows of `E` in memory.
pub struct MemoryRepository<E> {
    rows: RwLock<BTreeMap<Uuid, E>>,
}

impl<E> MemoryRepository<E> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for MemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("table", &E::TABLE)
            .finish_non_exhaustive()
    }
}

/// Rejects criteria the SQL backend would reject.
fn validate<E: Entity>(criteria: &Criteria) -> Result<(), StoreError> {
    for (field, _) in criteria.filters.iter() {
        if FieldSpec::find(E::FIELDS, field).is_none() {
            return Err(StoreError::UnknownField(field.to_string()));
        }
    }
    if criteria.search.is_some() && E::SEARCH_FIELDS.is_empty() {
        return Err(StoreError::UnsupportedSearch(E::NAME));
    }
    Ok(())
}

fn matches<E: Entity>(row: &E, criteria: &Criteria) -> bool {
    let filtered = criteria.filters.iter().all(|(field, wanted)| {
        let actual = row.value(field);
        if wanted.is_null() {
            actual.is_none_or(|v| v.is_null())
        } else {
            actual.as_ref() == Some(wanted)
        }
    });
    if !filtered {
        return false;
    }
    match &criteria.search {
        None => true,
        Some(term) => E::SEARCH_FIELDS.iter().any(|column| {
            row.value(column)
                .as_ref()
                .and_then(Value::as_text)
                .is_some_and(|text| term.matches(text))
        }),
    }
}

/// Entity order with nulls last, then primary key ascending.
fn order<E: Entity>(a: &E, b: &E) -> Ordering {
    for key in E::ORDER {
        let left = a.value(key.column);
        let right = b.value(key.column);
        let left_null = left.as_ref().is_none_or(Value::is_null);
        let right_null = right.as_ref().is_none_or(Value::is_null);
        let ord = match (left_null, right_null) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match (&left, &right) {
                (Some(l), Some(r)) if key.descending => r.compare(l),
                (Some(l), Some(r)) => l.compare(r),
                _ => Ordering::Equal,
            },
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.id().cmp(&b.id())
}

/// Checks the entity's unique keys against every other row.
fn check_unique<E: Entity>(rows: &BTreeMap<Uuid, E>, candidate: &E) -> Result<(), StoreError> {
    for key in E::UNIQUE {
        let Some(value) = candidate.value(key.column).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = rows
            .values()
            .any(|row| row.id() != candidate.id() && row.value(key.column).as_ref() == Some(&value));
        if taken {
            return Err(StoreError::UniqueViolation {
                constraint: Some(key.constraint.to_string()),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn count(&self, criteria: &Criteria) -> Result<u64, StoreError> {
        validate::<E>(criteria)?;
        let rows = self.rows.read().await;
        let total = rows.values().filter(|row| matches(*row, criteria)).count();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn list_page(
        &self,
        criteria: &Criteria,
        page: PageRequest,
    ) -> Result<Vec<E>, StoreError> {
        validate::<E>(criteria)?;
        let rows = self.rows.read().await;
        let mut hits: Vec<&E> = rows.values().filter(|row| matches(*row, criteria)).collect();
        hits.sort_by(|a, b| order(*a, *b));
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(0);
        Ok(hits.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, row: &E) -> Result<E, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&row.id()) {
            return Err(StoreError::UniqueViolation {
                constraint: Some(format!("{}_pkey", E::TABLE)),
            });
        }
        check_unique(&rows, row)?;
        rows.insert(row.id(), row.clone());
        Ok(row.clone())
    }

    async fn update(&self, row: &E) -> Result<Option<E>, StoreError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&row.id()) {
            return Ok(None);
        }
        check_unique(&rows, row)?;
        rows.insert(row.id(), row.clone());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;
    use sqlx::FromRow;

    use super::*;
    use crate::persistence::{SortKey, UniqueKey};
    use crate::query::{FieldKind, FilterSet, PageBounds, SearchTerm};

    #[derive(Debug, Clone, FromRow)]
    struct Item {
        id: Uuid,
        name: String,
        brand_name: Option<String>,
        source: String,
        logged_on: Option<NaiveDate>,
    }

    impl Entity for Item {
        const NAME: &'static str = "item";
        const TABLE: &'static str = "items";
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::new("source", FieldKind::Text),
            FieldSpec::new("brand_name", FieldKind::Text),
        ];
        const SEARCH_FIELDS: &'static [&'static str] = &["name", "brand_name"];
        const ORDER: &'static [SortKey] = &[SortKey::desc("logged_on")];
        const UNIQUE: &'static [UniqueKey] = &[UniqueKey::new("name", "items_name_key")];

        fn id(&self) -> Uuid {
            self.id
        }

        fn columns(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("id", self.id.into()),
                ("name", self.name.clone().into()),
                ("brand_name", self.brand_name.clone().into()),
                ("source", self.source.clone().into()),
                ("logged_on", self.logged_on.into()),
            ]
        }
    }

    fn item(name: &str, brand: Option<&str>, day: Option<u32>) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand_name: brand.map(str::to_string),
            source: "system".to_string(),
            logged_on: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d)),
        }
    }

    async fn seeded(items: &[Item]) -> MemoryRepository<Item> {
        let repo = MemoryRepository::new();
        for it in items {
            let Ok(_) = repo.insert(it).await else {
                panic!("insert should succeed");
            };
        }
        repo
    }

    #[tokio::test]
    async fn search_matches_any_field_case_insensitively() {
        let repo = seeded(&[
            item("Oatmeal", None, Some(1)),
            item("Toast", Some("Oat & Co"), Some(2)),
            item("Rice", Some("Acme"), Some(3)),
        ])
        .await;
        let Ok(term) = SearchTerm::new("oat") else {
            panic!("valid term");
        };
        let criteria = Criteria::default().with_search(term);
        let page = PageBounds::STANDARD.normalize(None, None);
        let Ok(result) = repo.find_page(&criteria, page).await else {
            panic!("search should succeed");
        };
        let names: Vec<&str> = result.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Toast", "Oatmeal"]);
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn page_holds_at_most_page_size_items() {
        let items: Vec<Item> = (1..=25).map(|d| item(&format!("food {d}"), None, Some(d))).collect();
        let repo = seeded(&items).await;
        let bounds = PageBounds::STANDARD;
        for (page, size) in [(1, 10), (3, 10), (4, 10), (1, 100), (2, 7)] {
            let req = bounds.normalize(Some(page), Some(size));
            let Ok(result) = repo.find_page(&Criteria::default(), req).await else {
                panic!("list should succeed");
            };
            assert!(result.items.len() as i64 <= req.page_size());
            assert!(result.total >= result.items.len() as u64);
            assert_eq!(result.total, 25);
        }
        let Ok(last) = repo
            .find_page(&Criteria::default(), bounds.normalize(Some(3), Some(10)))
            .await
        else {
            panic!("list should succeed");
        };
        assert_eq!(last.items.len(), 5);
    }

    #[tokio::test]
    async fn descending_order_puts_nulls_last() {
        let repo = seeded(&[
            item("undated", None, None),
            item("old", None, Some(1)),
            item("new", None, Some(9)),
        ])
        .await;
        let Ok(rows) = repo
            .list_page(&Criteria::default(), PageBounds::STANDARD.normalize(None, None))
            .await
        else {
            panic!("list should succeed");
        };
        let names: Vec<&str> = rows.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old", "undated"]);
    }

    #[tokio::test]
    async fn null_filter_matches_missing_values() {
        let repo = seeded(&[item("plain", None, Some(1)), item("branded", Some("Acme"), Some(2))]).await;
        let criteria = Criteria::filtered(FilterSet::new().with("brand_name", Value::Text(None)));
        let Ok(rows) = repo.list_page(&criteria, PageRequest::FIRST).await else {
            panic!("list should succeed");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|r| r.name.as_str()), Some("plain"));
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected() {
        let repo = seeded(&[]).await;
        let criteria = Criteria::filtered(FilterSet::new().with("name", "x"));
        assert!(matches!(
            repo.count(&criteria).await,
            Err(StoreError::UnknownField(_))
        ));
    }

    #[tokio::test]
    async fn unique_key_is_enforced() {
        let first = item("Oatmeal", None, None);
        let repo = seeded(std::slice::from_ref(&first)).await;
        let result = repo.insert(&item("Oatmeal", None, None)).await;
        assert!(matches!(
            result,
            Err(StoreError::UniqueViolation { constraint: Some(ref c) }) if c == "items_name_key"
        ));
        let again = repo.insert(&first).await;
        assert!(matches!(again, Err(StoreError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = seeded(&[]).await;
        let ghost = item("ghost", None, None);
        assert!(matches!(repo.update(&ghost).await, Ok(None)));
        assert!(matches!(repo.delete(ghost.id).await, Ok(false)));
    }
}
