//! Generic CRUD, listing and search for top-level records.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Editable, NewRecord};
use crate::error::ApiError;
use crate::persistence::Repository;
use crate::query::{Criteria, FilterSet, ListQuery, Page, PageBounds, QueryError};

/// Orchestrates one record type over its repository.
///
/// Every list or search goes through the shared page bounds, so callers
/// never reach the store with an unbounded page.
#[derive(Debug, Clone)]
pub struct EntityService<E: Editable> {
    repo: Arc<dyn Repository<E>>,
    bounds: PageBounds,
}

impl<E: Editable> EntityService<E> {
    /// Creates a service over `repo`.
    #[must_use]
    pub fn new(repo: Arc<dyn Repository<E>>, bounds: PageBounds) -> Self {
        Self { repo, bounds }
    }

    /// Stores a new record with a fresh id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] on a duplicate key,
    /// [`ApiError::InvalidInput`] on a dangling reference, and
    /// [`ApiError::Backend`] on store failure.
    pub async fn create(&self, draft: E::Draft) -> Result<E, ApiError> {
        E::validate(&draft)?;
        let row = E::create(draft, NewRecord::generate());
        let stored = self
            .repo
            .insert(&row)
            .await
            .map_err(|e| ApiError::store(format!("create {}", E::NAME), e))?;
        tracing::info!(entity = E::NAME, id = %stored.id(), "record created");
        Ok(stored)
    }

    /// Fetches a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no record has this id.
    pub async fn get(&self, id: Uuid) -> Result<E, ApiError> {
        self.repo
            .get(id)
            .await
            .map_err(|e| ApiError::store(format!("get {}", E::NAME), e))?
            .ok_or(ApiError::not_found(E::NAME, id))
    }

    /// Lists one page of records, applying filters and, when present,
    /// the search text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Query`] for blank search text or search on a
    /// record type without search fields.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<E>, ApiError> {
        let criteria = query.criteria()?;
        if criteria.search.is_some() && E::SEARCH_FIELDS.is_empty() {
            return Err(QueryError::SearchUnsupported(E::NAME).into());
        }
        let page = query.page_request(&self.bounds);
        self.repo
            .find_page(&criteria, page)
            .await
            .map_err(|e| ApiError::store(format!("list {}", E::NAME), e))
    }

    /// Like [`list`](Self::list), but search text is required.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Query`] when the search text is missing or
    /// blank.
    pub async fn search(&self, query: &ListQuery) -> Result<Page<E>, ApiError> {
        if query.search.is_none() {
            return Err(QueryError::EmptySearch.into());
        }
        self.list(query).await
    }

    /// Replaces the client-writable fields of a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no record has this id.
    pub async fn update(&self, id: Uuid, draft: E::Draft) -> Result<E, ApiError> {
        E::validate(&draft)?;
        let mut row = self.get(id).await?;
        row.apply(draft, Utc::now());
        self.repo
            .update(&row)
            .await
            .map_err(|e| ApiError::store(format!("update {}", E::NAME), e))?
            .ok_or(ApiError::not_found(E::NAME, id))
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no record has this id.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(|e| ApiError::store(format!("delete {}", E::NAME), e))?;
        if !removed {
            return Err(ApiError::not_found(E::NAME, id));
        }
        tracing::info!(entity = E::NAME, %id, "record deleted");
        Ok(())
    }

    /// First record in listing order matching `filters`, e.g. the most
    /// recent entry for a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] on store failure.
    pub async fn latest(&self, filters: FilterSet) -> Result<Option<E>, ApiError> {
        self.repo
            .find_first(&Criteria::filtered(filters))
            .await
            .map_err(|e| ApiError::store(format!("find latest {}", E::NAME), e))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{
        Biometric, BiometricDetails, FoodItem, FoodItemDetails, FoodSource, Meal, MealDetails,
        MealType,
    };
    use crate::persistence::{Backend, Entity};

    fn food(name: &str, brand: Option<&str>) -> FoodItemDetails {
        FoodItemDetails {
            name: name.to_string(),
            brand_name: brand.map(str::to_string),
            barcode_upc: None,
            serving_size_default_qty: 100.0,
            serving_size_default_unit: "g".to_string(),
            calories_per_default_serving: 120.0,
            protein_grams_per_default_serving: 4.0,
            fat_grams_per_default_serving: 2.0,
            carbs_grams_per_default_serving: 20.0,
            fiber_grams_per_default_serving: None,
            sugar_grams_per_default_serving: None,
            saturated_fat_grams_per_default_serving: None,
            trans_fat_grams_per_default_serving: None,
            cholesterol_mg_per_default_serving: None,
            sodium_mg_per_default_serving: None,
            potassium_mg_per_default_serving: None,
            vitamin_a_mcg_per_default_serving: None,
            vitamin_c_mg_per_default_serving: None,
            calcium_mg_per_default_serving: None,
            iron_mg_per_default_serving: None,
            source: FoodSource::System,
            is_verified: true,
            created_by_user_id: None,
        }
    }

    fn food_service() -> EntityService<FoodItem> {
        EntityService::new(Backend::Memory.repository(), PageBounds::STANDARD)
    }

    fn query(pairs: &[(&str, &str)], fields: &[crate::query::FieldSpec]) -> ListQuery {
        let params: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let Ok(query) = ListQuery::from_params(fields, params) else {
            panic!("query should parse");
        };
        query
    }

    #[tokio::test]
    async fn search_oat_finds_name_and_brand_matches() {
        let service = food_service();
        for (name, brand) in [("Oatmeal", None), ("Toast", Some("Oat & Co")), ("Rice", None)] {
            let Ok(_) = service.create(food(name, brand)).await else {
                panic!("create should succeed");
            };
        }
        let Ok(page) = service.search(&query(&[("query", "oat")], FoodItem::FIELDS)).await else {
            panic!("search should succeed");
        };
        let mut names: Vec<&str> = page.items.iter().map(|f| f.details.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Oatmeal", "Toast"]);
        assert_eq!(page.total, 2);
        assert_eq!((page.page, page.page_size), (1, 10));
    }

    #[tokio::test]
    async fn search_without_text_is_rejected() {
        let service = food_service();
        let result = service.search(&query(&[], FoodItem::FIELDS)).await;
        assert!(matches!(result, Err(ApiError::Query(QueryError::EmptySearch))));
        let result = service.search(&query(&[("q", "  ")], FoodItem::FIELDS)).await;
        assert!(matches!(result, Err(ApiError::Query(QueryError::EmptySearch))));
    }

    #[tokio::test]
    async fn list_clamps_page_size() {
        let service = food_service();
        for i in 0..12 {
            let Ok(_) = service.create(food(&format!("item {i}"), None)).await else {
                panic!("create should succeed");
            };
        }
        let Ok(page) = service
            .list(&query(&[("page_size", "500")], FoodItem::FIELDS))
            .await
        else {
            panic!("list should succeed");
        };
        assert_eq!(page.page_size, 100);
        assert_eq!(page.items.len(), 12);

        let Ok(page) = service
            .list(&query(&[("page_size", "0"), ("page", "2")], FoodItem::FIELDS))
            .await
        else {
            panic!("list should succeed");
        };
        assert_eq!(page.page_size, 10);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 12);
    }

    #[tokio::test]
    async fn update_keeps_creation_time() {
        let service = food_service();
        let Ok(created) = service.create(food("Oatmeal", None)).await else {
            panic!("create should succeed");
        };
        let Ok(updated) = service.update(created.id, food("Porridge", None)).await else {
            panic!("update should succeed");
        };
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.details.name, "Porridge");
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let service = food_service();
        let id = Uuid::new_v4();
        assert!(matches!(service.get(id).await, Err(ApiError::NotFound { .. })));
        assert!(matches!(
            service.update(id, food("x", None)).await,
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(service.delete(id).await, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn search_on_unsearchable_entity_is_a_client_error() {
        let service: EntityService<Meal> =
            EntityService::new(Backend::Memory.repository(), PageBounds::STANDARD);
        let result = service.list(&query(&[("q", "lunch")], Meal::FIELDS)).await;
        assert!(matches!(
            result,
            Err(ApiError::Query(QueryError::SearchUnsupported(_)))
        ));
        let Ok(_) = service
            .create(MealDetails {
                user_id: Uuid::new_v4(),
                meal_type: MealType::Lunch,
                meal_date: NaiveDate::MIN,
                meal_time: None,
                custom_meal_name: None,
                notes: None,
                total_calories_consumed: None,
                total_protein_consumed: None,
                total_fat_consumed: None,
                total_carbs_consumed: None,
            })
            .await
        else {
            panic!("create should succeed");
        };
        let Ok(page) = service
            .list(&query(&[("meal_type", "lunch")], Meal::FIELDS))
            .await
        else {
            panic!("list should succeed");
        };
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn latest_follows_entity_order() {
        let service: EntityService<Biometric> =
            EntityService::new(Backend::Memory.repository(), PageBounds::STANDARD);
        let user = Uuid::new_v4();
        for day in [3, 9, 5] {
            let Ok(_) = service
                .create(BiometricDetails {
                    user_id: user,
                    log_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap_or_default(),
                    weight_kg: Some(80.0),
                    height_cm: None,
                    body_fat_percentage: None,
                    waist_circumference_cm: None,
                    hip_circumference_cm: None,
                    chest_circumference_cm: None,
                    resting_heart_rate_bpm: None,
                    activity_level: None,
                })
                .await
            else {
                panic!("create should succeed");
            };
        }
        let Ok(Some(latest)) = service.latest(FilterSet::new().with("user_id", user)).await else {
            panic!("latest should exist");
        };
        assert_eq!(latest.details.log_date, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap_or_default());
        let Ok(none) = service
            .latest(FilterSet::new().with("user_id", Uuid::new_v4()))
            .await
        else {
            panic!("latest should succeed");
        };
        assert!(none.is_none());
    }
}
