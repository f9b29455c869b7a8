//! Records that live under a parent record, e.g. the food items of a meal.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Child, NewRecord};
use crate::error::ApiError;
use crate::persistence::{Entity, Repository};
use crate::query::{ListQuery, Page, PageBounds, QueryError};

/// Orchestrates child records through their parent.
///
/// A child addressed under the wrong parent is reported as not found.
#[derive(Debug, Clone)]
pub struct NestedService<C: Child> {
    parents: Arc<dyn Repository<C::Parent>>,
    children: Arc<dyn Repository<C>>,
    bounds: PageBounds,
}

impl<C: Child> NestedService<C> {
    /// Creates a service sharing the parent table's repository.
    #[must_use]
    pub fn new(
        parents: Arc<dyn Repository<C::Parent>>,
        children: Arc<dyn Repository<C>>,
        bounds: PageBounds,
    ) -> Self {
        Self {
            parents,
            children,
            bounds,
        }
    }

    async fn ensure_parent(&self, parent: Uuid) -> Result<(), ApiError> {
        let found = self
            .parents
            .get(parent)
            .await
            .map_err(|e| ApiError::store(format!("get {}", C::Parent::NAME), e))?;
        match found {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found(C::Parent::NAME, parent)),
        }
    }

    async fn find_owned(&self, parent: Uuid, child: Uuid) -> Result<C, ApiError> {
        self.children
            .get(child)
            .await
            .map_err(|e| ApiError::store(format!("get {}", C::NAME), e))?
            .filter(|row| row.parent_id() == parent)
            .ok_or(ApiError::not_found(C::NAME, child))
    }

    /// Adds a child under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the parent does not exist.
    pub async fn add(&self, parent: Uuid, draft: C::Draft) -> Result<C, ApiError> {
        C::validate(&draft)?;
        self.ensure_parent(parent).await?;
        let mut row = C::create(draft, NewRecord::generate());
        row.attach(parent);
        let stored = self
            .children
            .insert(&row)
            .await
            .map_err(|e| ApiError::store(format!("add {}", C::NAME), e))?;
        tracing::info!(entity = C::NAME, %parent, id = %stored.id(), "child record added");
        Ok(stored)
    }

    /// Lists one page of the parent's children.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the parent does not exist and
    /// [`ApiError::Query`] when search text is supplied.
    pub async fn list(&self, parent: Uuid, query: &ListQuery) -> Result<Page<C>, ApiError> {
        let mut criteria = query.criteria()?;
        if criteria.search.is_some() && C::SEARCH_FIELDS.is_empty() {
            return Err(QueryError::SearchUnsupported(C::NAME).into());
        }
        self.ensure_parent(parent).await?;
        criteria.filters.insert(C::PARENT_KEY, parent);
        let page = query.page_request(&self.bounds);
        self.children
            .find_page(&criteria, page)
            .await
            .map_err(|e| ApiError::store(format!("list {}", C::NAME), e))
    }

    /// Replaces a child's client-writable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the parent or the child does
    /// not exist, or the child belongs to another parent.
    pub async fn update(&self, parent: Uuid, child: Uuid, draft: C::Draft) -> Result<C, ApiError> {
        C::validate(&draft)?;
        self.ensure_parent(parent).await?;
        let mut row = self.find_owned(parent, child).await?;
        row.apply(draft, Utc::now());
        self.children
            .update(&row)
            .await
            .map_err(|e| ApiError::store(format!("update {}", C::NAME), e))?
            .ok_or(ApiError::not_found(C::NAME, child))
    }

    /// Removes a child.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the parent or the child does
    /// not exist, or the child belongs to another parent.
    pub async fn remove(&self, parent: Uuid, child: Uuid) -> Result<(), ApiError> {
        self.ensure_parent(parent).await?;
        self.find_owned(parent, child).await?;
        let removed = self
            .children
            .delete(child)
            .await
            .map_err(|e| ApiError::store(format!("remove {}", C::NAME), e))?;
        if !removed {
            return Err(ApiError::not_found(C::NAME, child));
        }
        tracing::info!(entity = C::NAME, %parent, id = %child, "child record removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Meal, MealDetails, MealFoodItem, MealFoodItemDetails, MealType};
    use crate::persistence::Backend;
    use crate::service::EntityService;

    struct Fixture {
        meals: EntityService<Meal>,
        items: NestedService<MealFoodItem>,
    }

    fn fixture() -> Fixture {
        let backend = Backend::Memory;
        let meal_repo = backend.repository::<Meal>();
        Fixture {
            meals: EntityService::new(Arc::clone(&meal_repo), PageBounds::STANDARD),
            items: NestedService::new(meal_repo, backend.repository(), PageBounds::STANDARD),
        }
    }

    async fn meal(fx: &Fixture) -> Meal {
        let draft = MealDetails {
            user_id: Uuid::new_v4(),
            meal_type: MealType::Breakfast,
            meal_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap_or_default(),
            meal_time: None,
            custom_meal_name: None,
            notes: None,
            total_calories_consumed: None,
            total_protein_consumed: None,
            total_fat_consumed: None,
            total_carbs_consumed: None,
        };
        let Ok(meal) = fx.meals.create(draft).await else {
            panic!("meal should be created");
        };
        meal
    }

    fn portion(grams: f64) -> MealFoodItemDetails {
        MealFoodItemDetails {
            food_item_id: Uuid::new_v4(),
            quantity_consumed: grams,
            serving_unit_consumed: "g".to_string(),
            calories_consumed: grams * 1.5,
            protein_consumed: 1.0,
            fat_consumed: 1.0,
            carbs_consumed: 1.0,
        }
    }

    #[tokio::test]
    async fn add_requires_existing_parent() {
        let fx = fixture();
        let result = fx.items.add(Uuid::new_v4(), portion(50.0)).await;
        assert!(matches!(
            result,
            Err(ApiError::NotFound { entity: "meal", .. })
        ));
    }

    #[tokio::test]
    async fn list_only_returns_own_children() {
        let fx = fixture();
        let breakfast = meal(&fx).await;
        let lunch = meal(&fx).await;
        for grams in [10.0, 20.0, 30.0] {
            let Ok(_) = fx.items.add(breakfast.id, portion(grams)).await else {
                panic!("add should succeed");
            };
        }
        let Ok(_) = fx.items.add(lunch.id, portion(99.0)).await else {
            panic!("add should succeed");
        };
        let query = ListQuery::default();
        let Ok(page) = fx.items.list(breakfast.id, &query).await else {
            panic!("list should succeed");
        };
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|i| i.meal_id == breakfast.id));
    }

    #[tokio::test]
    async fn parent_filter_in_query_cannot_escape_path() {
        let fx = fixture();
        let breakfast = meal(&fx).await;
        let lunch = meal(&fx).await;
        let Ok(_) = fx.items.add(lunch.id, portion(5.0)).await else {
            panic!("add should succeed");
        };
        let params = BTreeMap::from([("meal_id".to_string(), lunch.id.to_string())]);
        let Ok(query) = ListQuery::from_params(MealFoodItem::FIELDS, params) else {
            panic!("query should parse");
        };
        let Ok(page) = fx.items.list(breakfast.id, &query).await else {
            panic!("list should succeed");
        };
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn child_of_other_parent_is_not_found() {
        let fx = fixture();
        let breakfast = meal(&fx).await;
        let lunch = meal(&fx).await;
        let Ok(item) = fx.items.add(breakfast.id, portion(40.0)).await else {
            panic!("add should succeed");
        };
        assert!(matches!(
            fx.items.update(lunch.id, item.id, portion(41.0)).await,
            Err(ApiError::NotFound { entity: "meal food item", .. })
        ));
        assert!(matches!(
            fx.items.remove(lunch.id, item.id).await,
            Err(ApiError::NotFound { .. })
        ));

        let Ok(updated) = fx.items.update(breakfast.id, item.id, portion(45.0)).await else {
            panic!("update should succeed");
        };
        assert_eq!(updated.logged_at, item.logged_at);
        assert!((updated.details.quantity_consumed - 45.0).abs() < f64::EPSILON);
        assert!(fx.items.remove(breakfast.id, item.id).await.is_ok());
    }
}
