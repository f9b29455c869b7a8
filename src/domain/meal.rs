//! Meals and the food items logged in them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::record::{Child, Editable, NewRecord};
use crate::persistence::{Entity, SortKey};
use crate::query::{FieldKind, FieldSpec, Value};

text_enum! {
    /// Slot of the day a meal belongs to.
    MealType {
        /// Morning meal.
        Breakfast => "breakfast",
        /// Midday meal.
        Lunch => "lunch",
        /// Evening meal.
        Dinner => "dinner",
        /// Between meals.
        Snack => "snack",
        /// Anything else.
        Other => "other",
    }
}

/// Client-writable meal fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MealDetails {
    /// Owner.
    pub user_id: Uuid,
    /// Slot of the day.
    pub meal_type: MealType,
    /// Day eaten.
    pub meal_date: NaiveDate,
    /// Time eaten.
    pub meal_time: Option<NaiveTime>,
    /// Free-form name, e.g. "post-run shake".
    pub custom_meal_name: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Energy in kcal.
    pub total_calories_consumed: Option<f64>,
    /// Protein in grams.
    pub total_protein_consumed: Option<f64>,
    /// Fat in grams.
    pub total_fat_consumed: Option<f64>,
    /// Carbohydrates in grams.
    pub total_carbs_consumed: Option<f64>,
}

/// A stored meal.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Meal {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: MealDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Entity for Meal {
    const NAME: &'static str = "meal";
    const TABLE: &'static str = "user_meals";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("meal_type", FieldKind::Text),
        FieldSpec::new("meal_date", FieldKind::Date),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::desc("meal_date"), SortKey::desc("meal_time")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            user_id,
            meal_type,
            meal_date,
            meal_time,
            custom_meal_name,
            notes,
            total_calories_consumed,
            total_protein_consumed,
            total_fat_consumed,
            total_carbs_consumed,
        ]);
        cols.extend(columns![self; created_at, updated_at]);
        cols
    }
}

impl Editable for Meal {
    type Draft = MealDetails;

    fn create(details: MealDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
            updated_at: record.now,
        }
    }

    fn apply(&mut self, details: MealDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now;
    }
}

/// Client-writable fields of a food item logged in a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MealFoodItemDetails {
    /// Catalogue entry eaten.
    pub food_item_id: Uuid,
    /// Amount eaten, in `serving_unit_consumed`.
    pub quantity_consumed: f64,
    /// Unit of `quantity_consumed`.
    pub serving_unit_consumed: String,
    /// Energy in kcal.
    pub calories_consumed: f64,
    /// Protein in grams.
    pub protein_consumed: f64,
    /// Fat in grams.
    pub fat_consumed: f64,
    /// Carbohydrates in grams.
    pub carbs_consumed: f64,
}

/// A food item logged in a meal.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct MealFoodItem {
    /// Primary key.
    pub id: Uuid,
    /// Owning meal.
    pub meal_id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: MealFoodItemDetails,
    /// When the entry was added.
    pub logged_at: DateTime<Utc>,
}

impl Entity for MealFoodItem {
    const NAME: &'static str = "meal food item";
    const TABLE: &'static str = "meal_food_items";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("meal_id", FieldKind::Uuid),
        FieldSpec::new("food_item_id", FieldKind::Uuid),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::asc("logged_at")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id, meal_id];
        cols.extend(columns![self.details;
            food_item_id,
            quantity_consumed,
            serving_unit_consumed,
            calories_consumed,
            protein_consumed,
            fat_consumed,
            carbs_consumed,
        ]);
        cols.extend(columns![self; logged_at]);
        cols
    }
}

impl Editable for MealFoodItem {
    type Draft = MealFoodItemDetails;

    fn create(details: MealFoodItemDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            meal_id: Uuid::nil(),
            details,
            logged_at: record.now,
        }
    }

    fn apply(&mut self, details: MealFoodItemDetails, _now: DateTime<Utc>) {
        self.details = details;
    }
}

impl Child for MealFoodItem {
    type Parent = Meal;
    const PARENT_KEY: &'static str = "meal_id";

    fn parent_id(&self) -> Uuid {
        self.meal_id
    }

    fn attach(&mut self, parent: Uuid) {
        self.meal_id = parent;
    }
}
