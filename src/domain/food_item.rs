//! Food items: the nutrition catalogue meals are logged against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::record::{Editable, NewRecord};
use crate::persistence::Entity;
use crate::query::{FieldKind, FieldSpec, Value};

text_enum! {
    /// Where a food item's data came from.
    #[derive(Default)]
    FoodSource {
        /// Entered by a user.
        #[default]
        UserCreated => "user_created",
        /// Shipped with the catalogue.
        System => "system",
        /// Imported from an external database.
        Api => "api",
    }
}

/// Client-writable food item fields. Nutrients are per default serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FoodItemDetails {
    /// Display name.
    pub name: String,
    /// Manufacturer or brand.
    pub brand_name: Option<String>,
    /// UPC/EAN barcode.
    pub barcode_upc: Option<String>,
    /// Quantity of the default serving.
    pub serving_size_default_qty: f64,
    /// Unit of the default serving, e.g. `g`.
    pub serving_size_default_unit: String,
    /// Energy in kcal.
    pub calories_per_default_serving: f64,
    /// Protein in grams.
    pub protein_grams_per_default_serving: f64,
    /// Fat in grams.
    pub fat_grams_per_default_serving: f64,
    /// Carbohydrates in grams.
    pub carbs_grams_per_default_serving: f64,
    /// Fiber in grams.
    pub fiber_grams_per_default_serving: Option<f64>,
    /// Sugar in grams.
    pub sugar_grams_per_default_serving: Option<f64>,
    /// Saturated fat in grams.
    pub saturated_fat_grams_per_default_serving: Option<f64>,
    /// Trans fat in grams.
    pub trans_fat_grams_per_default_serving: Option<f64>,
    /// Cholesterol in milligrams.
    pub cholesterol_mg_per_default_serving: Option<f64>,
    /// Sodium in milligrams.
    pub sodium_mg_per_default_serving: Option<f64>,
    /// Potassium in milligrams.
    pub potassium_mg_per_default_serving: Option<f64>,
    /// Vitamin A in micrograms.
    pub vitamin_a_mcg_per_default_serving: Option<f64>,
    /// Vitamin C in milligrams.
    pub vitamin_c_mg_per_default_serving: Option<f64>,
    /// Calcium in milligrams.
    pub calcium_mg_per_default_serving: Option<f64>,
    /// Iron in milligrams.
    pub iron_mg_per_default_serving: Option<f64>,
    /// Data provenance.
    #[serde(default)]
    pub source: FoodSource,
    /// Checked by a moderator.
    #[serde(default)]
    pub is_verified: bool,
    /// Author, for user-created items.
    pub created_by_user_id: Option<Uuid>,
}

/// A stored food item.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct FoodItem {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: FoodItemDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Entity for FoodItem {
    const NAME: &'static str = "food item";
    const TABLE: &'static str = "food_items";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text),
        FieldSpec::new("brand_name", FieldKind::Text),
        FieldSpec::new("barcode_upc", FieldKind::Text),
        FieldSpec::new("source", FieldKind::Text),
        FieldSpec::new("is_verified", FieldKind::Bool),
        FieldSpec::new("created_by_user_id", FieldKind::Uuid),
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "brand_name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            name,
            brand_name,
            barcode_upc,
            serving_size_default_qty,
            serving_size_default_unit,
            calories_per_default_serving,
            protein_grams_per_default_serving,
            fat_grams_per_default_serving,
            carbs_grams_per_default_serving,
            fiber_grams_per_default_serving,
            sugar_grams_per_default_serving,
            saturated_fat_grams_per_default_serving,
            trans_fat_grams_per_default_serving,
            cholesterol_mg_per_default_serving,
            sodium_mg_per_default_serving,
            potassium_mg_per_default_serving,
            vitamin_a_mcg_per_default_serving,
            vitamin_c_mg_per_default_serving,
            calcium_mg_per_default_serving,
            iron_mg_per_default_serving,
            source,
            is_verified,
            created_by_user_id,
        ]);
        cols.extend(columns![self; created_at, updated_at]);
        cols
    }
}

impl Editable for FoodItem {
    type Draft = FoodItemDetails;

    fn create(details: FoodItemDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
            updated_at: record.now,
        }
    }

    fn apply(&mut self, details: FoodItemDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn source_round_trips_through_text() {
        assert_eq!("api".parse::<FoodSource>().ok(), Some(FoodSource::Api));
        assert_eq!(FoodSource::UserCreated.to_string(), "user_created");
        assert!("vendor".parse::<FoodSource>().is_err());
    }

    #[test]
    fn draft_defaults_source_and_verification() {
        let json = r#"{
            "name": "Oatmeal",
            "serving_size_default_qty": 40.0,
            "serving_size_default_unit": "g",
            "calories_per_default_serving": 150.0,
            "protein_grams_per_default_serving": 5.0,
            "fat_grams_per_default_serving": 3.0,
            "carbs_grams_per_default_serving": 27.0
        }"#;
        let Ok(draft) = serde_json::from_str::<FoodItemDetails>(json) else {
            panic!("draft should deserialize");
        };
        assert_eq!(draft.source, FoodSource::UserCreated);
        assert!(!draft.is_verified);
        assert_eq!(draft.brand_name, None);
    }

    #[test]
    fn columns_cover_the_table() {
        let Ok(draft) = serde_json::from_value::<FoodItemDetails>(serde_json::json!({
            "name": "Toast",
            "brand_name": "Oat & Co",
            "serving_size_default_qty": 1.0,
            "serving_size_default_unit": "slice",
            "calories_per_default_serving": 80.0,
            "protein_grams_per_default_serving": 3.0,
            "fat_grams_per_default_serving": 1.0,
            "carbs_grams_per_default_serving": 15.0,
            "source": "system"
        })) else {
            panic!("draft should deserialize");
        };
        let item = FoodItem::create(draft, NewRecord::generate());
        let cols = item.columns();
        assert_eq!(cols.len(), 26);
        assert_eq!(cols.first().map(|(name, _)| *name), Some("id"));
        assert_eq!(item.value("source"), Some(Value::from("system")));
        assert_eq!(item.value("brand_name"), Some(Value::from("Oat & Co")));
    }
}
