//! Nutrition goals and body measurements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::record::{Editable, NewRecord};
use crate::persistence::{Entity, SortKey};
use crate::query::{FieldKind, FieldSpec, Value};

text_enum! {
    /// Self-reported daily activity.
    ActivityLevel {
        /// Little or no exercise.
        Sedentary => "sedentary",
        /// Exercise one to three days a week.
        LightlyActive => "lightly_active",
        /// Exercise three to five days a week.
        ModeratelyActive => "moderately_active",
        /// Exercise six to seven days a week.
        VeryActive => "very_active",
        /// Physical job or twice-daily training.
        ExtraActive => "extra_active",
    }
}

const fn active_by_default() -> bool {
    true
}

/// Client-writable nutrition goal fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NutritionGoalDetails {
    /// Owner.
    pub user_id: Uuid,
    /// First day the targets apply.
    pub goal_effective_date: NaiveDate,
    /// Daily energy in kcal.
    pub target_calories: f64,
    /// Daily protein in grams.
    pub target_protein_grams: f64,
    /// Daily fat in grams.
    pub target_fat_grams: f64,
    /// Daily carbohydrates in grams.
    pub target_carbs_grams: f64,
    /// Daily fiber in grams.
    pub target_fiber_grams: Option<f64>,
    /// Daily sugar ceiling in grams.
    pub target_sugar_grams_limit: Option<f64>,
    /// Notes.
    pub notes: Option<String>,
    /// Whether the goal is in force.
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

/// A stored nutrition goal.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct NutritionGoal {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: NutritionGoalDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Entity for NutritionGoal {
    const NAME: &'static str = "nutrition goal";
    const TABLE: &'static str = "user_nutrition_goals";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("is_active", FieldKind::Bool),
        FieldSpec::new("goal_effective_date", FieldKind::Date),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::desc("goal_effective_date")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            user_id,
            goal_effective_date,
            target_calories,
            target_protein_grams,
            target_fat_grams,
            target_carbs_grams,
            target_fiber_grams,
            target_sugar_grams_limit,
            notes,
            is_active,
        ]);
        cols.extend(columns![self; created_at, updated_at]);
        cols
    }
}

impl Editable for NutritionGoal {
    type Draft = NutritionGoalDetails;

    fn create(details: NutritionGoalDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
            updated_at: record.now,
        }
    }

    fn apply(&mut self, details: NutritionGoalDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now;
    }
}

/// Client-writable biometric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BiometricDetails {
    /// Owner.
    pub user_id: Uuid,
    /// Day measured.
    pub log_date: NaiveDate,
    /// Body weight.
    pub weight_kg: Option<f64>,
    /// Height.
    pub height_cm: Option<f64>,
    /// Body fat.
    pub body_fat_percentage: Option<f64>,
    /// Waist circumference.
    pub waist_circumference_cm: Option<f64>,
    /// Hip circumference.
    pub hip_circumference_cm: Option<f64>,
    /// Chest circumference.
    pub chest_circumference_cm: Option<f64>,
    /// Resting heart rate.
    pub resting_heart_rate_bpm: Option<i32>,
    /// Self-reported activity.
    pub activity_level: Option<ActivityLevel>,
}

/// A stored body measurement entry. Entries are not timestamped on update.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Biometric {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: BiometricDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Entity for Biometric {
    const NAME: &'static str = "biometric entry";
    const TABLE: &'static str = "user_biometrics";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("log_date", FieldKind::Date),
        FieldSpec::new("activity_level", FieldKind::Text),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::desc("log_date"), SortKey::desc("created_at")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            user_id,
            log_date,
            weight_kg,
            height_cm,
            body_fat_percentage,
            waist_circumference_cm,
            hip_circumference_cm,
            chest_circumference_cm,
            resting_heart_rate_bpm,
            activity_level,
        ]);
        cols.extend(columns![self; created_at]);
        cols
    }
}

impl Editable for Biometric {
    type Draft = BiometricDetails;

    fn create(details: BiometricDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
        }
    }

    fn apply(&mut self, details: BiometricDetails, _now: DateTime<Utc>) {
        self.details = details;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn goal_is_active_unless_told_otherwise() {
        let json = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "goal_effective_date": "2024-05-01",
            "target_calories": 2200.0,
            "target_protein_grams": 150.0,
            "target_fat_grams": 70.0,
            "target_carbs_grams": 240.0
        });
        let Ok(draft) = serde_json::from_value::<NutritionGoalDetails>(json) else {
            panic!("draft should deserialize");
        };
        assert!(draft.is_active);
    }

    #[test]
    fn missing_activity_level_is_a_text_null() {
        let details = BiometricDetails {
            user_id: Uuid::new_v4(),
            log_date: NaiveDate::MIN,
            weight_kg: Some(80.5),
            height_cm: None,
            body_fat_percentage: None,
            waist_circumference_cm: None,
            hip_circumference_cm: None,
            chest_circumference_cm: None,
            resting_heart_rate_bpm: Some(58),
            activity_level: None,
        };
        let entry = Biometric::create(details, NewRecord::generate());
        assert_eq!(entry.value("activity_level"), Some(Value::Text(None)));
        assert_eq!(entry.value("resting_heart_rate_bpm"), Some(Value::Int(Some(58))));
    }
}
