//! Exercise catalogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::record::{Editable, NewRecord};
use crate::persistence::Entity;
use crate::query::{FieldKind, FieldSpec, Value};

text_enum! {
    /// Difficulty rating shared by exercises and workout plans.
    #[derive(Default)]
    Difficulty {
        /// No prior training needed.
        #[default]
        Beginner => "beginner",
        /// Some training needed.
        Intermediate => "intermediate",
        /// Regular training needed.
        Advanced => "advanced",
        /// Competitive level.
        Expert => "expert",
    }
}

text_enum! {
    /// Training modality.
    #[derive(Default)]
    ExerciseType {
        /// Resistance training.
        #[default]
        Strength => "strength",
        /// Endurance.
        Cardio => "cardio",
        /// Stretching and mobility.
        Flexibility => "flexibility",
        /// Stability.
        Balance => "balance",
        /// High-intensity intervals.
        Hiit => "hiit",
        /// Yoga.
        Yoga => "yoga",
        /// Pilates.
        Pilates => "pilates",
        /// Anything else.
        Other => "other",
    }
}

/// Client-writable exercise fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExerciseDetails {
    /// Display name.
    pub name: String,
    /// How to perform it.
    pub description: Option<String>,
    /// Main muscle group worked.
    pub muscle_group_primary: Option<String>,
    /// Other muscle groups worked.
    #[serde(default)]
    pub muscle_groups_secondary: Vec<String>,
    /// Equipment, `none` for bodyweight.
    pub equipment_required: String,
    /// Difficulty rating.
    #[serde(default)]
    pub difficulty_level: Difficulty,
    /// Demonstration video.
    pub video_url: Option<String>,
    /// Small preview image.
    pub image_url_thumbnail: Option<String>,
    /// Full-size image.
    pub image_url_main: Option<String>,
    /// Training modality.
    #[serde(default)]
    pub exercise_type: ExerciseType,
    /// Author, for user-created exercises.
    pub created_by_user_id: Option<Uuid>,
    /// Visible to every user.
    #[serde(default)]
    pub is_public: bool,
}

/// A stored exercise.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Exercise {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: ExerciseDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Entity for Exercise {
    const NAME: &'static str = "exercise";
    const TABLE: &'static str = "exercises";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text),
        FieldSpec::new("muscle_group_primary", FieldKind::Text),
        FieldSpec::new("equipment_required", FieldKind::Text),
        FieldSpec::new("difficulty_level", FieldKind::Text),
        FieldSpec::new("exercise_type", FieldKind::Text),
        FieldSpec::new("created_by_user_id", FieldKind::Uuid),
        FieldSpec::new("is_public", FieldKind::Bool),
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            name,
            description,
            muscle_group_primary,
            muscle_groups_secondary,
            equipment_required,
            difficulty_level,
            video_url,
            image_url_thumbnail,
            image_url_main,
            exercise_type,
            created_by_user_id,
            is_public,
        ]);
        cols.extend(columns![self; created_at, updated_at]);
        cols
    }
}

impl Editable for Exercise {
    type Draft = ExerciseDetails;

    fn create(details: ExerciseDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
            updated_at: record.now,
        }
    }

    fn apply(&mut self, details: ExerciseDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now;
    }
}
