//! Workout plans, their exercises, sessions, and per-set session logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::exercise::Difficulty;
use super::record::{Child, Editable, NewRecord, check_range};
use crate::error::InvalidInput;
use crate::persistence::{Entity, SortKey};
use crate::query::{FieldKind, FieldSpec, Value};

text_enum! {
    /// Lifecycle of a workout session.
    #[derive(Default)]
    SessionStatus {
        /// Planned, not started.
        #[default]
        Scheduled => "scheduled",
        /// Started, not finished.
        InProgress => "in_progress",
        /// Finished.
        Completed => "completed",
        /// Abandoned.
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Weekday a plan exercise is scheduled on.
    DayOfWeek {
        /// Monday.
        Monday => "monday",
        /// Tuesday.
        Tuesday => "tuesday",
        /// Wednesday.
        Wednesday => "wednesday",
        /// Thursday.
        Thursday => "thursday",
        /// Friday.
        Friday => "friday",
        /// Saturday.
        Saturday => "saturday",
        /// Sunday.
        Sunday => "sunday",
    }
}

/// Client-writable workout plan fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutPlanDetails {
    /// Owner; `None` for catalogue plans.
    pub user_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Summary.
    pub description: Option<String>,
    /// Free-form category, e.g. `split`.
    pub plan_type: Option<String>,
    /// Difficulty rating.
    #[serde(default)]
    pub difficulty_level: Difficulty,
    /// Typical session length.
    pub duration_estimate_minutes: Option<i32>,
    /// Sessions per week.
    pub frequency_per_week: Option<i32>,
    /// Visible to every user.
    #[serde(default)]
    pub is_public: bool,
    /// Cover image.
    pub cover_image_url: Option<String>,
}

/// A stored workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct WorkoutPlan {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: WorkoutPlanDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Entity for WorkoutPlan {
    const NAME: &'static str = "workout plan";
    const TABLE: &'static str = "workout_plans";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("difficulty_level", FieldKind::Text),
        FieldSpec::new("is_public", FieldKind::Bool),
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            user_id,
            name,
            description,
            plan_type,
            difficulty_level,
            duration_estimate_minutes,
            frequency_per_week,
            is_public,
            cover_image_url,
        ]);
        cols.extend(columns![self; created_at, updated_at]);
        cols
    }
}

impl Editable for WorkoutPlan {
    type Draft = WorkoutPlanDetails;

    fn create(details: WorkoutPlanDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
            updated_at: record.now,
        }
    }

    fn apply(&mut self, details: WorkoutPlanDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now;
    }
}

/// Client-writable fields of an exercise slot in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlanExerciseDetails {
    /// Exercise performed.
    pub exercise_id: Uuid,
    /// Weekday, for weekly plans.
    pub day_of_week: Option<DayOfWeek>,
    /// Day index, for cycle-based plans.
    pub day_number: Option<i32>,
    /// Position within the day.
    pub exercise_order: i32,
    /// Number of sets.
    pub sets: Option<i32>,
    /// Lower bound of the rep range.
    pub reps_min: Option<i32>,
    /// Upper bound of the rep range.
    pub reps_max: Option<i32>,
    /// Rep target.
    pub reps_target: Option<i32>,
    /// Duration for timed exercises.
    pub duration_seconds: Option<i32>,
    /// Rest between sets.
    pub rest_period_seconds: Option<i32>,
    /// Notes.
    pub notes: Option<String>,
}

/// An exercise slot in a workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct PlanExercise {
    /// Primary key.
    pub id: Uuid,
    /// Owning plan.
    pub plan_id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: PlanExerciseDetails,
}

impl Entity for PlanExercise {
    const NAME: &'static str = "plan exercise";
    const TABLE: &'static str = "workout_plan_exercises";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("plan_id", FieldKind::Uuid),
        FieldSpec::new("exercise_id", FieldKind::Uuid),
        FieldSpec::new("day_of_week", FieldKind::Text),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::asc("exercise_order")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id, plan_id];
        cols.extend(columns![self.details;
            exercise_id,
            day_of_week,
            day_number,
            exercise_order,
            sets,
            reps_min,
            reps_max,
            reps_target,
            duration_seconds,
            rest_period_seconds,
            notes,
        ]);
        cols
    }
}

impl Editable for PlanExercise {
    type Draft = PlanExerciseDetails;

    fn create(details: PlanExerciseDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            plan_id: Uuid::nil(),
            details,
        }
    }

    fn apply(&mut self, details: PlanExerciseDetails, _now: DateTime<Utc>) {
        self.details = details;
    }
}

impl Child for PlanExercise {
    type Parent = WorkoutPlan;
    const PARENT_KEY: &'static str = "plan_id";

    fn parent_id(&self) -> Uuid {
        self.plan_id
    }

    fn attach(&mut self, parent: Uuid) {
        self.plan_id = parent;
    }
}

/// Client-writable workout session fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutSessionDetails {
    /// Owner.
    pub user_id: Uuid,
    /// Plan followed, if any.
    pub plan_id: Option<Uuid>,
    /// Display name.
    pub session_name: Option<String>,
    /// Planned start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Actual start.
    pub started_at: Option<DateTime<Utc>>,
    /// Actual end.
    pub completed_at: Option<DateTime<Utc>>,
    /// Length of the session.
    pub duration_minutes: Option<i32>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: SessionStatus,
    /// Notes.
    pub notes: Option<String>,
    /// Where it took place.
    pub location: Option<String>,
    /// Mood afterwards, 1 to 5.
    pub mood_rating: Option<i32>,
    /// Rate of perceived exertion, 1 to 10.
    pub perceived_exertion_rating: Option<i32>,
}

/// A stored workout session.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct WorkoutSession {
    /// Primary key.
    pub id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: WorkoutSessionDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Entity for WorkoutSession {
    const NAME: &'static str = "workout session";
    const TABLE: &'static str = "user_workout_sessions";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("plan_id", FieldKind::Uuid),
        FieldSpec::new("status", FieldKind::Text),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::desc("scheduled_at")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id];
        cols.extend(columns![self.details;
            user_id,
            plan_id,
            session_name,
            scheduled_at,
            started_at,
            completed_at,
            duration_minutes,
            status,
            notes,
            location,
            mood_rating,
            perceived_exertion_rating,
        ]);
        cols.extend(columns![self; created_at, updated_at]);
        cols
    }
}

impl Editable for WorkoutSession {
    type Draft = WorkoutSessionDetails;

    fn validate(draft: &WorkoutSessionDetails) -> Result<(), InvalidInput> {
        check_range("mood_rating", draft.mood_rating, 1, 5)?;
        check_range("perceived_exertion_rating", draft.perceived_exertion_rating, 1, 10)
    }

    fn create(details: WorkoutSessionDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            details,
            created_at: record.now,
            updated_at: record.now,
        }
    }

    fn apply(&mut self, details: WorkoutSessionDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now;
    }
}

/// Client-writable fields of one logged set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SessionLogDetails {
    /// Exercise performed.
    pub exercise_id: Uuid,
    /// Plan slot this set fulfils.
    pub plan_exercise_id: Option<Uuid>,
    /// Set index, starting at 1.
    pub set_number: i32,
    /// Reps done.
    pub reps_completed: Option<i32>,
    /// Load.
    pub weight_kg: Option<f64>,
    /// Distance, for cardio.
    pub distance_km: Option<f64>,
    /// Duration, for timed sets.
    pub duration_seconds_completed: Option<i32>,
    /// Rest after the set.
    pub rest_taken_seconds: Option<i32>,
    /// Notes.
    pub notes: Option<String>,
}

/// One logged set in a workout session.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct SessionLog {
    /// Primary key.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// Client-writable fields.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: SessionLogDetails,
    /// When the set was logged.
    pub logged_at: DateTime<Utc>,
}

impl Entity for SessionLog {
    const NAME: &'static str = "session log";
    const TABLE: &'static str = "user_workout_session_logs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("session_id", FieldKind::Uuid),
        FieldSpec::new("exercise_id", FieldKind::Uuid),
    ];
    const ORDER: &'static [SortKey] = &[SortKey::asc("exercise_id"), SortKey::asc("set_number")];

    fn id(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = columns![self; id, session_id];
        cols.extend(columns![self.details;
            exercise_id,
            plan_exercise_id,
            set_number,
            reps_completed,
            weight_kg,
            distance_km,
            duration_seconds_completed,
            rest_taken_seconds,
            notes,
        ]);
        cols.extend(columns![self; logged_at]);
        cols
    }
}

impl Editable for SessionLog {
    type Draft = SessionLogDetails;

    fn create(details: SessionLogDetails, record: NewRecord) -> Self {
        Self {
            id: record.id,
            session_id: Uuid::nil(),
            details,
            logged_at: record.now,
        }
    }

    fn apply(&mut self, details: SessionLogDetails, _now: DateTime<Utc>) {
        self.details = details;
    }
}

impl Child for SessionLog {
    type Parent = WorkoutSession;
    const PARENT_KEY: &'static str = "session_id";

    fn parent_id(&self) -> Uuid {
        self.session_id
    }

    fn attach(&mut self, parent: Uuid) {
        self.session_id = parent;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn session_status_defaults_to_scheduled() {
        let json = serde_json::json!({ "user_id": Uuid::new_v4() });
        let draft = serde_json::from_value::<WorkoutSessionDetails>(json).ok();
        assert_eq!(draft.map(|d| d.status), Some(SessionStatus::Scheduled));
    }

    #[test]
    fn attach_moves_log_under_session() {
        let details = SessionLogDetails {
            exercise_id: Uuid::new_v4(),
            plan_exercise_id: None,
            set_number: 1,
            reps_completed: Some(10),
            weight_kg: Some(60.0),
            distance_km: None,
            duration_seconds_completed: None,
            rest_taken_seconds: Some(90),
            notes: None,
        };
        let session = Uuid::new_v4();
        let mut log = SessionLog::create(details, NewRecord::generate());
        log.attach(session);
        assert_eq!(log.parent_id(), session);
        assert_eq!(log.value(SessionLog::PARENT_KEY), Some(Value::from(session)));
    }

    #[test]
    fn session_ratings_are_range_checked() {
        let json = serde_json::json!({ "user_id": Uuid::new_v4() });
        let Ok(mut draft) = serde_json::from_value::<WorkoutSessionDetails>(json) else {
            panic!("draft should parse");
        };
        assert_eq!(WorkoutSession::validate(&draft), Ok(()));

        draft.mood_rating = Some(5);
        draft.perceived_exertion_rating = Some(1);
        assert_eq!(WorkoutSession::validate(&draft), Ok(()));

        draft.mood_rating = Some(9);
        assert_eq!(
            WorkoutSession::validate(&draft),
            Err(InvalidInput::OutOfRange { field: "mood_rating", min: 1, max: 5 })
        );

        draft.mood_rating = Some(3);
        draft.perceived_exertion_rating = Some(0);
        assert_eq!(
            WorkoutSession::validate(&draft),
            Err(InvalidInput::OutOfRange {
                field: "perceived_exertion_rating",
                min: 1,
                max: 10
            })
        );
    }

    #[test]
    fn day_of_week_parses() {
        assert_eq!("friday".parse::<DayOfWeek>().ok(), Some(DayOfWeek::Friday));
        assert!("Friday".parse::<DayOfWeek>().is_err());
    }
}
