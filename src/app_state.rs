//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{
    Biometric, Exercise, FoodItem, Meal, MealFoodItem, NutritionGoal, PlanExercise, SessionLog,
    WorkoutPlan, WorkoutSession,
};
use crate::persistence::Backend;
use crate::query::PageBounds;
use crate::service::{EntityService, NestedService, UserService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage backend label, e.g. `postgres`.
    pub storage: &'static str,
    /// User accounts.
    pub users: Arc<UserService>,
    /// Food catalogue.
    pub food_items: Arc<EntityService<FoodItem>>,
    /// Exercise catalogue.
    pub exercises: Arc<EntityService<Exercise>>,
    /// Logged meals.
    pub meals: Arc<EntityService<Meal>>,
    /// Food items within meals.
    pub meal_food_items: Arc<NestedService<MealFoodItem>>,
    /// Nutrition targets.
    pub nutrition_goals: Arc<EntityService<NutritionGoal>>,
    /// Body measurements.
    pub biometrics: Arc<EntityService<Biometric>>,
    /// Workout sessions.
    pub workout_sessions: Arc<EntityService<WorkoutSession>>,
    /// Exercise sets within sessions.
    pub session_logs: Arc<NestedService<SessionLog>>,
    /// Workout plans.
    pub workout_plans: Arc<EntityService<WorkoutPlan>>,
    /// Exercises within plans.
    pub plan_exercises: Arc<NestedService<PlanExercise>>,
}

impl AppState {
    /// Wires every service to `backend`.
    ///
    /// Parent tables hand the same repository to their own service and to
    /// the nested service of their children.
    #[must_use]
    pub fn new(backend: &Backend, bounds: PageBounds, min_password_len: usize) -> Self {
        let meals = backend.repository::<Meal>();
        let sessions = backend.repository::<WorkoutSession>();
        let plans = backend.repository::<WorkoutPlan>();

        Self {
            storage: backend.name(),
            users: Arc::new(UserService::new(
                backend.repository(),
                bounds,
                min_password_len,
            )),
            food_items: Arc::new(EntityService::new(backend.repository(), bounds)),
            exercises: Arc::new(EntityService::new(backend.repository(), bounds)),
            meals: Arc::new(EntityService::new(Arc::clone(&meals), bounds)),
            meal_food_items: Arc::new(NestedService::new(meals, backend.repository(), bounds)),
            nutrition_goals: Arc::new(EntityService::new(backend.repository(), bounds)),
            biometrics: Arc::new(EntityService::new(backend.repository(), bounds)),
            workout_sessions: Arc::new(EntityService::new(Arc::clone(&sessions), bounds)),
            session_logs: Arc::new(NestedService::new(sessions, backend.repository(), bounds)),
            workout_plans: Arc::new(EntityService::new(Arc::clone(&plans), bounds)),
            plan_exercises: Arc::new(NestedService::new(plans, backend.repository(), bounds)),
        }
    }

    /// State over in-process tables with default settings.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(&Backend::Memory, PageBounds::STANDARD, 8)
    }
}
