//! OpenAPI document for every REST endpoint.

use utoipa::OpenApi;

use crate::api::handlers::{
    exercise, food_item, meal, nutrition, system, user, workout_plan, workout_session,
};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI documentation for the REST API.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Rebound API",
        description = "Fitness tracking: users, food and exercise catalogues, meals, nutrition goals, biometrics and workouts. Every list endpoint shares one pagination, filter and search contract.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "System", description = "Health check"),
        (name = "Users", description = "User accounts"),
        (name = "Food Items", description = "Food catalogue"),
        (name = "Exercises", description = "Exercise catalogue"),
        (name = "Meals", description = "Logged meals and their food items"),
        (name = "Nutrition", description = "Nutrition goals"),
        (name = "Biometrics", description = "Body measurements"),
        (name = "Workout Sessions", description = "Workout sessions and logged sets"),
        (name = "Workout Plans", description = "Workout plans and their exercises")
    ),
    paths(
        system::health_handler,
        user::create_user,
        user::list_users,
        user::get_user,
        user::update_user,
        user::delete_user,
        user::change_password,
        user::verify_email,
        food_item::create_food_item,
        food_item::list_food_items,
        food_item::search_food_items,
        food_item::get_food_item,
        food_item::update_food_item,
        food_item::delete_food_item,
        exercise::create_exercise,
        exercise::list_exercises,
        exercise::search_exercises,
        exercise::get_exercise,
        exercise::update_exercise,
        exercise::delete_exercise,
        meal::create_meal,
        meal::list_meals,
        meal::get_meal,
        meal::update_meal,
        meal::delete_meal,
        meal::add_meal_food_item,
        meal::list_meal_food_items,
        meal::update_meal_food_item,
        meal::remove_meal_food_item,
        nutrition::create_nutrition_goal,
        nutrition::list_nutrition_goals,
        nutrition::get_nutrition_goal,
        nutrition::update_nutrition_goal,
        nutrition::delete_nutrition_goal,
        nutrition::active_nutrition_goal,
        nutrition::create_biometric,
        nutrition::list_biometrics,
        nutrition::get_biometric,
        nutrition::update_biometric,
        nutrition::delete_biometric,
        nutrition::latest_biometrics,
        workout_session::create_workout_session,
        workout_session::list_workout_sessions,
        workout_session::get_workout_session,
        workout_session::update_workout_session,
        workout_session::delete_workout_session,
        workout_session::add_session_log,
        workout_session::list_session_logs,
        workout_session::update_session_log,
        workout_session::remove_session_log,
        workout_plan::create_workout_plan,
        workout_plan::list_workout_plans,
        workout_plan::search_workout_plans,
        workout_plan::get_workout_plan,
        workout_plan::update_workout_plan,
        workout_plan::delete_workout_plan,
        workout_plan::add_plan_exercise,
        workout_plan::list_plan_exercises,
        workout_plan::update_plan_exercise,
        workout_plan::remove_plan_exercise
    ),
    components(schemas(ErrorResponse, ErrorBody))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/users/{id}/password",
            "/api/v1/food-items/search",
            "/api/v1/meals/{id}/food-items/{item_id}",
            "/api/v1/users/{id}/biometrics/latest",
            "/api/v1/workout-sessions/{id}/logs",
            "/api/v1/workout-plans/{id}/exercises/{exercise_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
