// Business logic services

pub mod exercise_service;
pub mod goal_service;
pub mod nutrition_service;
pub mod plan_params;
pub mod plan_service;
pub mod stats_service;
pub mod user_service;
pub mod workout_session_service;

pub use exercise_service::ExerciseService;
pub use goal_service::GoalService;
pub use nutrition_service::NutritionService;
pub use plan_params::{select_plan_params, PlanParams};
pub use plan_service::PlanService;
pub use stats_service::StatsService;
pub use user_service::UserService;
pub use workout_session_service::WorkoutSessionService;
