use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::{validate_not_blank, MuscleGroup, TrainingLevel};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub level: TrainingLevel,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanDay {
    pub id: Uuid,
    pub workout_plan_id: Uuid,
    pub day_number: i32,
    pub name: String,
    pub is_optional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanExercise {
    pub id: Uuid,
    pub plan_day_id: Uuid,
    pub exercise_id: Uuid,
    pub order_in_workout: i32,
    pub target_sets: i32,
    pub target_reps_min: i32,
    pub target_reps_max: i32,
    pub warmup_sets: i32,
}

/// Plan exercise joined with the catalog entry it references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanExerciseDetail {
    pub id: Uuid,
    pub plan_day_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub muscle_group: MuscleGroup,
    pub order_in_workout: i32,
    pub target_sets: i32,
    pub target_reps_min: i32,
    pub target_reps_max: i32,
    pub warmup_sets: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDayDetail {
    #[serde(flatten)]
    pub day: PlanDay,
    pub exercises: Vec<PlanExerciseDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub days: Vec<PlanDayDetail>,
}

/// One training day as picked by the user: a name and an ordered list of exercises.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanDaySelection {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    #[validate(length(min = 1, message = "each day needs at least one exercise"))]
    pub exercise_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 7, message = "a plan has between 1 and 7 days"), nested)]
    pub days: Vec<PlanDaySelection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseSwap {
    pub plan_exercise_id: Uuid,
    pub exercise_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(default)]
    pub exercise_swaps: Vec<ExerciseSwap>,
}
