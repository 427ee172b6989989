use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::MuscleGroup;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_plan_id: Option<Uuid>,
    pub plan_day_id: Option<Uuid>,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub workout_exercise_id: Uuid,
    pub set_number: i32,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub is_warmup: bool,
    pub is_completed: bool,
    pub rpe: Option<i32>,
    pub notes: Option<String>,
}

impl ExerciseSet {
    /// Weight moved in this set. Warmups and unlogged sets count as zero.
    pub fn volume(&self) -> f64 {
        if self.is_warmup {
            return 0.0;
        }
        match (self.weight, self.reps) {
            (Some(weight), Some(reps)) => weight * f64::from(reps),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionExerciseRow {
    pub id: Uuid,
    pub workout_session_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub muscle_group: MuscleGroup,
    pub order_in_workout: i32,
    pub target_sets: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionExerciseDetail {
    #[serde(flatten)]
    pub exercise: SessionExerciseRow,
    pub sets: Vec<ExerciseSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub total_volume: f64,
    pub exercises: Vec<SessionExerciseDetail>,
}

/// Set values logged by the user. Absent fields clear the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSetRequest {
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(range(min = 0))]
    pub reps: Option<i32>,
    #[serde(default)]
    pub is_completed: bool,
    #[validate(range(min = 1, max = 10, message = "RPE must be between 1 and 10"))]
    pub rpe: Option<i32>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetMutationResponse {
    pub message: String,
    pub set_id: Uuid,
}
