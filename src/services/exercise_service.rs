use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::errors::{is_unique_violation, ApiError, ApiResult};
use crate::models::{CreateExerciseRequest, Exercise, MuscleGroup};

#[derive(Clone)]
pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Active catalog entries, grouped by muscle group then name.
    pub async fn list_exercises(&self, muscle_group: Option<MuscleGroup>) -> ApiResult<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT * FROM exercises
             WHERE is_active AND ($1::muscle_group IS NULL OR muscle_group = $1)
             ORDER BY muscle_group, name",
        )
        .bind(muscle_group)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_exercise(&self, request: CreateExerciseRequest) -> ApiResult<Exercise> {
        request.validate()?;

        let exercise = sqlx::query_as::<_, Exercise>(
            "INSERT INTO exercises (name, description, muscle_group, equipment, difficulty, video_url, instructions)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(request.muscle_group)
        .bind(request.equipment)
        .bind(request.difficulty)
        .bind(&request.video_url)
        .bind(&request.instructions)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::conflict(format!("Exercise '{}' already exists", request.name.trim()))
            } else {
                ApiError::Database(err)
            }
        })?;

        info!(exercise_id = %exercise.id, "exercise added to catalog");
        Ok(exercise)
    }
}
