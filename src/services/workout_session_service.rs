use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{is_unique_violation, ApiError, ApiResult};
use crate::models::{
    ExerciseSet, PlanDay, PlanExercise, SessionDetail, SessionExerciseDetail, SessionExerciseRow,
    SetMutationResponse, UpdateSetRequest, WorkoutSession,
};

/// Position of a generated set inside a session exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSet {
    pub set_number: i32,
    pub is_warmup: bool,
}

/// Warmups come first and numbering continues into the working sets.
pub fn session_set_layout(warmup_sets: i32, target_sets: i32) -> Vec<PlannedSet> {
    let warmup_sets = warmup_sets.max(0);
    let target_sets = target_sets.max(0);

    (1..=warmup_sets + target_sets)
        .map(|set_number| PlannedSet {
            set_number,
            is_warmup: set_number <= warmup_sets,
        })
        .collect()
}

#[derive(Debug, FromRow)]
struct SetOwnership {
    user_id: Uuid,
    session_completed: bool,
}

#[derive(Clone)]
pub struct WorkoutSessionService {
    db: PgPool,
}

impl WorkoutSessionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a session from a plan day, cloning its exercises and empty sets.
    #[tracing::instrument(skip(self))]
    pub async fn start_session(&self, user_id: Uuid, plan_day_id: Uuid) -> ApiResult<SessionDetail> {
        let mut tx = self.db.begin().await?;

        let day = sqlx::query_as::<_, PlanDay>("SELECT * FROM workout_plan_days WHERE id = $1")
            .bind(plan_day_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ApiError::NotFound("Plan day"))?;

        let owner_id = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM workout_plans WHERE id = $1")
            .bind(day.workout_plan_id)
            .fetch_one(&mut *tx)
            .await?;
        if owner_id != user_id {
            warn!(user_id = %user_id, plan_day_id = %plan_day_id, "plan day access denied");
            return Err(ApiError::Forbidden);
        }

        let open_session = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM workout_sessions WHERE user_id = $1 AND NOT is_completed",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(session_id) = open_session {
            return Err(ApiError::conflict(format!(
                "You already have an active workout ({session_id})"
            )));
        }

        let now = Utc::now();
        let session = sqlx::query_as::<_, WorkoutSession>(
            "INSERT INTO workout_sessions (user_id, workout_plan_id, plan_day_id, name, date, start_time, is_completed)
             VALUES ($1, $2, $3, $4, $5, $6, FALSE)
             RETURNING *",
        )
        .bind(user_id)
        .bind(day.workout_plan_id)
        .bind(day.id)
        .bind(&day.name)
        .bind(now.date_naive())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::conflict("You already have an active workout")
            } else {
                ApiError::Database(err)
            }
        })?;

        let plan_exercises = sqlx::query_as::<_, PlanExercise>(
            "SELECT * FROM workout_plan_exercises WHERE plan_day_id = $1 ORDER BY order_in_workout",
        )
        .bind(day.id)
        .fetch_all(&mut *tx)
        .await?;

        for plan_exercise in &plan_exercises {
            let workout_exercise_id = sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO workout_exercises (workout_session_id, exercise_id, order_in_workout, target_sets)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
            )
            .bind(session.id)
            .bind(plan_exercise.exercise_id)
            .bind(plan_exercise.order_in_workout)
            .bind(plan_exercise.target_sets)
            .fetch_one(&mut *tx)
            .await?;

            for planned in session_set_layout(plan_exercise.warmup_sets, plan_exercise.target_sets) {
                sqlx::query(
                    "INSERT INTO exercise_sets (workout_exercise_id, set_number, is_warmup, is_completed)
                     VALUES ($1, $2, $3, FALSE)",
                )
                .bind(workout_exercise_id)
                .bind(planned.set_number)
                .bind(planned.is_warmup)
                .execute(&mut *tx)
                .await?;
            }
        }

        let detail = load_session_detail(&mut tx, session).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            session_id = %detail.session.id,
            exercises = plan_exercises.len(),
            "workout started"
        );
        Ok(detail)
    }

    pub async fn get_active_session(&self, user_id: Uuid) -> ApiResult<Option<SessionDetail>> {
        let mut conn = self.db.acquire().await?;
        let session = sqlx::query_as::<_, WorkoutSession>(
            "SELECT * FROM workout_sessions WHERE user_id = $1 AND NOT is_completed",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        match session {
            Some(session) => Ok(Some(load_session_detail(&mut conn, session).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_session_detail(&self, user_id: Uuid, session_id: Uuid) -> ApiResult<SessionDetail> {
        let mut conn = self.db.acquire().await?;
        let session = owned_session(&mut conn, user_id, session_id, false).await?;
        load_session_detail(&mut conn, session).await
    }

    /// Stamp the end time and close the session. A closed session stays closed.
    #[tracing::instrument(skip(self))]
    pub async fn finish_session(&self, user_id: Uuid, session_id: Uuid) -> ApiResult<SessionDetail> {
        let mut tx = self.db.begin().await?;
        let session = owned_session(&mut tx, user_id, session_id, true).await?;
        if session.is_completed {
            return Err(ApiError::conflict("Workout is already finished"));
        }

        let session = sqlx::query_as::<_, WorkoutSession>(
            "UPDATE workout_sessions SET end_time = $2, is_completed = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(session_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let detail = load_session_detail(&mut tx, session).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            session_id = %session_id,
            total_volume = detail.total_volume,
            "workout finished"
        );
        Ok(detail)
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update_set(
        &self,
        user_id: Uuid,
        set_id: Uuid,
        request: UpdateSetRequest,
    ) -> ApiResult<SetMutationResponse> {
        request.validate()?;

        let mut tx = self.db.begin().await?;
        guard_set_mutation(&mut tx, user_id, set_id).await?;

        sqlx::query_as::<_, ExerciseSet>(
            "UPDATE exercise_sets
             SET weight = $2, reps = $3, is_completed = $4, rpe = $5, notes = $6
             WHERE id = $1
             RETURNING *",
        )
        .bind(set_id)
        .bind(request.weight)
        .bind(request.reps)
        .bind(request.is_completed)
        .bind(request.rpe)
        .bind(&request.notes)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(SetMutationResponse {
            message: "Set updated".to_string(),
            set_id,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_set(&self, user_id: Uuid, set_id: Uuid) -> ApiResult<SetMutationResponse> {
        let mut tx = self.db.begin().await?;
        guard_set_mutation(&mut tx, user_id, set_id).await?;

        sqlx::query("DELETE FROM exercise_sets WHERE id = $1")
            .bind(set_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(SetMutationResponse {
            message: "Set deleted".to_string(),
            set_id,
        })
    }
}

/// `for_update` locks the row for the rest of the caller's transaction.
async fn owned_session(
    conn: &mut PgConnection,
    user_id: Uuid,
    session_id: Uuid,
    for_update: bool,
) -> ApiResult<WorkoutSession> {
    let query = if for_update {
        "SELECT * FROM workout_sessions WHERE id = $1 FOR UPDATE"
    } else {
        "SELECT * FROM workout_sessions WHERE id = $1"
    };
    let session = sqlx::query_as::<_, WorkoutSession>(query)
        .bind(session_id)
        .fetch_optional(conn)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;

    if session.user_id != user_id {
        warn!(user_id = %user_id, session_id = %session_id, "workout access denied");
        return Err(ApiError::Forbidden);
    }

    Ok(session)
}

/// Locks the owning session so finishing and set edits cannot interleave.
async fn guard_set_mutation(conn: &mut PgConnection, user_id: Uuid, set_id: Uuid) -> ApiResult<()> {
    let ownership = sqlx::query_as::<_, SetOwnership>(
        "SELECT s.user_id, s.is_completed AS session_completed
         FROM exercise_sets es
         JOIN workout_exercises we ON we.id = es.workout_exercise_id
         JOIN workout_sessions s ON s.id = we.workout_session_id
         WHERE es.id = $1
         FOR UPDATE OF s",
    )
    .bind(set_id)
    .fetch_optional(conn)
    .await?
    .ok_or(ApiError::NotFound("Set"))?;

    if ownership.user_id != user_id {
        warn!(user_id = %user_id, set_id = %set_id, "set access denied");
        return Err(ApiError::Forbidden);
    }
    if ownership.session_completed {
        return Err(ApiError::conflict("Sets of a finished workout cannot be changed"));
    }

    Ok(())
}

async fn load_session_detail(conn: &mut PgConnection, session: WorkoutSession) -> ApiResult<SessionDetail> {
    let exercises = sqlx::query_as::<_, SessionExerciseRow>(
        "SELECT we.id, we.workout_session_id, we.exercise_id, e.name AS exercise_name, e.muscle_group,
                we.order_in_workout, we.target_sets, we.notes
         FROM workout_exercises we
         JOIN exercises e ON e.id = we.exercise_id
         WHERE we.workout_session_id = $1
         ORDER BY we.order_in_workout",
    )
    .bind(session.id)
    .fetch_all(&mut *conn)
    .await?;

    let sets = sqlx::query_as::<_, ExerciseSet>(
        "SELECT es.* FROM exercise_sets es
         JOIN workout_exercises we ON we.id = es.workout_exercise_id
         WHERE we.workout_session_id = $1
         ORDER BY es.set_number",
    )
    .bind(session.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(assemble_session(session, exercises, sets))
}

fn assemble_session(
    session: WorkoutSession,
    exercises: Vec<SessionExerciseRow>,
    sets: Vec<ExerciseSet>,
) -> SessionDetail {
    let total_volume: f64 = sets.iter().map(ExerciseSet::volume).sum();

    let mut by_exercise: HashMap<Uuid, Vec<ExerciseSet>> = HashMap::new();
    for set in sets {
        by_exercise.entry(set.workout_exercise_id).or_default().push(set);
    }

    let exercises = exercises
        .into_iter()
        .map(|exercise| {
            let mut sets = by_exercise.remove(&exercise.id).unwrap_or_default();
            sets.sort_by_key(|set| set.set_number);
            SessionExerciseDetail { exercise, sets }
        })
        .collect();

    SessionDetail {
        session,
        total_volume,
        exercises,
    }
}
