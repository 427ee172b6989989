use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::models::{
    CreatePlanRequest, Exercise, PlanDay, PlanDayDetail, PlanDetail, PlanExerciseDetail,
    UpdatePlanRequest, WorkoutPlan,
};
use crate::services::goal_service::{active_goal, fetch_user};
use crate::services::plan_params::select_plan_params;

#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
}

impl PlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build a new active plan from the user's day selections.
    ///
    /// Every plan the user had active before is retired in the same
    /// transaction, so at most one plan stays active.
    #[tracing::instrument(skip(self, request), fields(days = request.days.len()))]
    pub async fn create_plan(&self, user_id: Uuid, request: CreatePlanRequest) -> ApiResult<PlanDetail> {
        request.validate()?;

        let mut tx = self.db.begin().await?;
        let user = fetch_user(&mut tx, user_id).await?;
        let level = user
            .level
            .ok_or_else(|| ApiError::validation("Select a training level before creating a plan"))?;
        let goal_type = active_goal(&mut *tx, user_id).await?.map(|goal| goal.goal_type);

        let mut exercise_ids: Vec<Uuid> = request
            .days
            .iter()
            .flat_map(|day| day.exercise_ids.iter().copied())
            .collect();
        exercise_ids.sort_unstable();
        exercise_ids.dedup();
        let catalog = load_exercises(&mut tx, &exercise_ids).await?;

        sqlx::query(
            "UPDATE workout_plans SET is_active = FALSE, updated_at = NOW()
             WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}'s Plan", user.username));

        let plan = sqlx::query_as::<_, WorkoutPlan>(
            "INSERT INTO workout_plans (user_id, name, level, is_active)
             VALUES ($1, $2, $3, TRUE)
             RETURNING *",
        )
        .bind(user_id)
        .bind(&name)
        .bind(level)
        .fetch_one(&mut *tx)
        .await?;

        for (day_index, selection) in request.days.iter().enumerate() {
            let day_number = day_index as i32 + 1;
            let day = sqlx::query_as::<_, PlanDay>(
                "INSERT INTO workout_plan_days (workout_plan_id, day_number, name, is_optional)
                 VALUES ($1, $2, $3, $4)
                 RETURNING *",
            )
            .bind(plan.id)
            .bind(day_number)
            .bind(day_name(selection.name.as_deref(), day_number))
            .bind(selection.is_optional)
            .fetch_one(&mut *tx)
            .await?;

            for (position, exercise_id) in selection.exercise_ids.iter().enumerate() {
                let exercise = &catalog[exercise_id];
                let params = select_plan_params(level, goal_type, exercise.muscle_group);

                sqlx::query(
                    "INSERT INTO workout_plan_exercises
                        (plan_day_id, exercise_id, order_in_workout, target_sets, target_reps_min, target_reps_max, warmup_sets)
                     VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(day.id)
                .bind(exercise.id)
                .bind(position as i32 + 1)
                .bind(params.target_sets)
                .bind(params.reps_min)
                .bind(params.reps_max)
                .bind(params.warmup_sets)
                .execute(&mut *tx)
                .await?;
            }
        }

        let detail = load_plan_detail(&mut tx, plan).await?;
        tx.commit().await?;

        info!(user_id = %user_id, plan_id = %detail.plan.id, level = level.as_str(), "workout plan created");
        Ok(detail)
    }

    /// Rename a plan and swap exercises, recomputing their prescriptions.
    #[tracing::instrument(skip(self, request), fields(swaps = request.exercise_swaps.len()))]
    pub async fn update_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        request: UpdatePlanRequest,
    ) -> ApiResult<PlanDetail> {
        request.validate()?;

        let mut tx = self.db.begin().await?;
        let plan = owned_plan(&mut tx, user_id, plan_id).await?;
        let user = fetch_user(&mut tx, user_id).await?;
        let level = user.level.unwrap_or(plan.level);
        let goal_type = active_goal(&mut *tx, user_id).await?.map(|goal| goal.goal_type);

        for swap in &request.exercise_swaps {
            let in_plan = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(
                    SELECT 1 FROM workout_plan_exercises pe
                    JOIN workout_plan_days d ON d.id = pe.plan_day_id
                    WHERE pe.id = $1 AND d.workout_plan_id = $2
                 )",
            )
            .bind(swap.plan_exercise_id)
            .bind(plan.id)
            .fetch_one(&mut *tx)
            .await?;
            if !in_plan {
                return Err(ApiError::validation(format!(
                    "Plan exercise {} is not part of this plan",
                    swap.plan_exercise_id
                )));
            }

            let catalog = load_exercises(&mut tx, &[swap.exercise_id]).await?;
            let exercise = &catalog[&swap.exercise_id];
            let params = select_plan_params(level, goal_type, exercise.muscle_group);

            sqlx::query(
                "UPDATE workout_plan_exercises
                 SET exercise_id = $2, target_sets = $3, target_reps_min = $4, target_reps_max = $5, warmup_sets = $6
                 WHERE id = $1",
            )
            .bind(swap.plan_exercise_id)
            .bind(exercise.id)
            .bind(params.target_sets)
            .bind(params.reps_min)
            .bind(params.reps_max)
            .bind(params.warmup_sets)
            .execute(&mut *tx)
            .await?;
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(plan.name.as_str())
            .to_string();

        let plan = sqlx::query_as::<_, WorkoutPlan>(
            "UPDATE workout_plans SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(plan.id)
        .bind(&name)
        .fetch_one(&mut *tx)
        .await?;

        let detail = load_plan_detail(&mut tx, plan).await?;
        tx.commit().await?;

        info!(plan_id = %plan_id, "workout plan updated");
        Ok(detail)
    }

    pub async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> ApiResult<PlanDetail> {
        let mut conn = self.db.acquire().await?;
        let plan = owned_plan(&mut conn, user_id, plan_id).await?;
        load_plan_detail(&mut conn, plan).await
    }

    pub async fn get_active_plan(&self, user_id: Uuid) -> ApiResult<Option<PlanDetail>> {
        let mut conn = self.db.acquire().await?;
        let plan = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT * FROM workout_plans WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        match plan {
            Some(plan) => Ok(Some(load_plan_detail(&mut conn, plan).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_plans(&self, user_id: Uuid) -> ApiResult<Vec<WorkoutPlan>> {
        let plans = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT * FROM workout_plans WHERE user_id = $1 ORDER BY is_active DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    /// Days and plan exercises go with the plan. Past sessions keep their data.
    #[tracing::instrument(skip(self))]
    pub async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> ApiResult<()> {
        let mut tx = self.db.begin().await?;
        owned_plan(&mut tx, user_id, plan_id).await?;

        sqlx::query("DELETE FROM workout_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(plan_id = %plan_id, "workout plan deleted");
        Ok(())
    }
}

/// Fallback name for a day the user did not label.
fn day_name(requested: Option<&str>, day_number: i32) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Training #{day_number}"),
    }
}

async fn owned_plan(conn: &mut PgConnection, user_id: Uuid, plan_id: Uuid) -> ApiResult<WorkoutPlan> {
    let plan = sqlx::query_as::<_, WorkoutPlan>("SELECT * FROM workout_plans WHERE id = $1")
        .bind(plan_id)
        .fetch_optional(conn)
        .await?
        .ok_or(ApiError::NotFound("Workout plan"))?;

    if plan.user_id != user_id {
        warn!(user_id = %user_id, plan_id = %plan_id, "plan access denied");
        return Err(ApiError::Forbidden);
    }

    Ok(plan)
}

/// Active catalog entries by id. Any id without one is a validation error.
async fn load_exercises(conn: &mut PgConnection, ids: &[Uuid]) -> ApiResult<HashMap<Uuid, Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ANY($1) AND is_active")
        .bind(ids)
        .fetch_all(conn)
        .await?;

    let catalog: HashMap<Uuid, Exercise> = exercises
        .into_iter()
        .map(|exercise| (exercise.id, exercise))
        .collect();

    if let Some(missing) = ids.iter().find(|id| !catalog.contains_key(id)) {
        return Err(ApiError::validation(format!("Unknown exercise {missing}")));
    }

    Ok(catalog)
}

async fn load_plan_detail(conn: &mut PgConnection, plan: WorkoutPlan) -> ApiResult<PlanDetail> {
    let days = sqlx::query_as::<_, PlanDay>(
        "SELECT * FROM workout_plan_days WHERE workout_plan_id = $1 ORDER BY day_number",
    )
    .bind(plan.id)
    .fetch_all(&mut *conn)
    .await?;

    let exercises = sqlx::query_as::<_, PlanExerciseDetail>(
        "SELECT pe.id, pe.plan_day_id, pe.exercise_id, e.name AS exercise_name, e.muscle_group,
                pe.order_in_workout, pe.target_sets, pe.target_reps_min, pe.target_reps_max, pe.warmup_sets
         FROM workout_plan_exercises pe
         JOIN workout_plan_days d ON d.id = pe.plan_day_id
         JOIN exercises e ON e.id = pe.exercise_id
         WHERE d.workout_plan_id = $1
         ORDER BY d.day_number, pe.order_in_workout",
    )
    .bind(plan.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(PlanDetail {
        plan,
        days: group_by_day(days, exercises),
    })
}

fn group_by_day(days: Vec<PlanDay>, exercises: Vec<PlanExerciseDetail>) -> Vec<PlanDayDetail> {
    let mut by_day: HashMap<Uuid, Vec<PlanExerciseDetail>> = HashMap::new();
    for exercise in exercises {
        by_day.entry(exercise.plan_day_id).or_default().push(exercise);
    }

    days.into_iter()
        .map(|day| {
            let mut exercises = by_day.remove(&day.id).unwrap_or_default();
            exercises.sort_by_key(|exercise| exercise.order_in_workout);
            PlanDayDetail { day, exercises }
        })
        .collect()
}
