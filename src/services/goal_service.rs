use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateGoalRequest, Goal, GoalType, User};

#[derive(Clone)]
pub struct GoalService {
    db: PgPool,
}

impl GoalService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self, request), fields(goal_type = ?request.goal_type))]
    pub async fn create_goal(&self, user_id: Uuid, request: CreateGoalRequest) -> ApiResult<Goal> {
        request.validate()?;

        let mut tx = self.db.begin().await?;
        let user = fetch_user(&mut tx, user_id).await?;
        let goal = insert_goal(&mut tx, &user, &request).await?;
        tx.commit().await?;

        Ok(goal)
    }

    /// Make a goal of the given type the user's active one.
    pub async fn select_goal(&self, user_id: Uuid, goal_type: GoalType) -> ApiResult<Goal> {
        self.create_goal(user_id, CreateGoalRequest::of_type(goal_type))
            .await
    }

    pub async fn list_goals(&self, user_id: Uuid) -> ApiResult<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>(
            "SELECT * FROM goals WHERE user_id = $1 ORDER BY is_active DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(goals)
    }
}

pub(crate) async fn active_goal<'e, E>(executor: E, user_id: Uuid) -> Result<Option<Goal>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE user_id = $1 AND is_active")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn fetch_user(conn: &mut PgConnection, user_id: Uuid) -> ApiResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?
        .ok_or(ApiError::NotFound("User"))
}

/// Insert a goal inside the caller's transaction.
///
/// An active goal first retires whatever goal was active before. Body weight
/// goals without a starting value begin at the user's recorded weight.
pub(crate) async fn insert_goal(
    conn: &mut PgConnection,
    user: &User,
    request: &CreateGoalRequest,
) -> Result<Goal, sqlx::Error> {
    let is_active = request.is_active.unwrap_or(true);

    if is_active {
        sqlx::query(
            "UPDATE goals SET is_active = FALSE, updated_at = NOW()
             WHERE user_id = $1 AND is_active",
        )
        .bind(user.id)
        .execute(&mut *conn)
        .await?;
    }

    let current_value = request.current_value.or_else(|| {
        request
            .goal_type
            .tracks_body_weight()
            .then_some(user.weight_kg)
            .flatten()
    });

    let goal = sqlx::query_as::<_, Goal>(
        "INSERT INTO goals (user_id, goal_type, target_value, current_value, unit, target_date, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(user.id)
    .bind(request.goal_type)
    .bind(request.target_value)
    .bind(current_value)
    .bind(&request.unit)
    .bind(request.target_date)
    .bind(is_active)
    .fetch_one(&mut *conn)
    .await?;

    info!(user_id = %user.id, goal_id = %goal.id, active = is_active, "goal created");
    Ok(goal)
}
