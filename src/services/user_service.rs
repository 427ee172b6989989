use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::models::{DashboardResponse, TrainingLevel, User, UserProfile};
use crate::services::goal_service::active_goal;

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> ApiResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ApiError::NotFound("User"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn select_level(&self, user_id: Uuid, level: TrainingLevel) -> ApiResult<UserProfile> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET level = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(level)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

        info!(user_id = %user.id, level = level.as_str(), "training level selected");
        Ok(UserProfile::from(&user))
    }

    /// Profile plus the active goal, plan and open session ids.
    pub async fn dashboard(&self, user_id: Uuid) -> ApiResult<DashboardResponse> {
        let user = self.get_user(user_id).await?;
        let active_goal = active_goal(&self.db, user_id).await?;

        let active_plan_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM workout_plans WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let active_session_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM workout_sessions WHERE user_id = $1 AND NOT is_completed",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(DashboardResponse {
            user: UserProfile::from(&user),
            active_goal,
            active_plan_id,
            active_session_id,
        })
    }
}
