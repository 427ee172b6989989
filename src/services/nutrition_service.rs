use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::ApiResult;
use crate::models::{CreateNutritionLogRequest, NutritionLog};

#[derive(Clone)]
pub struct NutritionService {
    db: PgPool,
}

impl NutritionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_logs(&self, user_id: Uuid) -> ApiResult<Vec<NutritionLog>> {
        let logs = sqlx::query_as::<_, NutritionLog>(
            "SELECT * FROM nutrition_logs WHERE user_id = $1 ORDER BY date DESC, time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Missing date or time default to the current UTC moment.
    pub async fn create_log(
        &self,
        user_id: Uuid,
        request: CreateNutritionLogRequest,
    ) -> ApiResult<NutritionLog> {
        request.validate()?;
        let now = Utc::now();

        let log = sqlx::query_as::<_, NutritionLog>(
            "INSERT INTO nutrition_logs (user_id, name, amount, date, time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(request.name.trim())
        .bind(request.amount.trim())
        .bind(request.date.unwrap_or_else(|| now.date_naive()))
        .bind(request.time.unwrap_or_else(|| now.time()))
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }
}
