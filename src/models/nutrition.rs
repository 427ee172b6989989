use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutritionLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNutritionLogRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub amount: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}
