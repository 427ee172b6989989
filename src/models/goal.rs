use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "goal_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    MuscleGain,
    Strength,
    Endurance,
    Flexibility,
}

impl GoalType {
    /// Goals measured against body weight start from the user's current weight.
    pub fn tracks_body_weight(&self) -> bool {
        matches!(self, GoalType::WeightLoss | GoalType::MuscleGain)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: GoalType,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub is_active: bool,
    pub achieved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGoalRequest {
    pub goal_type: GoalType,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    #[validate(length(max = 20))]
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    /// Defaults to true; an active goal replaces the previous one.
    pub is_active: Option<bool>,
}

impl CreateGoalRequest {
    pub fn of_type(goal_type: GoalType) -> Self {
        Self {
            goal_type,
            target_value: None,
            current_value: None,
            unit: None,
            target_date: None,
            is_active: Some(true),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectGoalRequest {
    pub goal_type: GoalType,
}
