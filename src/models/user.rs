use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::auth::UserRole;
use crate::models::Goal;

/// Training experience level chosen by the user after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "training_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrainingLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TrainingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingLevel::Beginner => "beginner",
            TrainingLevel::Intermediate => "intermediate",
            TrainingLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub level: Option<TrainingLevel>,
    pub birth_date: Option<NaiveDate>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub level: Option<TrainingLevel>,
    pub birth_date: Option<NaiveDate>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            level: user.level,
            birth_date: user.birth_date,
            height_cm: user.height_cm,
            weight_kg: user.weight_kg,
            gender: user.gender.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectLevelRequest {
    pub level: TrainingLevel,
}

/// Profile together with what the user is currently working towards.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: UserProfile,
    pub active_goal: Option<Goal>,
    pub active_plan_id: Option<Uuid>,
    pub active_session_id: Option<Uuid>,
}
