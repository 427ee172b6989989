use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total_workouts: i64,
    pub current_streak: i64,
    pub total_volume: f64,
    /// Mean session length in whole minutes.
    pub avg_duration: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_volume: f64,
    pub exercise_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutHistory {
    pub workouts: Vec<HistoryEntry>,
    pub stats: UserStats,
    pub chart: Vec<ChartPoint>,
    pub has_more: bool,
}
