use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::ApiResult;
use crate::models::{ChartPoint, HistoryEntry, UserStats, WorkoutHistory};

pub const HISTORY_LIMIT: usize = 30;

#[derive(Debug, Clone, FromRow)]
struct CompletedSpan {
    date: NaiveDate,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

/// Consecutive calendar days with a workout, counting back from `today`.
///
/// Dates after `today` are ignored and any missing day ends the run.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut dates = dates.to_vec();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let mut streak = 0;
    let mut expected = today;
    for date in dates {
        if date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else if date < expected {
            break;
        }
    }

    streak
}

/// Mean of the given durations rounded to whole minutes; zero when empty.
pub fn average_duration_minutes(durations: &[Duration]) -> i64 {
    if durations.is_empty() {
        return 0;
    }

    let total_seconds: i64 = durations.iter().map(Duration::num_seconds).sum();
    let mean_minutes = total_seconds as f64 / durations.len() as f64 / 60.0;
    mean_minutes.round() as i64
}

fn summarize(spans: &[CompletedSpan], total_volume: f64, today: NaiveDate) -> UserStats {
    if spans.is_empty() {
        return UserStats::default();
    }

    let dates: Vec<NaiveDate> = spans.iter().map(|span| span.date).collect();
    let durations: Vec<Duration> = spans
        .iter()
        .filter_map(|span| Some(span.end_time? - span.start_time?))
        .collect();

    UserStats {
        total_workouts: spans.len() as i64,
        current_streak: current_streak(&dates, today),
        total_volume,
        avg_duration: average_duration_minutes(&durations),
    }
}

/// Volume per workout, oldest first, labelled by day and month.
pub fn chart_points(entries: &[HistoryEntry]) -> Vec<ChartPoint> {
    let mut points: Vec<(NaiveDate, ChartPoint)> = entries
        .iter()
        .map(|entry| {
            (
                entry.date,
                ChartPoint {
                    label: entry.date.format("%d.%m").to_string(),
                    volume: entry.total_volume,
                },
            )
        })
        .collect();
    points.sort_by_key(|(date, _)| *date);
    points.into_iter().map(|(_, point)| point).collect()
}

#[derive(Clone)]
pub struct StatsService {
    db: PgPool,
}

impl StatsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user_stats(&self, user_id: Uuid) -> ApiResult<UserStats> {
        let spans = sqlx::query_as::<_, CompletedSpan>(
            "SELECT date, start_time, end_time FROM workout_sessions
             WHERE user_id = $1 AND is_completed",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let total_volume = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(es.weight * es.reps), 0)::float8
             FROM exercise_sets es
             JOIN workout_exercises we ON we.id = es.workout_exercise_id
             JOIN workout_sessions s ON s.id = we.workout_session_id
             WHERE s.user_id = $1 AND s.is_completed AND NOT es.is_warmup",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(summarize(&spans, total_volume, Utc::now().date_naive()))
    }

    /// Most recent completed workouts with their volume, plus overall stats.
    #[tracing::instrument(skip(self))]
    pub async fn get_history(&self, user_id: Uuid) -> ApiResult<WorkoutHistory> {
        let mut workouts = sqlx::query_as::<_, HistoryEntry>(
            "SELECT s.id, s.name, s.date, s.start_time, s.end_time,
                    COALESCE((
                        SELECT SUM(es.weight * es.reps)
                        FROM exercise_sets es
                        JOIN workout_exercises we ON we.id = es.workout_exercise_id
                        WHERE we.workout_session_id = s.id AND NOT es.is_warmup
                    ), 0)::float8 AS total_volume,
                    (SELECT COUNT(*) FROM workout_exercises we WHERE we.workout_session_id = s.id) AS exercise_count
             FROM workout_sessions s
             WHERE s.user_id = $1 AND s.is_completed
             ORDER BY s.date DESC, s.start_time DESC NULLS LAST
             LIMIT $2",
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT as i64 + 1)
        .fetch_all(&self.db)
        .await?;

        let has_more = workouts.len() > HISTORY_LIMIT;
        workouts.truncate(HISTORY_LIMIT);

        let stats = self.get_user_stats(user_id).await?;
        let chart = chart_points(&workouts);

        Ok(WorkoutHistory {
            workouts,
            stats,
            chart,
            has_more,
        })
    }
}
