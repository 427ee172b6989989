use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use crate::api::AppState;
use crate::auth::{UserRole, UserSession};
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateExerciseRequest, Exercise, ExerciseQuery};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_exercises).post(create_exercise))
}

async fn list_exercises(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ExerciseQuery>, ApiError>,
) -> ApiResult<Json<Vec<Exercise>>> {
    let exercises = state.exercises.list_exercises(query.muscle_group).await?;
    Ok(Json(exercises))
}

/// Catalog changes are reserved for admins
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateExerciseRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Exercise>)> {
    session.require_role(UserRole::Admin)?;

    let exercise = state.exercises.create_exercise(request).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}
