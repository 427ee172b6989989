use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::api::AppState;
use crate::auth::UserSession;
use crate::errors::{ApiError, ApiResult};
use crate::models::{SessionDetail, SetMutationResponse, UpdateSetRequest, UserStats, WorkoutHistory};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/start/:plan_day_id", post(start_workout))
        .route("/active", get(active_workout))
        .route("/history", get(history))
        .route("/stats", get(stats))
        .route("/:id", get(workout_details))
        .route("/:id/finish", post(finish_workout))
}

pub fn set_routes() -> Router<AppState> {
    Router::new().route("/:id", put(update_set).delete(delete_set))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, plan_day_id = %plan_day_id))]
async fn start_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_day_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<(StatusCode, Json<SessionDetail>)> {
    let workout = state.workouts.start_session(session.user_id, plan_day_id).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

async fn active_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<SessionDetail>> {
    state
        .workouts
        .get_active_session(session.user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Active workout"))
}

async fn workout_details(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(workout_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<SessionDetail>> {
    let workout = state
        .workouts
        .get_session_detail(session.user_id, workout_id)
        .await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %workout_id))]
async fn finish_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(workout_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<SessionDetail>> {
    let workout = state.workouts.finish_session(session.user_id, workout_id).await?;
    Ok(Json(workout))
}

async fn history(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<WorkoutHistory>> {
    let history = state.stats.get_history(session.user_id).await?;
    Ok(Json(history))
}

async fn stats(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<UserStats>> {
    let stats = state.stats.get_user_stats(session.user_id).await?;
    Ok(Json(stats))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, set_id = %set_id))]
async fn update_set(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(set_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateSetRequest>, ApiError>,
) -> ApiResult<Json<SetMutationResponse>> {
    let response = state.workouts.update_set(session.user_id, set_id, request).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, set_id = %set_id))]
async fn delete_set(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(set_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<SetMutationResponse>> {
    let response = state.workouts.delete_set(session.user_id, set_id).await?;
    Ok(Json(response))
}
