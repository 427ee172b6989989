use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use crate::api::AppState;
use crate::auth::UserSession;
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateGoalRequest, Goal, SelectGoalRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/active", put(select_goal))
}

async fn list_goals(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goals.list_goals(session.user_id).await?;
    Ok(Json(goals))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_goal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateGoalRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = state.goals.create_goal(session.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// Switch the active goal to a fresh goal of the requested type
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn select_goal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<SelectGoalRequest>, ApiError>,
) -> ApiResult<Json<Goal>> {
    let goal = state.goals.select_goal(session.user_id, request.goal_type).await?;
    Ok(Json(goal))
}
