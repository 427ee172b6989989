use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::api::AppState;
use crate::auth::UserSession;
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreatePlanRequest, PlanDetail, UpdatePlanRequest, WorkoutPlan};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/active", get(active_plan))
        .route("/:id", get(get_plan).put(update_plan).delete(delete_plan))
}

async fn list_plans(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<WorkoutPlan>>> {
    let plans = state.plans.list_plans(session.user_id).await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_plan(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreatePlanRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<PlanDetail>)> {
    let plan = state.plans.create_plan(session.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn active_plan(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<PlanDetail>> {
    state
        .plans
        .get_active_plan(session.user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Active plan"))
}

async fn get_plan(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<PlanDetail>> {
    let plan = state.plans.get_plan(session.user_id, plan_id).await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, plan_id = %plan_id))]
async fn update_plan(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdatePlanRequest>, ApiError>,
) -> ApiResult<Json<PlanDetail>> {
    let plan = state.plans.update_plan(session.user_id, plan_id, request).await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, plan_id = %plan_id))]
async fn delete_plan(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<StatusCode> {
    state.plans.delete_plan(session.user_id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
