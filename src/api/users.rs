use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use crate::api::AppState;
use crate::auth::UserSession;
use crate::errors::{ApiError, ApiResult};
use crate::models::{DashboardResponse, SelectLevelRequest, UserProfile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/level", put(select_level))
        .route("/dashboard", get(dashboard))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn select_level(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<SelectLevelRequest>, ApiError>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.users.select_level(session.user_id, request.level).await?;
    Ok(Json(profile))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = state.users.dashboard(session.user_id).await?;
    Ok(Json(dashboard))
}
