use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use crate::api::AppState;
use crate::auth::UserSession;
use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateNutritionLogRequest, NutritionLog};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_logs).post(create_log))
}

async fn list_logs(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<NutritionLog>>> {
    let logs = state.nutrition.list_logs(session.user_id).await?;
    Ok(Json(logs))
}

async fn create_log(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateNutritionLogRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<NutritionLog>)> {
    let log = state.nutrition.create_log(session.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
