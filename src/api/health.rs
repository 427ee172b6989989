use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_up = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    if !database_up {
        tracing::warn!("health check could not reach the database");
    }

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_up { "healthy" } else { "degraded" },
            "service": "ironlog",
            "version": env!("CARGO_PKG_VERSION"),
            "database": if database_up { "up" } else { "down" },
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
