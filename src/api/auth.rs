use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use crate::auth::{
    jwt_auth_middleware, AuthError, AuthResponse, AuthService, LoginRequest, MessageResponse,
    RegisterRequest, UserSession,
};
use crate::models::UserProfile;

/// Registration and login are public; the rest needs a bearer token.
pub fn auth_routes(auth_service: AuthService) -> Router {
    let authenticated = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(authenticated)
        .with_state(auth_service)
}

#[tracing::instrument(skip(auth_service, request))]
async fn register(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AuthError>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let response = auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip(auth_service, request))]
async fn login(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AuthError>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn logout(
    State(auth_service): State<AuthService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = auth_service.logout(&session).await?;
    Ok(Json(response))
}

async fn me(
    State(auth_service): State<AuthService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<UserProfile>, AuthError> {
    let profile = auth_service.profile(&session).await?;
    Ok(Json(profile))
}
