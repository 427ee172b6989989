use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::health::health_check;
use super::{exercises, goals, nutrition, plans, users, workouts};
use crate::auth::{cors_layer, jwt_auth_middleware, security_headers_layer, AuthService, JwtService};
use crate::config::AppConfig;
use crate::services::{
    ExerciseService, GoalService, NutritionService, PlanService, StatsService, UserService,
    WorkoutSessionService,
};

/// Services shared by every authenticated handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub users: UserService,
    pub goals: GoalService,
    pub exercises: ExerciseService,
    pub plans: PlanService,
    pub workouts: WorkoutSessionService,
    pub stats: StatsService,
    pub nutrition: NutritionService,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self {
            users: UserService::new(db.clone()),
            goals: GoalService::new(db.clone()),
            exercises: ExerciseService::new(db.clone()),
            plans: PlanService::new(db.clone()),
            workouts: WorkoutSessionService::new(db.clone()),
            stats: StatsService::new(db.clone()),
            nutrition: NutritionService::new(db.clone()),
            db,
        }
    }
}

pub fn create_routes(db: PgPool, config: &AppConfig) -> Router {
    let jwt_service = JwtService::new(&config.jwt_secret, config.token_ttl());
    let auth_service = AuthService::new(db.clone(), jwt_service);

    let protected = Router::new()
        .nest("/api/users", users::routes())
        .nest("/api/goals", goals::routes())
        .nest("/api/exercises", exercises::routes())
        .nest("/api/plans", plans::routes())
        .nest("/api/workouts", workouts::routes())
        .nest("/api/sets", workouts::set_routes())
        .nest("/api/nutrition", nutrition::routes())
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(AppState::new(db))
        .nest("/api/auth", auth_routes(auth_service))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(security_headers_layer()),
        )
}
