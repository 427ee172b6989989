//! Shared helpers for the HTTP integration tests.
//!
//! A PostgreSQL server is either taken from `TEST_DATABASE_URL` (server
//! root, no database name) or started once per test binary with
//! testcontainers. Every test gets its own freshly migrated database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use ironlog::config::{run_migrations, AppConfig};
use ironlog::create_routes;

struct SharedPg {
    base_url: String,
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn init_shared_pg() -> SharedPg {
    if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
        return SharedPg {
            base_url: url.trim_end_matches('/').to_string(),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("16-alpine")
        .start()
        .await
        .expect("failed to start PostgreSQL container");
    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    SharedPg {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Fresh database with the schema applied.
pub async fn create_test_db() -> PgPool {
    let shared = SHARED_PG.get_or_init(init_shared_pg).await;

    let maintenance = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&format!("{}/postgres", shared.base_url))
        .await
        .expect("failed to connect to maintenance database");

    let db_name = format!("ironlog_test_{}", Uuid::new_v4().simple());
    maintenance
        .execute(format!("CREATE DATABASE {db_name}").as_str())
        .await
        .expect("failed to create test database");
    maintenance.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&format!("{}/{db_name}", shared.base_url))
        .await
        .expect("failed to connect to test database");
    run_migrations(&pool).await.expect("migrations should succeed");

    pool
}

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = create_test_db().await;
        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("integration-test-secret".to_string()),
            _ => None,
        })
        .expect("test config");

        Self {
            router: create_routes(pool.clone(), &config),
            pool,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Register a member and return their access token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "Barbell123",
                    "weight_kg": 80.0
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Register, choose a level and optionally a goal.
    pub async fn onboard(&self, username: &str, level: &str, goal: Option<&str>) -> String {
        let token = self.register(username).await;

        let (status, _) = self
            .put("/api/users/level", &token, json!({ "level": level }))
            .await;
        assert_eq!(status, StatusCode::OK);

        if let Some(goal) = goal {
            let (status, _) = self
                .put("/api/goals/active", &token, json!({ "goal_type": goal }))
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        token
    }

    /// Small catalog keyed by exercise name.
    pub async fn seed_exercises(&self) -> HashMap<&'static str, Uuid> {
        let catalog = [
            ("Bench Press", "chest", "barbell"),
            ("Back Squat", "legs", "barbell"),
            ("Plank", "core", "bodyweight"),
            ("Standing Calf Raise", "calves", "machine"),
            ("Pull-up", "back", "bodyweight"),
        ];

        let mut ids = HashMap::new();
        for (name, muscle_group, equipment) in catalog {
            let id = sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO exercises (name, muscle_group, equipment, difficulty)
                 VALUES ($1, $2::muscle_group, $3::equipment_type, 'beginner')
                 RETURNING id",
            )
            .bind(name)
            .bind(muscle_group)
            .bind(equipment)
            .fetch_one(&self.pool)
            .await
            .expect("failed to seed exercise");
            ids.insert(name, id);
        }
        ids
    }

    /// Create a plan and return its JSON detail.
    pub async fn create_plan(&self, token: &str, days: Value) -> Value {
        let (status, body) = self
            .post("/api/plans", token, json!({ "days": days }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "plan creation failed: {body}");
        body
    }
}
