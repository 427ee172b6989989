//! ironlog: workout planning and training log service.
//!
//! Users choose a training level and goal, get a generated multi-day plan,
//! log sets during workouts and read back their history and statistics.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;

pub use api::{create_routes, AppState};
pub use errors::{ApiError, ApiResult};
