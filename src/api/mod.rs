// HTTP surface: JSON handlers grouped by resource

pub mod auth;
pub mod exercises;
pub mod goals;
pub mod health;
pub mod nutrition;
pub mod plans;
pub mod routes;
pub mod users;
pub mod workouts;

pub use routes::{create_routes, AppState};
