// Persisted entities and request/response shapes

pub mod exercise;
pub mod goal;
pub mod nutrition;
pub mod stats;
pub mod user;
pub mod validation;
pub mod workout_plan;
pub mod workout_session;

pub use exercise::*;
pub use goal::*;
pub use nutrition::*;
pub use stats::*;
pub use user::*;
pub use validation::*;
pub use workout_plan::*;
pub use workout_session::*;
