pub mod app;
pub mod database;

pub use app::AppConfig;
pub use database::{create_pool, run_migrations, DatabaseConfig};

use std::str::FromStr;

use anyhow::{Context, Result};

/// Read `key` through `lookup`, falling back to `default` when unset.
/// A value that is set but does not parse is an error.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
