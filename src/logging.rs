use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `LOG_LEVEL` applies to this crate and
/// noisy dependencies are held at `warn`.
pub fn init(config: &AppConfig) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(default_directives(&config.log_level)),
    };

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.is_production() {
        registry
            .with(fmt::layer().compact().with_target(true).with_ansi(false))
            .try_init()
    } else {
        registry.with(fmt::layer().pretty()).try_init()
    };

    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn default_directives(level: &str) -> String {
    format!("{level},ironlog={level},tower_http=info,sqlx=warn,hyper=warn")
}
