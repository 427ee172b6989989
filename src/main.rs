use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use ironlog::config::{create_pool, run_migrations, AppConfig, DatabaseConfig};
use ironlog::{create_routes, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    logging::init(&config)?;

    let database = DatabaseConfig::from_env()?;
    let pool = create_pool(&database).await?;
    run_migrations(&pool).await?;

    let app = create_routes(pool, &config);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(environment = %config.environment, "ironlog listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
