use anyhow::{Context, Result};
use dotenv::dotenv;
use shared::{
    config::{Config, ConnectionManager},
    utils::init_logger,
};
use sqlx::{Pool, Postgres};
use storefront::{handler::AppRouter, state::AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    init_logger("storefront", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let state = AppState::new(db_pool, &config).context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("✅ Storefront shutdown complete.");

    Ok(())
}

async fn run_migrations(pool: &Pool<Postgres>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
