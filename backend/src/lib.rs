pub mod axum_http;
pub mod config;
pub mod observability;

use std::sync::Arc;

use anyhow::Result;
use infra::postgres::postgres_connection;
use tracing::info;

pub async fn run() -> Result<()> {
    observability::init_observability()?;

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.pool_settings())?;
    info!("Postgres connection has been established");

    postgres_connection::run_migrations(&postgres_pool, &dotenvy_env.migrations.path)?;

    axum_http::http_serve::start(Arc::new(dotenvy_env), Arc::new(postgres_pool)).await?;

    Ok(())
}
