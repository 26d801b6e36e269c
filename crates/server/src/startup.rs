use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from `CONFIG_PATH` (default `config.toml`), falling back to env vars
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenv().ok();
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unavailable, using environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()).into())
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {}", e)))?;
    Ok(addr)
}

/// Connect to the configured database and apply pending migrations
pub async fn prepare_database(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!("migrations applied");
    }
    Ok(db)
}

/// Assemble state, optional demo data and the router
pub async fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = AppState::new(db, &cfg.cache);
    if cfg.seed.enabled {
        service::seed::seed_demo_data(&state.companies, &state.users).await?;
    }
    Ok(routes::build_router(state, build_cors()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = prepare_database(&cfg).await?;
    let app = build_app(db, &cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, cache = cfg.cache.enabled, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
