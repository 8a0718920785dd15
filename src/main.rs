//! Electricity Business API server
//!
//! REST backend for an EV-charging-station business. Reads configuration
//! from a TOML file (~/.config/electricity-business/config.toml).

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use electricity_business::infrastructure::database::migrator::Migrator;
use electricity_business::{create_api_router, default_config_path, init_database, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EVB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Electricity Business API...");

    // ── Database ───────────────────────────────────────────────
    let db_config = app_cfg.database_config();
    info!("Database: {}", db_config.url);
    let db = init_database(&db_config).await?;
    Migrator::up(&db, None).await?;
    info!("Database migrations applied");

    // ── Token configuration ────────────────────────────────────
    let access_config = app_cfg.security.access_token_config();
    let refresh_config = app_cfg.security.refresh_token_config();
    info!(
        "Tokens configured: access {}s, refresh {}s",
        app_cfg.security.access_token_ttl_secs, app_cfg.security.refresh_token_ttl_secs
    );

    // ── HTTP server ────────────────────────────────────────────
    let app = create_api_router(db, access_config, refresh_config);
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    info!("Swagger UI available at http://{addr}/swagger-ui");

    axum::serve(listener, app).await?;

    Ok(())
}
