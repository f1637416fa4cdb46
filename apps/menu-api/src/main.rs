use axum_helpers::server::{RouterOptions, close_postgres, create_production_app, create_router, health_router};
use block_storage::DiskStorage;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_menu::TracingEventSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let state = AppState {
        storage: Arc::new(DiskStorage::new(config.storage.clone())),
        events: Arc::new(TracingEventSink),
        db,
        config,
    };

    let options = RouterOptions {
        route_timeout: state.config.route_timeout,
        cors: state.config.cors.clone(),
    };
    let router = create_router::<openapi::ApiDoc>(api::routes(&state), options)?;

    // - /health: liveness with app name/version
    // - /ready: database and storage checks
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting menu API");

    let server = state.config.server.clone();
    let db = state.db.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        close_postgres(db, "menu").await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Menu API shutdown complete");
    Ok(())
}
