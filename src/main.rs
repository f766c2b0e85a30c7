#![allow(clippy::result_large_err)]

use conta_corrente::{
    api::{self, AppState},
    config,
    core::{category, payment_method},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Application configuration
    let app_config = config::app::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Database connection and schema
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready"))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed reference data
    let methods = payment_method::seed_payment_methods(&db, &app_config.formas_pagamento).await?;
    let categories = category::seed_categories(&db, &app_config.categorias).await?;
    info!(methods, categories, "Reference data seeded");

    // 6. Serve
    let listener = tokio::net::TcpListener::bind(&app_config.server.bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.server.bind_addr, e))?;
    info!("Listening on {}", app_config.server.bind_addr);

    let app = api::build_router(AppState::new(db), &app_config.server);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
