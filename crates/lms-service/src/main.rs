//! Einstein360 LMS Service - HTTP API for batches, attendance and assessments
//!
//! This is the main entry point for the LMS service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_service::{create_router, AppState, ServiceConfig};
use lms_store::seed::seed_defaults;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lms=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Einstein360 LMS Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        store_backend = %config.store_backend,
        data_dir = %config.data_dir,
        upload_dir = %config.upload_dir,
        sheets_configured = %config.sheets_spreadsheet_id.is_some(),
        seed_defaults = %config.seed_defaults,
        "Service configuration loaded"
    );

    let state = AppState::from_config(config.clone())?;

    if config.seed_defaults {
        let report = seed_defaults(&state.store).await?;
        tracing::info!(
            owner = report.owner,
            questions = report.questions,
            "Default records seeded"
        );
    }

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
