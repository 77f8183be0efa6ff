//! Zeno API Server
//!
//! Main entry point for the chatbot backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zeno_api::{AppState, create_router};
use zeno_core::estimate::{ContactDetails, EstimateEngine, PricingConfig};
use zeno_core::storage::{StorageConfig, StorageService};
use zeno_db::{connect_with, resilient_store};
use zeno_shared::{AppConfig, SalesMailer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zeno=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Primary document store is optional; the data API takes over without it
    let db = if config.database.url().is_some() {
        match connect_with(&config.database).await {
            Ok(db) => {
                info!("Connected to database");
                Some(db)
            }
            Err(e) => {
                warn!(error = %e, "Database unavailable, continuing without it");
                None
            }
        }
    } else {
        None
    };
    let store = resilient_store(db, &config.data_api);

    // Sales notifications
    let mailer = SalesMailer::from_config(&config.email).context("Failed to build mailer")?;
    info!(
        transport = ?config.email.transport,
        recipients = mailer.recipients().len(),
        "Email service configured"
    );

    // CV storage
    let storage = StorageService::from_config(StorageConfig::from_upload_config(&config.uploads))
        .context("Failed to initialize CV storage")?;
    info!(provider = storage.provider_name(), "CV storage configured");

    // Create application state
    let state = AppState {
        engine: Arc::new(EstimateEngine::new(
            PricingConfig::default(),
            ContactDetails::from(&config.contact),
        )),
        store: Arc::new(store),
        mailer: Arc::new(mailer),
        storage: Arc::new(storage),
        collections: Arc::new(config.collections.clone()),
    };

    // Create router
    let app = create_router(state, &config.server);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
