//! Persistence layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for stored lead documents
//! - Repositories implementing the core `LeadStore` trait (Postgres and the
//!   HTTP document API fallback)
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{DataApiClient, LeadDocumentRepository};

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};
use zeno_core::lead::{LeadStore, ResilientStore};
use zeno_shared::{DataApiConfig, DatabaseConfig};

/// Establishes a pooled connection using the `database` config section.
///
/// # Errors
///
/// Returns an error if no URL is configured or the connection fails.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config
        .url()
        .ok_or_else(|| DbErr::Custom("database url not configured".to_string()))?;

    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Builds the document store: Postgres first (when connected), then the
/// document API (when configured).
///
/// A misconfigured document API is logged and skipped.
#[must_use]
pub fn resilient_store(db: Option<DatabaseConnection>, data_api: &DataApiConfig) -> ResilientStore {
    let mut backends: Vec<Arc<dyn LeadStore>> = Vec::new();

    if let Some(db) = db {
        backends.push(Arc::new(LeadDocumentRepository::new(db)));
    }

    match DataApiClient::from_config(data_api) {
        Ok(Some(client)) => backends.push(Arc::new(client)),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Document API disabled"),
    }

    info!(backends = backends.len(), "Document store ready");
    ResilientStore::new(backends)
}
