//! Document persistence with fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend is not configured.
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// Transport error talking to a remote store.
    #[error("request failed: {0}")]
    Http(String),

    /// Remote store answered with an error status.
    #[error("status={status} body={body}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// Document is not a JSON object.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Which backend accepted a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Primary Postgres store.
    Postgres,
    /// HTTP document API fallback.
    DataApi,
    /// Nothing accepted the document.
    None,
}

/// Result of a resilient save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome {
    /// Whether any backend accepted the document.
    pub ok: bool,
    /// Backend that accepted it.
    pub backend: StoreBackend,
    /// Assigned document ID.
    pub id: Option<String>,
    /// Last error, when nothing accepted the document.
    pub error: Option<String>,
}

impl StoreOutcome {
    /// A successful save.
    #[must_use]
    pub fn saved(backend: StoreBackend, id: String) -> Self {
        Self {
            ok: true,
            backend,
            id: Some(id),
            error: None,
        }
    }

    /// A failed save.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            backend: StoreBackend::None,
            id: None,
            error: Some(error.into()),
        }
    }
}

/// A backend that can persist JSON documents into named collections.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Backend identity reported in [`StoreOutcome`].
    fn backend(&self) -> StoreBackend;

    /// Inserts a document and returns its ID.
    async fn insert(&self, collection: &str, document: &Value) -> Result<String, StoreError>;
}

/// Tries each backend in order until one accepts the document.
#[derive(Clone, Default)]
pub struct ResilientStore {
    backends: Vec<Arc<dyn LeadStore>>,
}

impl ResilientStore {
    /// Creates a store trying `backends` in the given order.
    #[must_use]
    pub fn new(backends: Vec<Arc<dyn LeadStore>>) -> Self {
        Self { backends }
    }

    /// Number of configured backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether no backend is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Saves a document, falling back to the next backend on failure.
    /// Never fails; the outcome reports what happened.
    pub async fn save(&self, collection: &str, document: &Value) -> StoreOutcome {
        let mut last_error = String::from("No document store configured");

        for backend in &self.backends {
            match backend.insert(collection, document).await {
                Ok(id) => {
                    info!(collection, backend = ?backend.backend(), id = %id, "Document saved");
                    return StoreOutcome::saved(backend.backend(), id);
                }
                Err(e) => {
                    warn!(collection, backend = ?backend.backend(), error = %e, "Document store failed");
                    last_error = e.to_string();
                }
            }
        }

        error!(collection, error = %last_error, "Document not saved");
        StoreOutcome::failed(last_error)
    }
}

impl std::fmt::Debug for ResilientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backends: Vec<StoreBackend> = self.backends.iter().map(|b| b.backend()).collect();
        f.debug_struct("ResilientStore")
            .field("backends", &backends)
            .finish()
    }
}
