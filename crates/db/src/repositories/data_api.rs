//! HTTP document API client (insert-one endpoint), used as store fallback.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use zeno_core::lead::{LeadStore, StoreBackend, StoreError};
use zeno_shared::DataApiConfig;

/// Request timeout for the document API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum characters of an error body kept in [`StoreError::Rejected`].
const ERROR_BODY_LIMIT: usize = 200;

/// Client for a `POST {url}/action/insertOne` document API.
#[derive(Debug, Clone)]
pub struct DataApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertOneRequest<'a> {
    data_source: &'a str,
    database: &'a str,
    collection: &'a str,
    document: &'a Value,
}

impl DataApiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        data_source: impl Into<String>,
        database: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            data_source: data_source.into(),
            database: database.into(),
        })
    }

    /// Creates a client from configuration. Returns `Ok(None)` when the API
    /// is not fully configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &DataApiConfig) -> Result<Option<Self>, StoreError> {
        if !config.is_enabled() {
            return Ok(None);
        }
        let (Some(url), Some(key), Some(source)) = (
            config.url.as_deref(),
            config.api_key.as_deref(),
            config.data_source.as_deref(),
        ) else {
            return Ok(None);
        };
        Self::new(url, key.trim(), source.trim(), config.database.clone()).map(Some)
    }

    /// Inserts a document and returns the ID assigned by the API.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    pub async fn insert_one(&self, collection: &str, document: &Value) -> Result<String, StoreError> {
        let response = self
            .client
            .post(format!("{}/action/insertOne", self.base_url))
            .header("api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&InsertOneRequest {
                data_source: &self.data_source,
                database: &self.database,
                collection,
                document,
            })
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(inserted_id(&body).unwrap_or_default())
    }
}

/// Reads `insertedId` (or `documentId`). Extended JSON ids such as
/// `{"$oid": "..."}` are unwrapped.
fn inserted_id(body: &Value) -> Option<String> {
    let id = ["insertedId", "documentId"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find(|value| !value.is_null())?;

    match id {
        Value::String(id) => Some(id.clone()),
        Value::Object(map) => map
            .get("$oid")
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| Some(id.to_string())),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl LeadStore for DataApiClient {
    fn backend(&self) -> StoreBackend {
        StoreBackend::DataApi
    }

    async fn insert(&self, collection: &str, document: &Value) -> Result<String, StoreError> {
        self.insert_one(collection, document).await
    }
}
