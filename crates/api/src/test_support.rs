//! Router harness with recording fakes for the store and mail transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use zeno_core::estimate::EstimateEngine;
use zeno_core::lead::{LeadStore, ResilientStore, StoreBackend, StoreError};
use zeno_core::storage::{StorageConfig, StorageProvider, StorageService};
use zeno_shared::{
    CollectionsConfig, EmailError, MailTransport, OutgoingEmail, SalesMailer, ServerConfig,
};

use crate::{AppState, create_router};

const BOUNDARY: &str = "zeno-test-boundary";

/// Store recording every inserted document.
pub struct RecordingStore {
    fail: bool,
    saved: Mutex<Vec<(String, Value)>>,
}

impl RecordingStore {
    pub fn saved(&self) -> Vec<(String, Value)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadStore for RecordingStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }

    async fn insert(&self, collection: &str, document: &Value) -> Result<String, StoreError> {
        if self.fail {
            return Err(StoreError::Database("connection refused".to_string()));
        }
        let mut saved = self.saved.lock().unwrap();
        saved.push((collection.to_string(), document.clone()));
        Ok(format!("doc-{}", saved.len()))
    }
}

/// Mail transport recording every message.
pub struct RecordingMail {
    fail: bool,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMail {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMail {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, _to: &str, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::SendError("x".repeat(300)));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// One multipart form part.
pub struct Part {
    name: &'static str,
    filename: Option<&'static str>,
    content: Vec<u8>,
}

impl Part {
    pub fn file(name: &'static str, filename: &'static str, content: &[u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content: content.to_vec(),
        }
    }

    pub fn text(name: &'static str, value: &str) -> Self {
        Self {
            name,
            filename: None,
            content: value.as_bytes().to_vec(),
        }
    }
}

/// The full router over temporary storage and recording fakes.
pub struct TestApp {
    router: Router,
    pub store: Arc<RecordingStore>,
    pub mail: Arc<RecordingMail>,
    pub storage: Arc<StorageService>,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(false, StorageConfig::DEFAULT_MAX_FILE_SIZE, &ServerConfig::default())
    }

    /// Store and mail transport both fail.
    pub fn failing() -> Self {
        Self::build(true, StorageConfig::DEFAULT_MAX_FILE_SIZE, &ServerConfig::default())
    }

    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self::build(false, max_file_size, &ServerConfig::default())
    }

    /// Router built with the given `server` section (CORS, static frontend).
    pub fn with_server(server: &ServerConfig) -> Self {
        Self::build(false, StorageConfig::DEFAULT_MAX_FILE_SIZE, server)
    }

    fn build(fail: bool, max_file_size: u64, server: &ServerConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(
            StorageService::from_config(
                StorageConfig::new(StorageProvider::local_fs(dir.path()))
                    .with_max_file_size(max_file_size),
            )
            .unwrap(),
        );
        let store = Arc::new(RecordingStore {
            fail,
            saved: Mutex::new(Vec::new()),
        });
        let mail = Arc::new(RecordingMail {
            fail,
            sent: Mutex::new(Vec::new()),
        });

        let store_backend: Arc<dyn LeadStore> = store.clone();
        let transport: Arc<dyn MailTransport> = mail.clone();
        let state = AppState {
            engine: Arc::new(EstimateEngine::default()),
            store: Arc::new(ResilientStore::new(vec![store_backend])),
            mailer: Arc::new(SalesMailer::new(
                vec!["sales@zeno.test".to_string()],
                Some(transport),
                None,
            )),
            storage: storage.clone(),
            collections: Arc::new(CollectionsConfig::default()),
        };

        Self {
            router: create_router(state, server),
            store,
            mail,
            storage,
            _dir: dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn post_multipart(&self, uri: &str, parts: &[Part]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part.filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(&part.content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Sends a request and returns the untouched response.
    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.raw(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}
