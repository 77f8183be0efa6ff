//! CV uploads from the job applicant path.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use zeno_core::lead::{CvApplication, LeadSubmission, cv_upload_email, stamp_created_at};

use super::{json_object, leads::EMAIL_ERROR_LIMIT};
use crate::{AppState, error::ApiError};

/// Chatbot path recorded when the client sent none.
const DEFAULT_PATH: &str = "job";

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload_cv", post(upload_cv))
}

/// Response for `/upload_cv`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always true once the file is stored.
    pub ok: bool,
    /// Stored filename.
    pub filename: String,
    /// Whether any document store accepted the application.
    pub db_saved: bool,
    /// Whether at least one sales recipient was notified.
    pub email_sent: bool,
    /// Last mail error, truncated. Empty when there was none.
    pub email_error: String,
}

/// Parts of the multipart form we use.
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    state_json: Option<String>,
}

fn multipart_error(err: &MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::too_large("File too large")
    } else {
        ApiError::bad_request(err.body_text())
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("file") if form.file.is_none() => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(|e| multipart_error(&e))?;
                form.file = Some((filename, content));
            }
            Some("state_json") => {
                form.state_json = Some(field.text().await.map_err(|e| multipart_error(&e))?);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Chatbot state sent with the upload, with the upload fields filled in.
fn applicant_document(state_json: Option<&str>, cv_filename: &str) -> Map<String, Value> {
    let mut document = state_json
        .and_then(|raw| json_object(raw.as_bytes()))
        .unwrap_or_default();

    document.insert("cv_filename".to_string(), Value::String(cv_filename.to_string()));

    let has_path = match document.get("path") {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(path)) => !path.is_empty(),
        Some(_) => true,
    };
    if !has_path {
        document.insert("path".to_string(), Value::String(DEFAULT_PATH.to_string()));
    }

    document
}

/// POST /upload_cv - Store a PDF CV, notify sales and record the application.
async fn upload_cv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let multipart = multipart.map_err(|_| ApiError::bad_request("No file selected"))?;
    let form = read_form(multipart).await?;

    let Some((original_name, content)) = form.file.filter(|(name, _)| !name.is_empty()) else {
        return Err(ApiError::bad_request("No file selected"));
    };

    let now = Utc::now();
    let stored = state
        .storage
        .store_at(&original_name, content.to_vec(), now)
        .await?;

    let mut document = applicant_document(form.state_json.as_deref(), &stored.filename);
    stamp_created_at(&mut document, now);
    let applicant = LeadSubmission::from_document(&document);

    let report = state
        .mailer
        .notify(&cv_upload_email(&applicant, &stored.filename, content.to_vec()))
        .await;

    let application = CvApplication::new(&applicant, &stored.filename, now);
    let saved = state
        .store
        .save(&state.collections.applications, &application.to_document())
        .await;

    info!(
        filename = %stored.filename,
        size = stored.size,
        db_saved = saved.ok,
        email_sent = report.sent(),
        "CV uploaded"
    );

    Ok(Json(UploadResponse {
        ok: true,
        filename: stored.filename,
        db_saved: saved.ok,
        email_sent: report.sent(),
        email_error: report.error_excerpt(EMAIL_ERROR_LIMIT),
    }))
}
