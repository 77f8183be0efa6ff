//! Lead submission.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use zeno_core::lead::{LeadSubmission, lead_email, stamp_created_at};

use super::read_json_object;
use crate::{AppState, error::ApiError};

/// Maximum characters of the mail error echoed to the client.
pub(crate) const EMAIL_ERROR_LIMIT: usize = 180;

/// Creates the lead routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/save_user_data", post(save_user_data))
}

/// Response for `/save_user_data`.
#[derive(Debug, Serialize)]
pub struct SaveLeadResponse {
    /// Always true; store and mail failures are reported below.
    pub ok: bool,
    /// Fixed confirmation message.
    pub message: &'static str,
    /// Whether any document store accepted the lead.
    pub db_saved: bool,
    /// Whether at least one sales recipient was notified.
    pub email_sent: bool,
    /// Last mail error, truncated. Empty when there was none.
    pub email_error: String,
}

/// POST /save_user_data - Persist a lead and notify sales.
///
/// An empty or unreadable body is stored as an empty lead.
async fn save_user_data(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SaveLeadResponse>, ApiError> {
    let mut document = read_json_object(body)?.unwrap_or_default();
    stamp_created_at(&mut document, Utc::now());

    let lead = LeadSubmission::from_document(&document);
    let stored = state
        .store
        .save(&state.collections.leads, &Value::Object(document))
        .await;

    let estimate = state.engine.estimate(&lead.budget_input());
    let report = state.mailer.notify(&lead_email(&lead, &estimate)).await;

    info!(
        company = lead.company_name.as_deref().unwrap_or_default(),
        category = lead.category.as_deref().unwrap_or_default(),
        db_saved = stored.ok,
        email_sent = report.sent(),
        "Lead processed"
    );

    Ok(Json(SaveLeadResponse {
        ok: true,
        message: "User data processed",
        db_saved: stored.ok,
        email_sent: report.sent(),
        email_error: report.error_excerpt(EMAIL_ERROR_LIMIT),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::TestApp;

    #[tokio::test]
    async fn test_save_user_data() {
        let app = TestApp::new();
        let (status, body) = app
            .post_json(
                "/save_user_data",
                &json!({
                    "name": "Asha",
                    "company_name": "Acme",
                    "email": "asha@acme.test",
                    "category": "SEO",
                    "employee_size": "0-10",
                    "created_at": "client value"
                }),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "ok": true,
                "message": "User data processed",
                "db_saved": true,
                "email_sent": true,
                "email_error": ""
            })
        );

        let saved = app.store.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "leads");
        assert_eq!(saved[0].1["name"], json!("Asha"));
        assert_ne!(saved[0].1["created_at"], json!("client value"));

        let sent = app.mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Lead: Acme - SEO");
        assert_eq!(sent[0].reply_to.as_deref(), Some("asha@acme.test"));
        assert!(sent[0].html.contains("₹10,000/ month"));
    }

    #[tokio::test]
    async fn test_save_user_data_tolerates_empty_body() {
        let app = TestApp::new();
        let (status, body) = app.post_raw("/save_user_data", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));

        let saved = app.store.saved();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].1["created_at"].is_string());
        assert_eq!(app.mail.sent()[0].subject, "New Lead:  - Service");
    }

    #[tokio::test]
    async fn test_save_user_data_reports_failures() {
        let app = TestApp::failing();
        let (status, body) = app
            .post_json("/save_user_data", &json!({"name": "Asha"}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["db_saved"], json!(false));
        assert_eq!(body["email_sent"], json!(false));

        let error = body["email_error"].as_str().unwrap();
        assert!(error.starts_with("Failed to send email: "));
        assert_eq!(error.chars().count(), super::EMAIL_ERROR_LIMIT);
    }
}
