//! Stored document shapes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::submission::LeadSubmission;

/// Document `type` of CV uploads.
pub const CV_UPLOAD_TYPE: &str = "cv_upload";

/// Timestamp format used in stored documents.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Sets `created_at` on a submitted lead document, replacing any value
/// the client sent.
pub fn stamp_created_at(document: &mut Map<String, Value>, at: DateTime<Utc>) {
    document.insert("created_at".to_string(), Value::String(timestamp(at)));
}

/// Record of a job application with an uploaded CV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvApplication {
    /// Always [`CV_UPLOAD_TYPE`].
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Applicant name.
    pub name: Option<String>,
    /// Applicant's company.
    pub company_name: Option<String>,
    /// Applicant email.
    pub email: Option<String>,
    /// Applicant phone.
    pub phone: Option<String>,
    /// Stored CV filename.
    pub cv_filename: String,
    /// Upload time.
    pub created_at: String,
}

impl CvApplication {
    /// Builds the application record from the chatbot state sent with the upload.
    #[must_use]
    pub fn new(applicant: &LeadSubmission, cv_filename: &str, at: DateTime<Utc>) -> Self {
        Self {
            kind: CV_UPLOAD_TYPE,
            name: applicant.name.clone(),
            company_name: applicant.company_name.clone(),
            email: applicant.email.clone(),
            phone: applicant.phone.clone(),
            cv_filename: cv_filename.to_string(),
            created_at: timestamp(at),
        }
    }

    /// The record as a JSON document.
    #[must_use]
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
